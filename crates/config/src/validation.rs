//! Configuration validation
//!
//! A malformed configuration is the only unrecoverable condition in the
//! system, so everything checkable is checked here at startup with a
//! descriptive error.

use std::collections::HashSet;
use std::str::FromStr;

use crate::error::{ConfigError, Result};
use crate::Config;

/// Validate a parsed configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_scheduler(config)?;
    validate_storage(config)?;
    validate_sources(config)?;
    validate_tracked_entities(config)?;
    Ok(())
}

fn validate_scheduler(config: &Config) -> Result<()> {
    cron::Schedule::from_str(&config.scheduler.cron)
        .map_err(|e| ConfigError::invalid_cron(&config.scheduler.cron, e.to_string()))?;

    if config.scheduler.check_interval_secs == 0 {
        return Err(ConfigError::invalid_value(
            "scheduler",
            "scheduler",
            "check_interval_secs",
            "must be positive",
        ));
    }
    Ok(())
}

fn validate_storage(config: &Config) -> Result<()> {
    if config.storage.path.trim().is_empty() {
        return Err(ConfigError::invalid_value(
            "storage",
            "storage",
            "path",
            "must not be empty",
        ));
    }
    Ok(())
}

fn validate_sources(config: &Config) -> Result<()> {
    for (name, source) in config.sources.iter() {
        if source.timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "source",
                name.clone(),
                "timeout_secs",
                "must be positive",
            ));
        }
    }
    Ok(())
}

fn validate_tracked_entities(config: &Config) -> Result<()> {
    let mut user_ids = HashSet::new();
    for user in &config.users {
        if !user_ids.insert(user.id.as_str()) {
            return Err(ConfigError::duplicate_entity("user", &user.id));
        }
        for source_name in user.source_ids.keys() {
            if !config.sources.contains(source_name) {
                return Err(ConfigError::unknown_source(
                    format!("user '{}'", user.id),
                    source_name,
                ));
            }
        }
    }

    let mut project_ids = HashSet::new();
    for project in &config.projects {
        if !project_ids.insert(project.id.as_str()) {
            return Err(ConfigError::duplicate_entity("project", &project.id));
        }
        for source_name in project.source_ids.keys() {
            if !config.sources.contains(source_name) {
                return Err(ConfigError::unknown_source(
                    format!("project '{}'", project.id),
                    source_name,
                ));
            }
        }
    }

    Ok(())
}
