//! Config validation
//!
//! Rules:
//! - api.base_url is an http(s) URL
//! - api.timeout_secs > 0
//! - run.log_delay_secs is finite and within 0–60
//! - template.media.url is non-empty when the section is present
//! - source parameters are present
//!
//! Credentials and template ids are not checked here; the batch preflight
//! does that after CLI and environment overrides are applied.

use contracts::{BroadcastBlueprint, ContractError, SourceConfig, MAX_LOG_DELAY_SECS};

/// Validate a blueprint, returning the first error found
pub fn validate(blueprint: &BroadcastBlueprint) -> Result<(), ContractError> {
    validate_api(blueprint)?;
    validate_run(blueprint)?;
    validate_media(blueprint)?;
    validate_source(blueprint)?;
    Ok(())
}

fn validate_api(blueprint: &BroadcastBlueprint) -> Result<(), ContractError> {
    let base_url = blueprint.api.base_url.trim();
    if base_url.is_empty() {
        return Err(ContractError::config_validation(
            "api.base_url",
            "base_url cannot be empty",
        ));
    }
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ContractError::config_validation(
            "api.base_url",
            format!("base_url must start with http:// or https://, got '{base_url}'"),
        ));
    }
    if blueprint.api.timeout_secs == 0 {
        return Err(ContractError::config_validation(
            "api.timeout_secs",
            "timeout_secs must be > 0",
        ));
    }
    Ok(())
}

/// Check a log delay value, shared with CLI overrides
pub fn validate_log_delay(secs: f64) -> Result<(), ContractError> {
    if !secs.is_finite() || !(0.0..=MAX_LOG_DELAY_SECS).contains(&secs) {
        return Err(ContractError::config_validation(
            "run.log_delay_secs",
            format!("log_delay_secs must be within 0-{MAX_LOG_DELAY_SECS}, got {secs}"),
        ));
    }
    Ok(())
}

fn validate_run(blueprint: &BroadcastBlueprint) -> Result<(), ContractError> {
    validate_log_delay(blueprint.run.log_delay_secs)
}

fn validate_media(blueprint: &BroadcastBlueprint) -> Result<(), ContractError> {
    if let Some(media) = &blueprint.template.media {
        if media.url.trim().is_empty() {
            return Err(ContractError::config_validation(
                "template.media.url",
                "media url cannot be empty",
            ));
        }
    }
    Ok(())
}

fn validate_source(blueprint: &BroadcastBlueprint) -> Result<(), ContractError> {
    match &blueprint.source {
        None => Ok(()),
        Some(SourceConfig::Csv { path }) if path.as_os_str().is_empty() => Err(
            ContractError::config_validation("source.path", "csv path cannot be empty"),
        ),
        Some(SourceConfig::GoogleSheet {
            sheet_id,
            sheet_name,
        }) => {
            if sheet_id.trim().is_empty() {
                return Err(ContractError::config_validation(
                    "source.sheet_id",
                    "sheet_id cannot be empty",
                ));
            }
            if sheet_name.trim().is_empty() {
                return Err(ContractError::config_validation(
                    "source.sheet_name",
                    "sheet_name cannot be empty",
                ));
            }
            Ok(())
        }
        Some(SourceConfig::Csv { .. }) => Ok(()),
    }
}
