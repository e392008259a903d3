//! CLI/environment overrides on top of the config file.

use std::path::Path;

use anyhow::{Context, Result};
use config_loader::{validate_log_delay, ConfigLoader};
use contracts::{BroadcastBlueprint, MediaConfig, SourceConfig, DEFAULT_SHEET_NAME};
use tracing::info;

use crate::cli::{CredentialArgs, RunArgs, SourceArgs};
use crate::error::CliError;

/// Load the config file (or defaults)
pub fn load_blueprint(path: Option<&Path>) -> Result<BroadcastBlueprint> {
    if let Some(path) = path {
        info!(config = %path.display(), "Loading configuration");
        if !path.exists() {
            return Err(CliError::config_not_found(path.display().to_string()).into());
        }
    }

    ConfigLoader::load_or_default(path).with_context(|| match path {
        Some(path) => format!("Failed to load config from {}", path.display()),
        None => "Invalid default configuration".to_string(),
    })
}

/// Apply every `run` override, then re-validate
pub fn apply_run_overrides(blueprint: &mut BroadcastBlueprint, args: &RunArgs) -> Result<()> {
    apply_credentials(blueprint, &args.credentials);
    apply_source(blueprint, &args.source);

    if let Some(base_url) = &args.base_url {
        info!(base_url = %base_url, "Overriding API base URL from CLI");
        blueprint.api.base_url = base_url.clone();
    }
    if let Some(url) = &args.media_url {
        blueprint.template.media = Some(MediaConfig {
            url: url.clone(),
            filename: args.media_filename.clone(),
        });
    }
    if let Some(delay) = args.log_delay {
        validate_log_delay(delay)?;
        blueprint.run.log_delay_secs = delay;
    }
    if let Some(output) = &args.output {
        blueprint.output.path = Some(output.clone());
    }

    ConfigLoader::validate(blueprint).context("Invalid configuration after overrides")?;
    Ok(())
}

/// Non-empty values override the config file
pub fn apply_credentials(blueprint: &mut BroadcastBlueprint, args: &CredentialArgs) {
    let overrides = [
        (&args.client_id, &mut blueprint.credentials.client_id),
        (&args.client_secret, &mut blueprint.credentials.client_secret),
        (&args.template_id, &mut blueprint.template.template_id),
        (&args.channel_id, &mut blueprint.template.channel_id),
    ];

    for (value, target) in overrides {
        if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            *target = value.to_string();
        }
    }
}

/// `--recipients` beats a sheet id, which beats the config `[source]`
pub fn apply_source(blueprint: &mut BroadcastBlueprint, args: &SourceArgs) {
    if let Some(path) = &args.recipients {
        blueprint.source = Some(SourceConfig::Csv { path: path.clone() });
    } else if let Some(sheet_id) = args.sheet_id.as_deref().filter(|s| !s.trim().is_empty()) {
        blueprint.source = Some(SourceConfig::GoogleSheet {
            sheet_id: sheet_id.trim().to_string(),
            sheet_name: args
                .sheet_name
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string()),
        });
    }

    if let Some(max_rows) = args.max_rows {
        blueprint.run.max_rows = max_rows;
    }
}

/// The configured recipient source
pub fn require_source(blueprint: &BroadcastBlueprint) -> Result<&SourceConfig, CliError> {
    blueprint.source.as_ref().ok_or(CliError::NoRecipientSource)
}
