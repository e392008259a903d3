//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{BroadcastBlueprint, Media, Recipient, SourceConfig};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::settings;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    config_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    preview: Vec<Recipient>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    api_base: String,
    template_id: String,
    channel_id: String,
    media_url: Option<String>,
    log_delay_secs: f64,
    source: String,
    recipient_count: usize,
}

/// Execute the `validate` command
pub async fn run_validate(args: &ValidateArgs) -> Result<()> {
    let result = validate(args).await;

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Validation failed")
    }
}

async fn validate(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.as_ref().map(|p| p.display().to_string());
    let invalid = |error: String| ValidationResult {
        valid: false,
        config_path: config_path.clone(),
        error: Some(error),
        warnings: Vec::new(),
        summary: None,
        preview: Vec::new(),
    };

    let mut blueprint = match settings::load_blueprint(args.config.as_deref()) {
        Ok(blueprint) => blueprint,
        Err(e) => return invalid(format!("{e:#}")),
    };
    settings::apply_source(&mut blueprint, &args.source);

    let source = match settings::require_source(&blueprint) {
        Ok(source) => source,
        Err(e) => return invalid(e.to_string()),
    };
    info!(source = %describe_source(source), "Validating recipients");

    let recipients = match ingestion::load_recipients(source).await {
        Ok(recipients) => ingestion::apply_row_limit(recipients, blueprint.run.row_limit()),
        Err(e) => return invalid(e.to_string()),
    };

    ValidationResult {
        valid: true,
        config_path: config_path.clone(),
        error: None,
        warnings: collect_warnings(&blueprint, &recipients),
        summary: Some(summarize(&blueprint, source, recipients.len())),
        preview: ingestion::preview(&recipients, args.preview).to_vec(),
    }
}

fn summarize(blueprint: &BroadcastBlueprint, source: &SourceConfig, count: usize) -> ConfigSummary {
    let template = blueprint.template_config();
    ConfigSummary {
        version: format!("{:?}", blueprint.version),
        api_base: blueprint.api.base_url.clone(),
        media_url: match template.media {
            Media::Image { url, .. } => Some(url),
            Media::NoMedia => None,
        },
        template_id: template.template_id,
        channel_id: template.channel_id,
        log_delay_secs: blueprint.run.log_delay().as_secs_f64(),
        source: describe_source(source),
        recipient_count: count,
    }
}

fn describe_source(source: &SourceConfig) -> String {
    match source {
        SourceConfig::Csv { path } => format!("csv:{}", path.display()),
        SourceConfig::GoogleSheet {
            sheet_id,
            sheet_name,
        } => format!("sheet:{sheet_id}/{sheet_name}"),
    }
}

/// Non-fatal issues; `run` turns the first four into errors
fn collect_warnings(blueprint: &BroadcastBlueprint, recipients: &[Recipient]) -> Vec<String> {
    let mut warnings = Vec::new();

    let required = [
        ("client_id", &blueprint.credentials.client_id),
        ("client_secret", &blueprint.credentials.client_secret),
        ("template_id", &blueprint.template.template_id),
        ("channel_id", &blueprint.template.channel_id),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            warnings.push(format!("{field} is not set in the config file (env or flag needed for run)"));
        }
    }

    if recipients.is_empty() {
        warnings.push("Recipient list is empty".to_string());
    }

    let blank_numbers = recipients.iter().filter(|r| r.to_number.is_empty()).count();
    if blank_numbers > 0 {
        warnings.push(format!(
            "{blank_numbers} recipient(s) have an empty to_number and will likely be rejected"
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    let target = result.config_path.as_deref().unwrap_or("<defaults>");

    if result.valid {
        println!("✓ Configuration is valid: {}", target);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  API: {}", summary.api_base);
            println!("  Template: {}", summary.template_id);
            println!("  Channel: {}", summary.channel_id);
            if let Some(ref url) = summary.media_url {
                println!("  Media: {}", url);
            }
            println!("  Log delay: {:.1}s", summary.log_delay_secs);
            println!("  Source: {}", summary.source);
            println!("  Recipients: {}", summary.recipient_count);
        }

        if !result.preview.is_empty() {
            println!("\n  Preview:");
            super::print_preview(&result.preview, result.preview.len());
        }

        if !result.warnings.is_empty() {
            println!("\n⚠ Warnings:");
            for warning in &result.warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Validation failed: {}", target);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SourceArgs;
    use std::io::Write;

    fn args_for(csv: &str) -> (tempfile::NamedTempFile, ValidateArgs) {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(csv.as_bytes()).unwrap();
        let args = ValidateArgs {
            config: None,
            source: SourceArgs {
                recipients: Some(file.path().to_path_buf()),
                ..Default::default()
            },
            preview: 2,
            json: true,
        };
        (file, args)
    }

    #[tokio::test]
    async fn test_valid_csv_with_preview() {
        let (_file, args) = args_for("to_number,to_name\n1,a\n2,b\n3,c\n");
        let result = validate(&args).await;

        assert!(result.valid);
        assert_eq!(result.preview.len(), 2);
        assert_eq!(result.summary.unwrap().recipient_count, 3);
        assert!(result.warnings.iter().any(|w| w.contains("client_id")));
    }

    #[tokio::test]
    async fn test_missing_columns_invalid() {
        let (_file, args) = args_for("phone,name\n1,a\n");
        let result = validate(&args).await;

        assert!(!result.valid);
        assert!(result.error.unwrap().contains("to_number, to_name"));
    }

    #[tokio::test]
    async fn test_no_source_invalid() {
        let args = ValidateArgs {
            config: None,
            source: SourceArgs::default(),
            preview: 20,
            json: false,
        };
        let result = validate(&args).await;
        assert!(!result.valid);
    }
}
