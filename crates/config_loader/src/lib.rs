//! # Config Loader
//!
//! Broadcast configuration loading.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Produce a `BroadcastBlueprint`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let blueprint = ConfigLoader::load_from_path(Path::new("broadcast.toml")).unwrap();
//! println!("API: {}", blueprint.api.base_url);
//! ```

mod parser;
mod validator;

pub use contracts::BroadcastBlueprint;
pub use parser::ConfigFormat;
pub use validator::validate_log_delay;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Format comes from the file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<BroadcastBlueprint, ContractError> {
        let format = Self::detect_format(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load from `path` when given, otherwise validated defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<BroadcastBlueprint, ContractError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => {
                let blueprint = BroadcastBlueprint::default();
                validator::validate(&blueprint)?;
                Ok(blueprint)
            }
        }
    }

    /// Load configuration from string
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<BroadcastBlueprint, ContractError> {
        let blueprint = parser::parse(content, format)?;
        validator::validate(&blueprint)?;
        Ok(blueprint)
    }

    /// Re-validate a blueprint after overrides
    pub fn validate(blueprint: &BroadcastBlueprint) -> Result<(), ContractError> {
        validator::validate(blueprint)
    }

    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL_TOML: &str = r#"
[credentials]
client_id = "cid"
client_secret = "top-secret"

[template]
template_id = "tpl-1"
channel_id = "chan-1"

[template.media]
url = "https://cdn.example.test/banner.png"
filename = "promo.png"

[run]
log_delay_secs = 0.0

[source]
kind = "csv"
path = "recipients.csv"
"#;

    #[test]
    fn test_load_from_str_toml() {
        let bp = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        assert_eq!(bp.template.template_id, "tpl-1");
        assert_eq!(bp.run.log_delay().as_secs(), 0);
    }

    #[test]
    fn test_load_from_str_json() {
        let content = r#"{
            "template": {"template_id": "tpl-json", "channel_id": "chan-json"},
            "run": {"log_delay_secs": 5}
        }"#;
        let bp = ConfigLoader::load_from_str(content, ConfigFormat::Json).unwrap();
        assert_eq!(bp.template.channel_id, "chan-json");
        assert_eq!(bp.run.log_delay().as_secs(), 5);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = "[run]\nlog_delay_secs = 120\n";
        let err = ConfigLoader::load_from_str(content, ConfigFormat::Toml).unwrap_err();
        assert!(matches!(err, ContractError::ConfigValidation { .. }));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(MINIMAL_TOML.as_bytes()).unwrap();

        let bp = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(bp.credentials().client_id, "cid");
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = ConfigLoader::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported"));
    }

    #[test]
    fn test_load_or_default() {
        let bp = ConfigLoader::load_or_default(None).unwrap();
        assert_eq!(bp.api.timeout_secs, 60);
    }
}
