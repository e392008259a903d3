//! BroadcastBlueprint - Config Loader output
//!
//! Describes a complete broadcast run: API endpoint, credentials, template,
//! recipient source, run options and output routing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::{Credentials, Media, TemplateConfig, DEFAULT_LANGUAGE_CODE};

/// Default API host
pub const DEFAULT_API_BASE: &str = "https://api.mekari.com";

/// Default per-request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default wait before fetching a broadcast log (seconds)
pub const DEFAULT_LOG_DELAY_SECS: f64 = 10.0;

/// Upper bound for the log wait (seconds)
pub const MAX_LOG_DELAY_SECS: f64 = 60.0;

/// Default Google Sheet tab
pub const DEFAULT_SHEET_NAME: &str = "hot_created";

/// Config version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete broadcast configuration blueprint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BroadcastBlueprint {
    /// Config version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Credentials (usually supplied through the environment instead)
    #[serde(default, skip_serializing)]
    pub credentials: CredentialsConfig,

    /// Template settings
    #[serde(default)]
    pub template: TemplateSection,

    /// Run options
    #[serde(default)]
    pub run: RunConfig,

    /// Recipient source
    #[serde(default)]
    pub source: Option<SourceConfig>,

    /// Result output
    #[serde(default)]
    pub output: OutputConfig,
}

impl BroadcastBlueprint {
    /// Credentials for signing
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.credentials.client_id, &self.credentials.client_secret)
    }

    /// Template settings for the request builder
    pub fn template_config(&self) -> TemplateConfig {
        let media = self
            .template
            .media
            .as_ref()
            .map(|m| Media::from_parts(Some(m.url.as_str()), m.filename.as_deref()))
            .unwrap_or_default();

        TemplateConfig {
            template_id: self.template.template_id.trim().to_string(),
            channel_id: self.template.channel_id.trim().to_string(),
            language_code: self.template.language_code.clone(),
            media,
        }
    }
}

/// Remote API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, without trailing path
    #[serde(default = "default_api_base")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Credentials section
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Template section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSection {
    #[serde(default)]
    pub template_id: String,

    /// Channel integration id
    #[serde(default)]
    pub channel_id: String,

    #[serde(default = "default_language_code")]
    pub language_code: String,

    /// Header image (optional)
    #[serde(default)]
    pub media: Option<MediaConfig>,
}

impl Default for TemplateSection {
    fn default() -> Self {
        Self {
            template_id: String::new(),
            channel_id: String::new(),
            language_code: default_language_code(),
            media: None,
        }
    }
}

fn default_language_code() -> String {
    DEFAULT_LANGUAGE_CODE.to_string()
}

/// Header image settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    pub url: String,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Run options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Wait before fetching each broadcast log, 0–60 seconds
    #[serde(default = "default_log_delay_secs")]
    pub log_delay_secs: f64,

    /// Maximum rows to send (0 = all)
    #[serde(default)]
    pub max_rows: usize,
}

impl RunConfig {
    /// Log wait as a duration, clamped to 0–60 seconds (NaN reads as zero)
    pub fn log_delay(&self) -> Duration {
        Duration::from_secs_f64(self.log_delay_secs.max(0.0).min(MAX_LOG_DELAY_SECS))
    }

    /// Row cap, `None` when unlimited
    pub fn row_limit(&self) -> Option<usize> {
        (self.max_rows > 0).then_some(self.max_rows)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            log_delay_secs: default_log_delay_secs(),
            max_rows: 0,
        }
    }
}

fn default_log_delay_secs() -> f64 {
    DEFAULT_LOG_DELAY_SECS
}

/// Recipient source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Local CSV file
    Csv { path: PathBuf },
    /// Public Google Sheet exported as CSV
    GoogleSheet {
        sheet_id: String,
        #[serde(default = "default_sheet_name")]
        sheet_name: String,
    },
}

fn default_sheet_name() -> String {
    DEFAULT_SHEET_NAME.to_string()
}

/// Result output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Results CSV path (default: `broadcast_results_<unix_ts>.csv`)
    #[serde(default)]
    pub path: Option<PathBuf>,
}
