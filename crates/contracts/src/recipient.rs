//! Batch inputs: credentials, template settings and recipients.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default media filename when only a URL is configured
pub const DEFAULT_MEDIA_FILENAME: &str = "banner.jpg";

/// Default template language code
pub const DEFAULT_LANGUAGE_CODE: &str = "id";

/// API credentials used for HMAC signing.
///
/// Never persisted. `Debug` redacts the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Optional media attached to the template header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Media {
    #[default]
    NoMedia,
    Image {
        url: String,
        filename: String,
    },
}

impl Media {
    /// Build media from optional config values.
    ///
    /// A blank URL means no media; a blank filename falls back to
    /// [`DEFAULT_MEDIA_FILENAME`].
    pub fn from_parts(url: Option<&str>, filename: Option<&str>) -> Self {
        let url = match url.map(str::trim) {
            Some(url) if !url.is_empty() => url,
            _ => return Self::NoMedia,
        };

        let filename = filename
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_MEDIA_FILENAME);

        Self::Image {
            url: url.to_string(),
            filename: filename.to_string(),
        }
    }

    pub fn is_some(&self) -> bool {
        matches!(self, Self::Image { .. })
    }
}

/// Template settings, constant across a batch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateConfig {
    pub template_id: String,
    pub channel_id: String,
    pub language_code: String,
    pub media: Media,
}

impl TemplateConfig {
    pub fn new(template_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            channel_id: channel_id.into(),
            language_code: DEFAULT_LANGUAGE_CODE.to_string(),
            media: Media::NoMedia,
        }
    }

    pub fn with_media(mut self, media: Media) -> Self {
        self.media = media;
        self
    }
}

/// One input row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub to_number: String,
    pub to_name: String,
}

impl Recipient {
    /// Create a recipient, trimming surrounding whitespace
    pub fn new(to_number: impl AsRef<str>, to_name: impl AsRef<str>) -> Self {
        Self {
            to_number: to_number.as_ref().trim().to_string(),
            to_name: to_name.as_ref().trim().to_string(),
        }
    }
}
