//! Checks run once before any network call

use contracts::{Credentials, TemplateConfig};

use crate::error::{BatchError, Result};

/// Require credentials, template id and channel id.
///
/// Reports the first blank value in that order.
pub fn check_preconditions(credentials: &Credentials, template: &TemplateConfig) -> Result<()> {
    let required = [
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.as_str()),
        ("template_id", template.template_id.as_str()),
        ("channel_id", template.channel_id.as_str()),
    ];

    match required.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((field, _)) => Err(BatchError::missing_required(*field)),
        None => Ok(()),
    }
}
