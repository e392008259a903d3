//! MessageRequestBuilder - per-recipient payload assembly

use contracts::{
    BroadcastPayload, HeaderBlock, HeaderFormat, KeyValue, Language, Media, Recipient,
    TemplateConfig, TemplateParameters,
};

/// Builds the direct-broadcast body for one recipient.
///
/// Recipients are passed through untouched; the remote API validates them.
pub struct MessageRequestBuilder;

impl MessageRequestBuilder {
    pub fn build(recipient: &Recipient, template: &TemplateConfig) -> BroadcastPayload {
        BroadcastPayload {
            to_number: recipient.to_number.clone(),
            to_name: recipient.to_name.clone(),
            message_template_id: template.template_id.clone(),
            channel_integration_id: template.channel_id.clone(),
            language: Language {
                code: template.language_code.clone(),
            },
            parameters: TemplateParameters {
                body: Vec::new(),
                header: header_block(&template.media),
            },
        }
    }
}

fn header_block(media: &Media) -> Option<HeaderBlock> {
    match media {
        Media::NoMedia => None,
        Media::Image { url, filename } => Some(HeaderBlock {
            format: HeaderFormat::Image,
            params: vec![
                KeyValue::new("url", url.as_str()),
                KeyValue::new("filename", filename.as_str()),
            ],
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_without_media() {
        let recipient = Recipient::new("6281234", "Rina");
        let template = TemplateConfig::new("tpl-1", "chan-1");

        let payload = MessageRequestBuilder::build(&recipient, &template);
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value,
            json!({
                "to_number": "6281234",
                "to_name": "Rina",
                "message_template_id": "tpl-1",
                "channel_integration_id": "chan-1",
                "language": {"code": "id"},
                "parameters": {"body": []}
            })
        );
    }

    #[test]
    fn test_build_with_image() {
        let recipient = Recipient::new("6281234", "Rina");
        let template = TemplateConfig::new("tpl-1", "chan-1").with_media(Media::Image {
            url: "https://cdn.example/banner.jpg".to_string(),
            filename: "banner.jpg".to_string(),
        });

        let value = serde_json::to_value(MessageRequestBuilder::build(&recipient, &template)).unwrap();

        assert_eq!(
            value["parameters"]["header"],
            json!({
                "format": "IMAGE",
                "params": [
                    {"key": "url", "value": "https://cdn.example/banner.jpg"},
                    {"key": "filename", "value": "banner.jpg"}
                ]
            })
        );
    }

    #[test]
    fn test_empty_recipient_passed_through() {
        let recipient = Recipient::default();
        let template = TemplateConfig::new("tpl", "chan");
        let payload = MessageRequestBuilder::build(&recipient, &template);
        assert_eq!(payload.to_number, "");
        assert_eq!(payload.to_name, "");
    }
}
