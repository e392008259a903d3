//! BroadcastPayload - MessageRequestBuilder output
//!
//! JSON body of the direct WhatsApp broadcast endpoint.

use serde::{Deserialize, Serialize};

/// Body of `POST /qontak/chat/v1/broadcasts/whatsapp/direct`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastPayload {
    pub to_number: String,
    pub to_name: String,
    pub message_template_id: String,
    pub channel_integration_id: String,
    pub language: Language,
    pub parameters: TemplateParameters,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
}

/// Template parameters
///
/// `header` is omitted from the JSON when no media is configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateParameters {
    /// Body placeholders (always sent, currently empty)
    pub body: Vec<BodyParameter>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<HeaderBlock>,
}

/// Single body placeholder value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyParameter {
    pub key: String,
    pub value: String,
    pub value_text: String,
}

/// Header attachment block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderBlock {
    pub format: HeaderFormat,
    pub params: Vec<KeyValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HeaderFormat {
    Image,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(header: Option<HeaderBlock>) -> BroadcastPayload {
        BroadcastPayload {
            to_number: "628111".to_string(),
            to_name: "Ani".to_string(),
            message_template_id: "tpl".to_string(),
            channel_integration_id: "chan".to_string(),
            language: Language {
                code: "id".to_string(),
            },
            parameters: TemplateParameters { body: vec![], header },
        }
    }

    #[test]
    fn test_header_omitted_without_media() {
        let json = serde_json::to_value(payload(None)).unwrap();
        assert!(json["parameters"].get("header").is_none());
        assert_eq!(json["parameters"]["body"], serde_json::json!([]));
    }

    #[test]
    fn test_header_format_serializes_uppercase() {
        let header = HeaderBlock {
            format: HeaderFormat::Image,
            params: vec![KeyValue::new("url", "https://x/y.jpg")],
        };
        let json = serde_json::to_value(payload(Some(header))).unwrap();
        assert_eq!(json["parameters"]["header"]["format"], "IMAGE");
        assert_eq!(json["parameters"]["header"]["params"][0]["key"], "url");
    }
}
