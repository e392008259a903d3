//! Signer - HMAC-SHA256 request signing
//!
//! The remote API authenticates a request by an HMAC over two lines:
//!
//! ```text
//! date: <Date header value>
//! <METHOD> <path> HTTP/1.1
//! ```
//!
//! keyed by the client secret and base64-encoded into the `Authorization`
//! header. The `Date` header must carry exactly the string that was signed.

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use chrono::{DateTime, Utc};
use contracts::{Credentials, HttpMethod, SignedHeaders};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Algorithm name carried in the authorization header
pub const SIGNATURE_ALGORITHM: &str = "hmac-sha256";

/// Header list carried in the authorization header
pub const SIGNED_HEADER_NAMES: &str = "date request-line";

/// RFC 1123 date layout, always GMT
const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Request signer bound to one credential pair
#[derive(Debug, Clone)]
pub struct Signer {
    credentials: Credentials,
}

impl Signer {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Sign a request line using the current clock
    pub fn sign(&self, method: HttpMethod, path: &str) -> SignedHeaders {
        self.sign_at(method, path, Utc::now())
    }

    /// Sign a request line at a fixed instant
    pub fn sign_at(&self, method: HttpMethod, path: &str, at: DateTime<Utc>) -> SignedHeaders {
        let date = format_date(at);
        let canonical = canonical_string(&date, method, path);
        let signature = hmac_base64(&self.credentials.client_secret, &canonical);

        SignedHeaders {
            authorization: format!(
                r#"hmac username="{}", algorithm="{}", headers="{}", signature="{}""#,
                self.credentials.client_id, SIGNATURE_ALGORITHM, SIGNED_HEADER_NAMES, signature
            ),
            date,
        }
    }
}

/// Format an instant as the `Date` header value
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format(DATE_FORMAT).to_string()
}

/// Build the string that gets signed
pub fn canonical_string(date: &str, method: HttpMethod, path: &str) -> String {
    format!("date: {date}\n{} {path} HTTP/1.1", method.as_str())
}

fn hmac_base64(secret: &str, message: &str) -> String {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC key can be of any size"),
    };
    mac.update(message.as_bytes());
    BASE64_STANDARD.encode(mac.finalize().into_bytes())
}
