//! Transport implementations
//!
//! Contains the reqwest-backed HTTP transport and an in-memory mock.

mod http;
mod mock;

pub use self::http::ReqwestTransport;
pub use self::mock::{MockCall, MockTransport};
