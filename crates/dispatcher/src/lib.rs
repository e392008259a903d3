//! # Dispatcher
//!
//! Signed request pipeline for the broadcast API.
//!
//! Responsibilities:
//! - Sign requests with HMAC-SHA256 (`Signer`)
//! - Assemble per-recipient payloads (`MessageRequestBuilder`)
//! - Create broadcasts (`Dispatcher`) and fetch delivery logs (`LogPoller`)
//! - Provide the reqwest transport and an in-memory mock

pub mod dispatcher;
pub mod error;
pub mod log_poller;
pub mod request;
pub mod signer;
pub mod status;
pub mod transport;

pub use contracts::{HttpTransport, SignedHeaders};
pub use dispatcher::{interpret_send_response, Dispatcher, SendOutcome, BROADCAST_DIRECT_PATH};
pub use error::DispatchError;
pub use log_poller::{log_path, LogOutcome, LogPoller};
pub use request::MessageRequestBuilder;
pub use signer::Signer;
pub use status::StatusClass;
pub use transport::{MockCall, MockTransport, ReqwestTransport};
