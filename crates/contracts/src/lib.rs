//! # Contracts
//!
//! Frozen interface contracts shared by every broadcaster crate: recipient and
//! template data, the outbound payload, result records, the HTTP transport
//! seam and progress events.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Ordering Model
//! - A batch run consumes recipients in input order and yields exactly one
//!   `BroadcastResult` per recipient in that same order.

mod blueprint;
mod error;
mod payload;
mod progress;
mod recipient;
mod result;
mod transport;

pub use blueprint::*;
pub use error::*;
pub use payload::*;
pub use progress::*;
pub use recipient::*;
pub use result::*;
pub use transport::*;
