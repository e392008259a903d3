//! # Batch Runner
//!
//! Sequential broadcast orchestration.
//!
//! Responsibilities:
//! - Preflight checks before any network call
//! - One send (and, with an id, one delayed log fetch) per recipient, in order
//! - Per-recipient failure isolation and cooperative stop
//! - Result aggregation into a CSV table
//!
//! ## Usage Example
//!
//! ```ignore
//! use batch_runner::{to_table, BatchRunner};
//!
//! let runner = BatchRunner::new(transport, credentials, template, delay)?
//!     .with_progress(Arc::new(|event| println!("{}", event.message())));
//! let run = runner.run(&recipients).await;
//! to_table(&run.results).write_to_path(&output)?;
//! ```

mod aggregator;
mod error;
mod preflight;
mod runner;

pub use aggregator::{default_file_name, to_table, ResultTable, COLUMNS};
pub use contracts::{BroadcastResult, DeliveryState};
pub use error::{BatchError, Result};
pub use preflight::check_preconditions;
pub use runner::{BatchRun, BatchRunner};
