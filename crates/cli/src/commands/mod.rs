//! Command implementations.

mod run;
mod sign;
mod validate;

pub use run::run_broadcast;
pub use sign::run_sign;
pub use validate::run_validate;

use contracts::Recipient;

/// Numbered recipient rows
fn print_preview(recipients: &[Recipient], rows: usize) {
    for (idx, recipient) in ingestion::preview(recipients, rows).iter().enumerate() {
        println!("  {:>3}. {} ({})", idx + 1, recipient.to_name, recipient.to_number);
    }
    if recipients.len() > rows {
        println!("  ... {} more", recipients.len() - rows);
    }
}
