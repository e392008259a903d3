//! `sign` command implementation.

use anyhow::Result;
use contracts::{Credentials, HttpMethod};
use dispatcher::Signer;

use crate::cli::SignArgs;
use crate::error::CliError;

/// Print `Authorization` and `Date` for one request
pub fn run_sign(args: &SignArgs) -> Result<()> {
    let client_id = required(&args.client_id, "client_id")?;
    let client_secret = required(&args.client_secret, "client_secret")?;

    let signer = Signer::new(Credentials::new(client_id, client_secret));
    let method = HttpMethod::from(args.method);
    let headers = signer.sign(method, &args.path);

    println!("{} {}", method, args.path);
    println!("Authorization: {}", headers.authorization);
    println!("Date: {}", headers.date);
    Ok(())
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, CliError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CliError::missing_credential(field))
}
