//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use contracts::HttpMethod;
use dispatcher::BROADCAST_DIRECT_PATH;

/// Qontak Broadcast - WhatsApp template broadcaster
#[derive(Parser, Debug)]
#[command(
    name = "qontak-broadcast",
    author,
    version,
    about = "Send a WhatsApp template to a recipient list through the Qontak API",
    long_about = "Sends one signed broadcast per recipient, waits, fetches each delivery log \n\
                  and writes one result row per recipient to CSV.\n\n\
                  Credentials and ids can come from the environment or a .env file."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "QONTAK_BROADCAST_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "QONTAK_BROADCAST_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send the template to every recipient
    Run(RunArgs),

    /// Validate configuration and recipients without sending
    Validate(ValidateArgs),

    /// Print signed headers for a request (debugging aid)
    Sign(SignArgs),
}

/// API credentials and template ids
#[derive(Args, Debug, Clone, Default)]
pub struct CredentialArgs {
    #[arg(long, env = "CLIENT_ID")]
    pub client_id: Option<String>,

    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Message template id
    #[arg(long, env = "TEMPLATE_ID")]
    pub template_id: Option<String>,

    /// Channel integration id
    #[arg(long, env = "CHANNEL_ID")]
    pub channel_id: Option<String>,
}

/// Recipient source
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Recipient CSV file (columns: to_number, to_name)
    #[arg(short, long)]
    pub recipients: Option<PathBuf>,

    /// Public Google Sheet id, used when no CSV is given
    #[arg(long, env = "SHEET_ID")]
    pub sheet_id: Option<String>,

    /// Google Sheet tab name
    #[arg(long, env = "SHEET_NAME")]
    pub sheet_name: Option<String>,

    /// Send to the first N rows only (0 = all)
    #[arg(long)]
    pub max_rows: Option<usize>,
}

/// Arguments for the `run` command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, env = "QONTAK_BROADCAST_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub credentials: CredentialArgs,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Override API base URL
    #[arg(long, env = "QONTAK_API_BASE")]
    pub base_url: Option<String>,

    /// Header image URL
    #[arg(long)]
    pub media_url: Option<String>,

    /// Header image filename (default: banner.jpg)
    #[arg(long, requires = "media_url")]
    pub media_filename: Option<String>,

    /// Seconds to wait before fetching each delivery log (0-60)
    #[arg(long)]
    pub log_delay: Option<f64>,

    /// Results CSV path (default: broadcast_results_<unix_ts>.csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Check everything and preview recipients without sending
    #[arg(long)]
    pub dry_run: bool,

    /// Prometheus metrics port (0 = disabled)
    #[arg(long, default_value = "0", env = "QONTAK_BROADCAST_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, env = "QONTAK_BROADCAST_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Rows to preview
    #[arg(long, default_value = "20")]
    pub preview: usize,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `sign` command
#[derive(Args, Debug)]
pub struct SignArgs {
    #[arg(long, value_enum, default_value = "post")]
    pub method: SignMethod,

    /// Request path
    #[arg(long, default_value = BROADCAST_DIRECT_PATH)]
    pub path: String,

    #[arg(long, env = "CLIENT_ID")]
    pub client_id: Option<String>,

    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum SignMethod {
    Get,
    Post,
}

impl From<SignMethod> for HttpMethod {
    fn from(method: SignMethod) -> Self {
        match method {
            SignMethod::Get => HttpMethod::Get,
            SignMethod::Post => HttpMethod::Post,
        }
    }
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "qontak-broadcast",
            "run",
            "--recipients",
            "leads.csv",
            "--log-delay",
            "0",
            "--max-rows",
            "5",
            "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.source.recipients, Some(PathBuf::from("leads.csv")));
                assert_eq!(args.log_delay, Some(0.0));
                assert_eq!(args.source.max_rows, Some(5));
                assert!(args.dry_run);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_sign_defaults() {
        let cli = Cli::try_parse_from(["qontak-broadcast", "sign", "--method", "get"]).unwrap();
        match cli.command {
            Commands::Sign(args) => {
                assert!(matches!(args.method, SignMethod::Get));
                assert_eq!(args.path, BROADCAST_DIRECT_PATH);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
