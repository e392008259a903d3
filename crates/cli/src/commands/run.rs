//! `run` command implementation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use batch_runner::{check_preconditions, default_file_name, to_table, BatchRun, BatchRunner};
use contracts::{BroadcastBlueprint, Media, ProgressCallback, ProgressEvent, Recipient};
use dispatcher::ReqwestTransport;
use observability::BatchMetricsAggregator;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cli::RunArgs;
use crate::settings;

/// Execute the `run` command
pub async fn run_broadcast(args: &RunArgs) -> Result<()> {
    let mut blueprint = settings::load_blueprint(args.config.as_deref())?;
    settings::apply_run_overrides(&mut blueprint, args)?;

    let credentials = blueprint.credentials();
    let template = blueprint.template_config();
    check_preconditions(&credentials, &template).context("Cannot start broadcast")?;

    let source = settings::require_source(&blueprint)?;
    let recipients = ingestion::load_recipients(source)
        .await
        .context("Failed to load recipients")?;
    let recipients = ingestion::apply_row_limit(recipients, blueprint.run.row_limit());

    info!(
        recipients = recipients.len(),
        template_id = %template.template_id,
        channel_id = %template.channel_id,
        media = template.media.is_some(),
        log_delay_secs = blueprint.run.log_delay().as_secs_f64(),
        "Configuration loaded"
    );

    if args.dry_run {
        info!("Dry run mode - nothing will be sent");
        print_run_plan(&blueprint, &recipients);
        return Ok(());
    }

    if recipients.is_empty() {
        warn!("Recipient list is empty, nothing to send");
        return Ok(());
    }

    if args.metrics_port > 0 {
        observability::serve_metrics(args.metrics_port)?;
    }

    let transport = ReqwestTransport::new(&blueprint.api.base_url, blueprint.api.timeout())
        .context("Failed to build HTTP client")?;

    let cancel = CancellationToken::new();
    let runner = BatchRunner::new(
        Arc::new(transport),
        credentials,
        template,
        blueprint.run.log_delay(),
    )?
    .with_cancellation(cancel.clone())
    .with_progress(progress_printer());

    let signal_watcher = tokio::spawn(async move {
        shutdown_signal().await;
        warn!("Received shutdown signal, stopping after the current recipient...");
        cancel.cancel();
    });

    let run = runner.run(&recipients).await;
    signal_watcher.abort();

    let output = output_path(&blueprint);
    to_table(&run.results)
        .write_to_path(&output)
        .with_context(|| format!("Failed to write results to {}", output.display()))?;

    print_summary(&run);
    println!("Results written to {}", output.display());

    info!("Qontak broadcast finished");
    Ok(())
}

/// Prints human-readable progress lines to stdout
fn progress_printer() -> ProgressCallback {
    Arc::new(|event: &ProgressEvent| match event {
        ProgressEvent::Completed { .. } => debug!(progress = %event.message(), "Recipient done"),
        _ => println!("{}", event.message()),
    })
}

fn output_path(blueprint: &BroadcastBlueprint) -> PathBuf {
    blueprint.output.path.clone().unwrap_or_else(|| {
        let unix_ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        PathBuf::from(default_file_name(unix_ts))
    })
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn print_summary(run: &BatchRun) {
    let mut aggregator = BatchMetricsAggregator::new();
    for (state, latency) in run.states.iter().zip(&run.send_latencies_ms) {
        aggregator.update(*state, Some(*latency));
    }

    println!();
    print!("{}", aggregator.summary());
    if run.cancelled {
        println!(
            "Stopped early: {} of {} recipients processed",
            run.progress, run.total
        );
    }
}

/// Print what a real run would do
fn print_run_plan(blueprint: &BroadcastBlueprint, recipients: &[Recipient]) {
    let template = blueprint.template_config();

    println!("\n=== Broadcast Plan ===\n");
    println!("API: {}", blueprint.api.base_url);
    println!("  Timeout: {}s", blueprint.api.timeout_secs);
    println!("Template: {}", template.template_id);
    println!("  Channel: {}", template.channel_id);
    println!("  Language: {}", template.language_code);
    match &template.media {
        Media::NoMedia => println!("  Media: none"),
        Media::Image { url, filename } => println!("  Media: {url} ({filename})"),
    }
    println!("Log delay: {:.1}s", blueprint.run.log_delay().as_secs_f64());
    println!("Output: {}", output_path(blueprint).display());

    println!("\nRecipients ({}):", recipients.len());
    super::print_preview(recipients, ingestion::DEFAULT_PREVIEW_ROWS);
    println!();
}
