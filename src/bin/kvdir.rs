//! kvdir CLI Binary
//!
//! Command-line interface for browsing a flat key-value store as a tree.

use anyhow::Context;
use clap::Parser;
use kvdir::audit::{AuditRecorder, AuditSink, TracingAuditWriter};
use kvdir::config::ConfigLoader;
use kvdir::logging::init_logging;
use kvdir::tooling::cli::{Cli, CliContext};
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<String> {
    let mut config =
        ConfigLoader::resolve(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_logging_overrides(&mut config.logging);
    init_logging(Some(&config.logging)).context("Failed to initialize logging")?;

    let sink = if config.audit.enabled {
        Some(AuditSink::spawn(
            Arc::new(TracingAuditWriter),
            config.audit.capacity,
        ))
    } else {
        None
    };
    let recorder = sink
        .as_ref()
        .map(AuditSink::recorder)
        .unwrap_or_else(AuditRecorder::disabled);

    let context = CliContext::new(&config, cli.cluster.clone(), cli.resolve_user(), recorder)
        .context("Failed to open cluster registry")?;
    let result = context.execute(&cli.command);
    drop(context);

    if let Some(sink) = sink {
        sink.shutdown().await;
    }
    Ok(result?)
}
