// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cloudflow_collector::doctor;
use cloudflow_collector::server::{Collector, CollectorConfig};
use cloudflow_collector::sink::AppendLog;

const DEFAULT_PORT: u16 = 31000;
const COLLECTOR_HOST: &str = "0.0.0.0";

const MOTD: &str = r"
        _                       _    __   _
  ___  | |   ___    _   _    __| |  / _| | |   ___   __      __
 / __| | |  / _ \  | | | |  / _` | | |_  | |  / _ \  \ \ /\ / /
| (__  | | | (_) | | |_| | | (_| | |  _| | | | (_) |  \ V  V /
 \___| |_|  \___/   \__,_|  \__,_| |_|   |_|  \___/    \_/\_/
";

#[derive(Parser, Debug)]
#[command(
    name = "cloudflow",
    version,
    about = "Local collector for AWS client-side monitoring events"
)]
struct Cli {
    /// Port to listen on for CSM events
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// File to write the sanitized events to
    #[arg(long, default_value = "output.jsonl")]
    output: PathBuf,

    /// Echo each raw payload through the log
    #[arg(long)]
    verbose: bool,

    /// Render received events as a live table
    #[arg(long)]
    pretty: bool,

    /// Check the CSM environment variables and exit
    #[arg(long)]
    doctor: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging();

    info!("Starting Cloudflow UDP server on port {}", cli.port);
    println!("{}", MOTD.bright_white());

    if cli.doctor {
        if let Err(err) = doctor::run() {
            eprintln!("{}", format!("Fatal Error: {err}").red());
            std::process::exit(1);
        }
        return Ok(());
    }

    info!("Writing output to {}", cli.output.display());
    info!("Waiting for AWS API events...");

    tokio::spawn(wait_for_shutdown(cli.output.clone()));

    let sink = AppendLog::open(&cli.output)
        .with_context(|| format!("could not open {}", cli.output.display()))?;
    let config = CollectorConfig {
        host: COLLECTOR_HOST.to_string(),
        port: cli.port,
    };
    let collector = Collector::bind(
        &config,
        sink,
        CancellationToken::new(),
        cli.verbose,
        cli.pretty,
    )
    .await?;

    collector.spin().await?;
    Ok(())
}

fn init_logging() {
    let log_level = env::var("CLOUDFLOW_LOG_LEVEL")
        .map(|val| val.to_lowercase())
        .unwrap_or("info".to_string());

    #[allow(clippy::expect_used)]
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(log_level).expect("could not parse log level in configuration"),
        )
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .finish();

    #[allow(clippy::expect_used)]
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

/// Waits for SIGINT or SIGTERM, points the operator at the output file,
/// and exits. Appends are flushed per event, so exiting between datagrams
/// cannot drop an already-persisted record.
async fn wait_for_shutdown(output: PathBuf) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("Shutting down...");
    info!("Check {} for log events", output.display());
    std::process::exit(0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_collector_contract() {
        let cli = Cli::parse_from(["cloudflow"]);
        assert_eq!(cli.port, 31000);
        assert_eq!(cli.output, PathBuf::from("output.jsonl"));
        assert!(!cli.verbose);
        assert!(!cli.pretty);
        assert!(!cli.doctor);
    }

    #[test]
    fn all_flags_parse() {
        let cli = Cli::parse_from([
            "cloudflow",
            "--port",
            "9999",
            "--output",
            "events.jsonl",
            "--verbose",
            "--pretty",
            "--doctor",
        ]);
        assert_eq!(cli.port, 9999);
        assert_eq!(cli.output, PathBuf::from("events.jsonl"));
        assert!(cli.verbose);
        assert!(cli.pretty);
        assert!(cli.doctor);
    }

    #[test]
    fn out_of_range_ports_are_rejected() {
        assert!(Cli::try_parse_from(["cloudflow", "--port", "70000"]).is_err());
    }
}
