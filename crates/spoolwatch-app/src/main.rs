// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spoolwatch — unattended watched-folder print spooler.
//
// Entry point. Parses the command line, initialises logging, bootstraps the
// watch and completion directories, and runs the pipeline until the operator
// quits or the watch is lost.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::io::AsyncBufReadExt;
use tokio::sync::oneshot;
use tracing::{debug, error, info};

use spoolwatch_core::{Result, WatchConfiguration};
use spoolwatch_pipeline::Pipeline;

/// Command-line options.
#[derive(Debug, Parser)]
#[command(
    name = "spoolwatch",
    version,
    about = "Drop a file in a folder, have it printed"
)]
struct Options {
    /// Directory to watch for newly arrived documents.
    #[arg(long = "watchpath")]
    watchpath: PathBuf,

    /// Name of the target printer (print tool default when omitted).
    #[arg(long = "printer")]
    printer: Option<String>,

    /// Where to place documents once printed (defaults to a `printed`
    /// subdirectory of the watch path).
    #[arg(long = "printedpath")]
    printedpath: Option<PathBuf>,

    /// Path to the external print-capable executable.
    #[arg(long = "tool")]
    tool: Option<PathBuf>,
}

/// Map parsed options onto the immutable pipeline configuration.
fn build_config(options: Options) -> WatchConfiguration {
    WatchConfiguration::new(
        options.watchpath,
        options.printedpath,
        options.printer,
        options.tool,
    )
}

#[tokio::main]
async fn main() -> ExitCode {
    let options = match Options::try_parse() {
        Ok(options) => options,
        Err(e) => {
            // Argument validation failures exit 1 before the pipeline
            // starts; --help and --version are normal exits.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Spoolwatch starting");

    match run(build_config(options)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "pipeline stopped");
            ExitCode::from(1)
        }
    }
}

async fn run(config: WatchConfiguration) -> Result<()> {
    info!(printer = config.printer.as_deref().unwrap_or("(default)"), "printer");
    info!(path = %config.watch_dir.display(), "watch path");
    info!(path = %config.completed_dir.display(), "printed path");
    debug!(
        config = %serde_json::to_string(&config).unwrap_or_default(),
        "resolved configuration"
    );

    // Both directories must exist before the watch starts.
    std::fs::create_dir_all(&config.watch_dir)?;
    std::fs::create_dir_all(&config.completed_dir)?;

    let (quit_tx, quit_rx) = oneshot::channel();
    let pipeline = Pipeline::new(config);
    let run = pipeline.run(quit_rx);
    tokio::pin!(run);

    println!("Monitoring. Press 'q' then ENTER to quit.");

    tokio::select! {
        result = &mut run => result,
        _ = read_quit_command() => {
            info!("quit requested — shutting down");
            let _ = quit_tx.send(());
            run.await
        }
    }
}

/// Block until the operator types a quit command on stdin.
///
/// Accepts `q` or `quit`, case-insensitive. EOF counts as quit too, so the
/// process winds down when its input is closed.
async fn read_quit_command() {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let command = line.trim().to_ascii_lowercase();
                if command == "q" || command == "quit" {
                    return;
                }
            }
            Ok(None) | Err(_) => return,
        }
    }
}
