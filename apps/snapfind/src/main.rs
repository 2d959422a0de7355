//! snapfind - Find and download the fastest Celestia node snapshot
//!
//! This is the CLI application: it wires configuration, the event channel and
//! the terminal renderer around the operations in the ops crate.

mod cli;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::Cli;
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use snapfind_config::Config;
use snapfind_events::EventReceiver;
use snapfind_net::NetClient;
use snapfind_ops::{
    ConsolePrompt, DialoguerPrompt, OperationResult, OpsContextBuilder, Prompt, SnapshotRequest,
};
use snapfind_types::{ColorChoice, SelectionMode};
use std::future::Future;
use std::io::IsTerminal;
use std::process;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        if !json_mode {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting snapfind v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli)?;

    let (event_sender, mut event_receiver) = snapfind_events::channel();

    let ops_ctx = OpsContextBuilder::new()
        .with_net(NetClient::with_defaults()?)
        .with_event_sender(event_sender)
        .with_config(config.clone())
        .build()?;

    let colors_enabled = match config.general.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stdout().features().colors_supported(),
    };
    let mut event_handler = EventHandler::new(colors_enabled, cli.global.debug, cli.global.json);
    let renderer = OutputRenderer::new(cli.global.json, colors_enabled);

    let request = SnapshotRequest::new(
        cli.node_type,
        cli.snapshot_type,
        cli.chain_id.clone(),
        cli.selection_mode(),
    );

    let candidates = execute_with_events(
        snapfind_ops::find_snapshot(&ops_ctx, &request),
        &mut event_receiver,
        &mut event_handler,
    )
    .await?;

    // Selection may block on the terminal; its events are flushed afterwards
    let mut prompt = make_prompt(request.mode);
    let selection =
        snapfind_ops::select_snapshot(&ops_ctx, candidates, &request, prompt.as_mut());
    drain_events(&mut event_receiver, &mut event_handler);
    let selection = selection?;

    let result = if cli.dry_run {
        OperationResult::Selection(selection)
    } else {
        let dir = config.download_dir()?;
        let report = execute_with_events(
            snapfind_ops::download_snapshot(&ops_ctx, &selection, &dir),
            &mut event_receiver,
            &mut event_handler,
        )
        .await?;
        OperationResult::Download(report)
    };

    renderer.render_result(&result)?;

    info!("Command completed successfully");
    Ok(())
}

/// Arrow-key menu on a terminal, plain numbered prompt otherwise
fn make_prompt(mode: SelectionMode) -> Box<dyn Prompt> {
    if mode == SelectionMode::Manual && std::io::stdin().is_terminal() {
        Box::new(DialoguerPrompt::new())
    } else {
        Box::new(ConsolePrompt::stdio())
    }
}

/// Run an operation while rendering its events as they arrive
async fn execute_with_events<F, T>(
    operation: F,
    event_receiver: &mut EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<T, CliError>
where
    F: Future<Output = Result<T, snapfind_errors::Error>>,
{
    let mut operation = Box::pin(operation);

    loop {
        select! {
            result = &mut operation => {
                drain_events(event_receiver, event_handler);
                return result.map_err(CliError::from);
            }

            event = event_receiver.recv() => {
                match event {
                    Some(event) => event_handler.handle_event(event),
                    None => { /* Channel closed: keep waiting for the operation to finish */ }
                }
            }
        }
    }
}

fn drain_events(event_receiver: &mut EventReceiver, event_handler: &mut EventHandler) {
    while let Ok(event) = event_receiver.try_recv() {
        event_handler.handle_event(event);
    }
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, cli: &Cli) -> Result<(), CliError> {
    if let Some(color) = cli.global.color {
        config.general.color = color;
    }

    if let Some(url) = &cli.catalog_url {
        snapfind_net::parse_url(url)
            .map_err(|e| CliError::InvalidArguments(format!("--catalog-url: {e}")))?;
        config.catalog.url.clone_from(url);
    }

    if let Some(dir) = &cli.output_dir {
        config.download.dir = Some(dir.clone());
    }

    if cli.chain_id.trim().is_empty() {
        return Err(CliError::InvalidArguments(
            "--chain-id must not be empty (use \"*\" to match any chain)".to_string(),
        ));
    }

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if json_mode && !debug_enabled {
        // Keep stdout clean for the JSON document
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else if debug_enabled {
        // Debug mode: structured JSON logs to file
        if let Some(file) = open_log_file() {
            tracing_subscriber::fmt()
                .json()
                .with_writer(file)
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                        tracing_subscriber::EnvFilter::new(
                            "info,snapfind=debug,snapfind_ops=debug,snapfind_net=debug",
                        )
                    }),
                )
                .init();
            return;
        }
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("info,snapfind=info,snapfind_ops=info")
                }),
            )
            .init();
    } else {
        // Normal mode: minimal logging to stderr
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("warn,snapfind=warn,snapfind_ops=warn")
                }),
            )
            .init();
    }
}

fn open_log_file() -> Option<std::fs::File> {
    let log_dir = Config::log_dir()?;
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {e}");
        return None;
    }

    let log_file = log_dir.join(format!(
        "snapfind-{}.log",
        chrono::Utc::now().format("%Y%m%d-%H%M%S")
    ));
    match std::fs::File::create(&log_file) {
        Ok(file) => {
            eprintln!("Debug logging enabled: {}", log_file.display());
            Some(file)
        }
        Err(e) => {
            eprintln!("Warning: Failed to create log file: {e}");
            None
        }
    }
}
