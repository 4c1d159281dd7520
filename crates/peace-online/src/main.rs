//! peace-online: terminal host for the presence manager.
//!
//! Mounts one presence manager, prints the online count whenever it changes,
//! and forwards host signals typed on stdin (`visible`, `hidden`, `focus`,
//! `quit`). Logs go to stderr so stdout carries only the count.

mod cli;
mod commands;
mod settings;

use std::sync::Arc;

use clap::Parser;
use peace_presence::{PresenceManager, PresenceView, WebSocketTransport};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::cli::Args;
use crate::commands::Command;

/// Filter used while the config (and its `logging.level`) is being read.
const STARTUP_LOG_LEVEL: &str = "info";

#[tokio::main]
async fn main() -> peace_common::Result<()> {
    let args = Args::parse();

    let config = tracing::subscriber::with_default(stderr_logger(STARTUP_LOG_LEVEL), || {
        peace_config::load_config(args.config.as_deref(), |config| args.apply(config))
    })?;
    stderr_logger(config.logging.level.as_directive()).init();

    let tokens = settings::token_source(&config.presence, args.token.as_deref());
    let manager = PresenceManager::mount(
        settings::presence_config(&config.presence),
        Arc::new(WebSocketTransport::new()),
        tokens,
        args.visibility(),
    );
    info!(url = %config.presence.server_url, "peace-online started");

    let outcome = run(&manager).await;

    let view = manager.subscribe();
    manager.unmount().await;
    print_view(&view.borrow());
    outcome
}

/// `RUST_LOG` wins; otherwise `fallback`.
fn stderr_logger(fallback: &str) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .finish()
}

/// Print view changes and forward stdin commands until `quit`, ctrl-c, or
/// the manager stops.
async fn run(manager: &PresenceManager) -> peace_common::Result<()> {
    let mut view = manager.subscribe();
    print_view(&view.borrow_and_update());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = view.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                print_view(&view.borrow_and_update());
            }

            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => match Command::parse(&line) {
                    Some(Command::Visibility(visibility)) => {
                        manager.visibility_changed(visibility).await
                    }
                    Some(Command::Focus) => manager.focused().await,
                    Some(Command::Quit) => return Ok(()),
                    None if line.trim().is_empty() => {}
                    None => warn!(input = %line.trim(), "Unknown command"),
                },
                None => stdin_open = false,
            },

            signal = &mut ctrl_c => {
                signal?;
                info!("Interrupted");
                return Ok(());
            }
        }
    }
}

fn print_view(view: &PresenceView) {
    println!("online: {} ({})", view.online_count, view.status);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_logger_is_active_while_loading() {
        let seen = tracing::subscriber::with_default(stderr_logger(STARTUP_LOG_LEVEL), || {
            tracing::enabled!(tracing::Level::ERROR)
        });
        assert!(seen);
    }
}
