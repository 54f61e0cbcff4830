mod config;
mod protocol;
mod server;
mod telemetry;
mod tools;

use std::sync::Arc;

use project_rules_core::RuleStore;
use tokio::io::BufReader;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::server::Dispatcher;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::initialise()?;

    let config = ServerConfig::from_current_dir()?;
    let store = Arc::new(RuleStore::load_or_default(&config.rules_path));
    info!(
        path = %config.rules_path.display(),
        sections = store.document().sections.len(),
        "rules loaded"
    );

    let dispatcher = Dispatcher::new(store, config.identity);
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    tokio::select! {
        result = server::serve(&dispatcher, stdin, stdout) => {
            result.inspect_err(|e| warn!(error = %e, "server stopped"))?;
        }
        signal = shutdown_signal() => {
            info!(signal, "shutting down");
            // The blocking stdin reader can't be cancelled, so don't wait for
            // the runtime to wind down.
            std::process::exit(0);
        }
    }
    Ok(())
}

/// Resolves with the name of the first termination signal received.
#[cfg(unix)]
async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "SIGTERM handler unavailable");
            return ctrl_c().await;
        }
    };
    tokio::select! {
        name = ctrl_c() => name,
        _ = terminate.recv() => "SIGTERM",
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> &'static str {
    ctrl_c().await
}

async fn ctrl_c() -> &'static str {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "SIGINT handler unavailable");
        std::future::pending::<()>().await;
    }
    "SIGINT"
}
