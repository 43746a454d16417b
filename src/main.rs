use agesweep::{Execution, Scheduler, cleaner, errors::Result};
use clap::Parser;
use log::info;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::cli::Args;

mod cli;
mod logger;
mod vars;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    // Initialize the logger
    logger::init();
    // Resolve the schedule before touching anything
    let at = args.at()?;
    let cleaner = cleaner::init(args.root_dir(), args.extension(), args.max_age_days());

    if args.once {
        cli::once::run(cleaner);
        return Ok(());
    }

    let execution = if args.blocking {
        Execution::Blocking
    } else {
        Execution::Inline
    };
    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            info!("Shutdown signal received");
            cancel.cancel();
        }
    });

    let fired = Scheduler::new(cleaner.clone(), at)
        .execution(execution)
        .run(cancel)
        .await;
    info!("Stopped after {fired} cleanup pass(es)");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
