//! Application registry host process.
//!
//! # Data Flow
//!
//! ```text
//! boot.yaml ──▶ AppContext::bootstrap_all_from_yaml
//!                   built-in ─▶ plugin ─▶ web-frame ─▶ user-defined
//!                                                        │
//!                   (optional) probe router /readyz /livez
//!                                                        │
//! SIGHUP/SIGINT/SIGTERM/SIGQUIT ──▶ wait_for_shutdown_sig ▼
//!                   run shutdown hooks ─▶ interrupt entries ─▶ exit
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use app_registry::config::loader::load_boot_file;
use app_registry::health::probe_router;
use app_registry::observability::logging;
use app_registry::AppContext;

#[derive(Parser)]
#[command(name = "app-registry")]
#[command(about = "Bootstrap application entries from a boot document and wait for shutdown", long_about = None)]
struct Cli {
    /// Path of the YAML boot document
    #[arg(short, long, default_value = "boot.yaml")]
    boot: PathBuf,

    /// Serve /readyz and /livez on this address
    #[arg(short, long)]
    probe_address: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    logging::init("app_registry=info")?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "app-registry starting");

    let ctx = AppContext::global();
    let _signals = ctx.install_signal_handlers()?;

    let raw = load_boot_file(&cli.boot)?;
    let count = ctx.bootstrap_all_from_yaml(&raw)?;
    tracing::info!(
        boot = %cli.boot.display(),
        entries = count,
        "Entries bootstrapped"
    );

    if let Some(addr) = cli.probe_address {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(address = %listener.local_addr()?, "Serving probes");

        let router = probe_router(ctx.clone());
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!(error = %e, "Probe server failed");
            }
        });
    }

    let signal = ctx.wait_for_shutdown_sig().await;
    tracing::info!(signal = ?signal, "Shutting down");

    for (name, hook) in ctx.list_shutdown_hooks() {
        tracing::debug!(hook = %name, "Running shutdown hook");
        hook.run();
    }

    for entries in ctx.list_entries().into_values() {
        for entry in entries.values() {
            entry.interrupt(&ctx);
            tracing::debug!(
                entry_type = %entry.entry_type(),
                entry_name = %entry.name(),
                "Entry interrupted"
            );
        }
    }

    tracing::info!(uptime_ms = ctx.uptime().as_millis() as u64, "Shutdown complete");
    Ok(())
}
