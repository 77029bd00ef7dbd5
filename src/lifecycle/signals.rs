//! OS signal handling.
//!
//! # Responsibilities
//! - Register handlers for SIGHUP, SIGINT, SIGTERM and SIGQUIT
//! - Forward every received signal into the shutdown channel
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe); must be called inside a runtime
//! - The listener keeps running after a signal; whether a second signal
//!   matters is up to whoever waits on the channel
//! - Non-unix targets only see ctrl-c, reported as an interrupt

use std::io;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::lifecycle::shutdown::Signal;
use crate::observability::metrics;

/// Spawn a task forwarding termination signals to `sender`.
///
/// The task ends once the receiving side is dropped.
#[cfg(unix)]
pub fn listen(sender: mpsc::UnboundedSender<Signal>) -> io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = signal(SignalKind::hangup())?;
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;

    Ok(tokio::spawn(async move {
        loop {
            let received = tokio::select! {
                _ = hangup.recv() => Signal::Hangup,
                _ = interrupt.recv() => Signal::Interrupt,
                _ = terminate.recv() => Signal::Terminate,
                _ = quit.recv() => Signal::Quit,
            };

            if !forward(&sender, received) {
                break;
            }
        }
    }))
}

/// Spawn a task forwarding ctrl-c to `sender`.
#[cfg(not(unix))]
pub fn listen(sender: mpsc::UnboundedSender<Signal>) -> io::Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                break;
            }
            if !forward(&sender, Signal::Interrupt) {
                break;
            }
        }
    }))
}

fn forward(sender: &mpsc::UnboundedSender<Signal>, signal: Signal) -> bool {
    tracing::info!(signal = %signal, "Shutdown signal received");
    metrics::record_shutdown_signal(signal.as_str());

    if sender.send(signal).is_err() {
        tracing::debug!("Shutdown channel closed, signal listener exiting");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_listen_installs_handlers() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let handle = listen(tx).unwrap();
        assert!(!handle.is_finished());
        handle.abort();
    }

    #[test]
    fn test_forward_reports_closed_channel() {
        let (tx, rx) = mpsc::unbounded_channel();
        assert!(forward(&tx, Signal::Terminate));
        drop(rx);
        assert!(!forward(&tx, Signal::Terminate));
    }
}
