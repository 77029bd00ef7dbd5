//! Real OS signals delivered to the shutdown channel.

#![cfg(unix)]

use std::process::Command;
use std::time::Duration;

use app_registry::{AppContext, Signal};

#[tokio::test]
async fn test_hangup_releases_waiter() {
    let ctx = AppContext::new();
    let listener = ctx.install_signal_handlers().unwrap();

    let status = Command::new("kill")
        .args(["-HUP", &std::process::id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    let signal = tokio::time::timeout(Duration::from_secs(5), ctx.wait_for_shutdown_sig())
        .await
        .unwrap();
    assert_eq!(signal, Some(Signal::Hangup));

    listener.abort();
}
