//! Shutdown coordination: the signal channel and named shutdown hooks.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{mpsc, Mutex};

/// Termination signals the process reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Hangup,
    Interrupt,
    Terminate,
    Quit,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Hangup => "SIGHUP",
            Signal::Interrupt => "SIGINT",
            Signal::Terminate => "SIGTERM",
            Signal::Quit => "SIGQUIT",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Channel that delivers shutdown signals to a single waiter.
///
/// Each received signal releases exactly one call to [`wait`](Self::wait).
pub struct ShutdownSignal {
    tx: mpsc::UnboundedSender<Signal>,
    rx: Mutex<mpsc::UnboundedReceiver<Signal>>,
}

impl ShutdownSignal {
    /// Create a new shutdown channel.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    /// Sender half, for signal listeners and tests.
    pub fn sender(&self) -> mpsc::UnboundedSender<Signal> {
        self.tx.clone()
    }

    /// Deliver `signal` as if the OS had sent it.
    pub fn trigger(&self, signal: Signal) {
        // The receiver lives as long as `self`, so the send cannot fail.
        let _ = self.tx.send(signal);
    }

    /// Wait for the next signal.
    ///
    /// Returns `None` only if every sender is gone, which cannot happen while
    /// `self` is alive.
    pub async fn wait(&self) -> Option<Signal> {
        self.rx.lock().await.recv().await
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// A named cleanup callback.
#[derive(Clone)]
pub struct ShutdownHook(Arc<dyn Fn() + Send + Sync>);

impl ShutdownHook {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn run(&self) {
        (self.0)()
    }
}

impl fmt::Debug for ShutdownHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShutdownHook").finish_non_exhaustive()
    }
}

/// Hook table keyed by name; last write wins.
#[derive(Default)]
pub struct ShutdownHooks {
    hooks: DashMap<String, ShutdownHook>,
}

impl ShutdownHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `hook` under `name`. `None` is ignored.
    pub fn add(&self, name: impl Into<String>, hook: impl Into<Option<ShutdownHook>>) {
        if let Some(hook) = hook.into() {
            self.hooks.insert(name.into(), hook);
        }
    }

    pub fn get(&self, name: &str) -> Option<ShutdownHook> {
        self.hooks.get(name).map(|r| r.value().clone())
    }

    /// Snapshot of every hook.
    pub fn list(&self) -> HashMap<String, ShutdownHook> {
        self.hooks
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect()
    }

    /// Remove the hook named `name`, returning whether one existed.
    pub fn remove(&self, name: &str) -> bool {
        self.hooks.remove(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub(crate) fn clear(&self) {
        self.hooks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    #[test]
    fn test_add_none_is_noop() {
        let hooks = ShutdownHooks::new();
        hooks.add("", None);
        assert!(hooks.is_empty());
        assert!(hooks.get("").is_none());
    }

    #[test]
    fn test_add_with_empty_name() {
        let hooks = ShutdownHooks::new();
        hooks.add("", ShutdownHook::new(|| {}));
        assert_eq!(hooks.len(), 1);
        assert!(hooks.get("").is_some());
    }

    #[test]
    fn test_last_write_wins() {
        let calls = Arc::new(AtomicUsize::new(0));
        let hooks = ShutdownHooks::new();

        hooks.add("flush", ShutdownHook::new(|| {}));
        let c = calls.clone();
        hooks.add(
            "flush",
            ShutdownHook::new(move || {
                c.fetch_add(10, Ordering::SeqCst);
            }),
        );
        assert_eq!(hooks.len(), 1);

        hooks.get("flush").unwrap().run();
        assert_eq!(calls.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_remove() {
        let hooks = ShutdownHooks::new();
        assert!(!hooks.remove("non-exist"));

        hooks.add("ut-hook", ShutdownHook::new(|| {}));
        assert!(hooks.remove("ut-hook"));
        assert!(!hooks.list().contains_key("ut-hook"));

        hooks.add("other", ShutdownHook::new(|| {}));
        hooks.clear();
        assert!(hooks.is_empty());
    }

    #[tokio::test]
    async fn test_wait_releases_after_signal() {
        let signal = Arc::new(ShutdownSignal::new());
        let tx = signal.sender();
        let delay = Duration::from_millis(200);

        let started = Instant::now();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tx.send(Signal::Terminate).unwrap();
        });

        assert_eq!(signal.wait().await, Some(Signal::Terminate));
        assert!(started.elapsed() >= delay);
    }

    #[tokio::test]
    async fn test_one_wait_per_signal() {
        let signal = ShutdownSignal::new();
        signal.trigger(Signal::Hangup);
        signal.trigger(Signal::Quit);

        assert_eq!(signal.wait().await, Some(Signal::Hangup));
        assert_eq!(signal.wait().await, Some(Signal::Quit));

        let pending = tokio::time::timeout(Duration::from_millis(50), signal.wait()).await;
        assert!(pending.is_err());
    }
}
