//! Probe callback slots.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use axum::body::Body;
use axum::http::{Request, Response};

type CheckFn = dyn Fn(&Request<Body>, &mut Response<Body>) -> bool + Send + Sync;

/// A probe callback. It may rewrite the response and returns whether the
/// process passes the probe.
#[derive(Clone)]
pub struct ProbeCheck(Arc<CheckFn>);

/// Callback answering "can this process take traffic".
pub type ReadinessCheck = ProbeCheck;

/// Callback answering "is this process still alive".
pub type LivenessCheck = ProbeCheck;

impl ProbeCheck {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Request<Body>, &mut Response<Body>) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn check(&self, req: &Request<Body>, resp: &mut Response<Body>) -> bool {
        (self.0)(req, resp)
    }
}

impl fmt::Debug for ProbeCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeCheck").finish_non_exhaustive()
    }
}

/// Single replaceable probe callback.
#[derive(Default)]
pub struct ProbeSlot {
    check: ArcSwapOption<ProbeCheck>,
}

impl ProbeSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the callback; `None` clears the slot.
    pub fn set(&self, check: impl Into<Option<ProbeCheck>>) {
        self.check.store(check.into().map(Arc::new));
    }

    pub fn get(&self) -> Option<ProbeCheck> {
        self.check.load_full().map(|check| check.as_ref().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_empty_slot() {
        let slot = ProbeSlot::new();
        assert!(slot.get().is_none());
    }

    #[test]
    fn test_set_replaces_and_clears() {
        let slot = ProbeSlot::new();
        slot.set(ProbeCheck::new(|_, _| true));
        slot.set(ProbeCheck::new(|_, resp| {
            *resp.status_mut() = StatusCode::IM_A_TEAPOT;
            false
        }));

        let req = Request::new(Body::empty());
        let mut resp = Response::new(Body::empty());
        assert!(!slot.get().unwrap().check(&req, &mut resp));
        assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);

        slot.set(None);
        assert!(slot.get().is_none());
    }
}
