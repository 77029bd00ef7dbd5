//! HTTP endpoints serving the probe callbacks.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{Response, StatusCode};
use axum::routing::get;
use axum::Router;

use crate::context::AppContext;
use crate::health::probes::ProbeCheck;

/// Router exposing `GET /readyz` and `GET /livez` for `ctx`.
pub fn probe_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/readyz", get(readyz))
        .route("/livez", get(livez))
        .with_state(ctx)
}

async fn readyz(State(ctx): State<Arc<AppContext>>, req: Request) -> Response<Body> {
    run_probe("readiness", ctx.readiness_check(), &req)
}

async fn livez(State(ctx): State<Arc<AppContext>>, req: Request) -> Response<Body> {
    run_probe("liveness", ctx.liveness_check(), &req)
}

fn run_probe(probe: &'static str, check: Option<ProbeCheck>, req: &Request) -> Response<Body> {
    let mut resp = Response::new(Body::from("ok"));
    let Some(check) = check else {
        return resp;
    };

    if !check.check(req, &mut resp) && resp.status() == StatusCode::OK {
        tracing::warn!(probe, "Probe check failed");
        *resp.status_mut() = StatusCode::SERVICE_UNAVAILABLE;
        *resp.body_mut() = Body::from("unavailable");
    }
    resp
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;
    use tower::ServiceExt;

    async fn call(ctx: Arc<AppContext>, path: &str) -> Response<Body> {
        let req = Request::builder().uri(path).body(Body::empty()).unwrap();
        probe_router(ctx).oneshot(req).await.unwrap()
    }

    #[tokio::test]
    async fn test_no_callback_is_ok() {
        let ctx = Arc::new(AppContext::new());
        assert_eq!(call(ctx.clone(), "/readyz").await.status(), StatusCode::OK);
        assert_eq!(call(ctx, "/livez").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_failing_callback_is_unavailable() {
        let ctx = Arc::new(AppContext::new());
        ctx.set_readiness_check(ProbeCheck::new(|_, _| false));

        assert_eq!(
            call(ctx.clone(), "/readyz").await.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(call(ctx, "/livez").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_callback_status_is_kept() {
        let ctx = Arc::new(AppContext::new());
        ctx.set_liveness_check(ProbeCheck::new(|req, resp| {
            assert_eq!(req.uri().path(), "/livez");
            *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            resp.headers_mut()
                .insert(header::RETRY_AFTER, "5".parse().unwrap());
            false
        }));

        let resp = call(ctx, "/livez").await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.headers()[header::RETRY_AFTER], "5");
    }

    #[tokio::test]
    async fn test_passing_callback_is_ok() {
        let ctx = Arc::new(AppContext::new());
        ctx.set_readiness_check(ProbeCheck::new(|_, _| true));
        assert_eq!(call(ctx, "/readyz").await.status(), StatusCode::OK);
    }
}
