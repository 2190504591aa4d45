use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use pab_roster::roster::{roster_router, AccessGate, MemberStore, RosterService};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_roster_routes<S>(service: Arc<RosterService<S>>, gate: AccessGate) -> axum::Router
where
    S: MemberStore + 'static,
{
    roster_router(service, gate)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::FileBackedMemberStore;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use pab_roster::roster::ImportRow;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app_state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        }
    }

    fn app(gate: AccessGate, ready: bool) -> axum::Router {
        let store = Arc::new(FileBackedMemberStore::open(None).expect("in-memory store"));
        let service = Arc::new(RosterService::new(store));
        service
            .import_rows(vec![ImportRow::new("2301", "Rani Putri", "Teknik", "0812")])
            .expect("seeded");
        with_roster_routes(service, gate).layer(Extension(app_state(ready)))
    }

    #[tokio::test]
    async fn readiness_reports_initializing_until_flagged() {
        let response = app(AccessGate::open(), false)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(AccessGate::open(), true)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn probes_bypass_the_access_gate() {
        let router = app(AccessGate::with_token("pab-2025"), true);

        let response = router
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(Request::get("/api/v1/members/2301").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn roster_routes_are_merged() {
        let response = app(AccessGate::open(), true)
            .oneshot(Request::get("/api/v1/members/2301").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
        assert_eq!(payload["name"], json!("Rani Putri"));
        assert_eq!(payload["eligibility_label"], json!("Tidak Lulus"));
    }

    #[tokio::test]
    async fn metrics_endpoint_uses_prometheus_text_format() {
        let response = app(AccessGate::open(), true)
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }
}
