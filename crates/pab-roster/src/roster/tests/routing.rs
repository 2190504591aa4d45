use super::common::*;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::roster::router::{listing_handler, physical_handler, ListingParams};
use crate::roster::service::{PhysicalEvaluation, RosterService};
use crate::roster::AccessGate;

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn listing_handler_rejects_unknown_category() {
    let (service, _) = build_service();
    let params = ListingParams {
        category: Some("excellent".to_string()),
        ..ListingParams::default()
    };

    let response = listing_handler::<MemoryStore>(State(Arc::new(service)), Query(params)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"].as_str().unwrap_or_default().contains("excellent"));
}

#[tokio::test]
async fn listing_handler_returns_internal_outage_as_unavailable() {
    let service = Arc::new(RosterService::new(Arc::new(UnavailableStore)));

    let response =
        listing_handler::<UnavailableStore>(State(service), Query(ListingParams::default())).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn physical_handler_rejects_invalid_score() {
    let (service, store) = build_service();

    let response = physical_handler::<MemoryStore>(
        State(Arc::new(service)),
        Path("2301".to_string()),
        Ok(axum::Json(PhysicalEvaluation {
            score: 140.0,
            notes: String::new(),
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(store.snapshot("2301").expect("present").physical_score.is_none());
}

#[tokio::test]
async fn listing_route_applies_view_search_and_sort() {
    let router = router_with_store(MemoryStore::seeded(roster()), AccessGate::open());

    let response = router
        .oneshot(
            Request::get("/api/v1/members?view=finalists&category=cukup&sort=name&direction=desc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["view"], json!("finalists"));
    assert_eq!(payload["shown"], json!(2));
    assert_eq!(payload["total"], json!(6));
    let names: Vec<&str> = payload["members"]
        .as_array()
        .expect("members array")
        .iter()
        .filter_map(|member| member["name"].as_str())
        .collect();
    assert_eq!(names, vec!["bayu Saputra", "Adi Nugroho"]);
}

#[tokio::test]
async fn import_route_accepts_csv_payloads() {
    let store = MemoryStore::default();
    let router = router_with_store(store.clone(), AccessGate::open());

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/members/import",
            json!({ "csv": "NIM,Nama,Fakultas,WhatsApp\nA1,X,Teknik,0812\nA1,X,Teknik,0812\n,Y,FISIP,0813\n" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["report"]["created"], json!(1));
    assert_eq!(payload["report"]["skipped"], json!(2));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn import_route_accepts_parsed_rows() {
    let store = MemoryStore::default();
    let router = router_with_store(store.clone(), AccessGate::open());

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/members/import",
            json!({ "rows": [
                { "NIM": 2301, "Nama": "Rani", "Fakultas": "Teknik", "WhatsApp": "0812" },
                { "NIM": "", "Nama": "Y" }
            ] }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["report"]["created"], json!(1));
    assert_eq!(payload["report"]["missing_id"], json!(1));
    assert_eq!(store.snapshot("2301").expect("created").name, "Rani");
}

#[tokio::test]
async fn import_route_requires_exactly_one_source() {
    let router = router_with_store(MemoryStore::default(), AccessGate::open());

    let response = router
        .oneshot(json_request("POST", "/api/v1/members/import", json!({})))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn edit_routes_update_member_documents() {
    let store = MemoryStore::seeded(roster());
    let router = router_with_store(store.clone(), AccessGate::open());

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/members/2303/counters",
            json!({ "committee_count": 5, "meeting_count": 3 }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total_points"], json!(65));
    assert_eq!(payload["points_category"], json!("fair"));

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/members/2303/milestones",
            json!({ "interview": true, "physical": true }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["eligibility"], json!("conditional"));
    assert_eq!(payload["eligibility_label"], json!("Bersyarat"));

    let response = router
        .oneshot(json_request(
            "PUT",
            "/api/v1/members/2303/active-points",
            json!({ "active_points": 12 }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let stored = store.snapshot("2303").expect("present");
    assert_eq!(stored.committee_count, 5);
    assert_eq!(stored.active_points, 12);
    assert!(stored.milestones.physical);
    assert!(!stored.milestones.training);
}

#[tokio::test]
async fn negative_counters_are_rejected_before_the_store() {
    let store = MemoryStore::seeded(roster());
    let router = router_with_store(store.clone(), AccessGate::open());

    let response = router
        .oneshot(json_request(
            "PUT",
            "/api/v1/members/2303/counters",
            json!({ "committee_count": -1, "meeting_count": 3 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"].as_str().unwrap_or_default().contains("committee_count"));
    assert_eq!(store.snapshot("2303").expect("present").meeting_count, 0);
}

#[tokio::test]
async fn mistyped_and_unparseable_bodies_get_json_errors() {
    let router = router_with_store(MemoryStore::seeded(roster()), AccessGate::open());

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/members/2301/counters",
            json!({ "committee_count": "abc", "meeting_count": 1 }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"].is_string());

    let response = router
        .oneshot(
            Request::put("/api/v1/members/2301/physical")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{ score: "))
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"].is_string());
}

#[tokio::test]
async fn unknown_member_is_not_found() {
    let router = router_with_store(MemoryStore::seeded(roster()), AccessGate::open());

    let response = router
        .oneshot(Request::get("/api/v1/members/0000").body(Body::empty()).unwrap())
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn enqueue_then_queue_route_lists_member() {
    let router = router_with_store(MemoryStore::seeded(roster()), AccessGate::open());

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/members/2305/queue")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["awaiting_interview"], json!(true));

    let response = router
        .oneshot(Request::get("/api/v1/queue").body(Body::empty()).unwrap())
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    let queue = payload["queue"].as_array().expect("queue array");
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0]["id"], json!("2305"));
    assert_eq!(queue[0]["is_next"], json!(true));
}

#[tokio::test]
async fn summary_route_counts_categories() {
    let router = router_with_store(MemoryStore::seeded(roster()), AccessGate::open());

    let response = router
        .oneshot(Request::get("/api/v1/members/summary").body(Body::empty()).unwrap())
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["good"], json!(1));
    assert_eq!(payload["fair"], json!(2));
    assert_eq!(payload["poor"], json!(3));
    assert_eq!(payload["conditional"], json!(2));
}

#[tokio::test]
async fn gated_router_requires_bearer_token() {
    let router = router_with_store(
        MemoryStore::seeded(roster()),
        AccessGate::with_token("pab-2025"),
    );

    let response = router
        .clone()
        .oneshot(Request::get("/api/v1/members").body(Body::empty()).unwrap())
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = router
        .oneshot(
            Request::get("/api/v1/members")
                .header(header::AUTHORIZATION, "Bearer pab-2025")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
}
