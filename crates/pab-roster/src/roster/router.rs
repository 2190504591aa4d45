use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;

use super::access::{require_session, AccessGate};
use super::domain::{MemberId, Milestones};
use super::import::{ImportRow, RosterImporter};
use super::pipeline::{
    CategoryFilter, ColumnSort, RosterQuery, RosterView, SortDirection, SortField,
};
use super::service::{CounterUpdate, PhysicalEvaluation, RosterService, RosterServiceError};
use super::store::MemberStore;

type SharedService<S> = Arc<RosterService<S>>;

/// Router exposing every roster view and edit behind the access gate.
pub fn roster_router<S>(service: SharedService<S>, gate: AccessGate) -> Router
where
    S: MemberStore + 'static,
{
    Router::new()
        .route("/api/v1/members", get(listing_handler::<S>))
        .route("/api/v1/members/import", post(import_handler::<S>))
        .route("/api/v1/members/summary", get(summary_handler::<S>))
        .route("/api/v1/members/:member_id", get(member_handler::<S>))
        .route(
            "/api/v1/members/:member_id/milestones",
            put(milestones_handler::<S>),
        )
        .route(
            "/api/v1/members/:member_id/counters",
            put(counters_handler::<S>),
        )
        .route(
            "/api/v1/members/:member_id/active-points",
            put(active_points_handler::<S>),
        )
        .route(
            "/api/v1/members/:member_id/physical",
            put(physical_handler::<S>),
        )
        .route(
            "/api/v1/members/:member_id/queue",
            post(enqueue_handler::<S>),
        )
        .route("/api/v1/queue", get(queue_handler::<S>))
        .route_layer(middleware::from_fn_with_state(gate, require_session))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListingParams {
    #[serde(default)]
    pub(crate) view: Option<String>,
    #[serde(default)]
    pub(crate) search: Option<String>,
    #[serde(default)]
    pub(crate) category: Option<String>,
    #[serde(default)]
    pub(crate) sort: Option<String>,
    #[serde(default)]
    pub(crate) direction: Option<String>,
}

impl ListingParams {
    pub(crate) fn into_query(self) -> Result<(RosterView, RosterQuery), String> {
        let view = match self.view.as_deref() {
            Some(raw) => {
                RosterView::parse(raw).ok_or_else(|| format!("unknown roster view '{raw}'"))?
            }
            None => RosterView::default(),
        };

        let category = match self.category.as_deref() {
            Some(raw) => CategoryFilter::parse(raw)
                .ok_or_else(|| format!("unknown category filter '{raw}'"))?,
            None => CategoryFilter::All,
        };

        let direction = match self.direction.as_deref().map(str::to_ascii_lowercase) {
            None => SortDirection::Ascending,
            Some(raw) if raw == "asc" => SortDirection::Ascending,
            Some(raw) if raw == "desc" => SortDirection::Descending,
            Some(raw) => return Err(format!("sort direction must be asc or desc, got '{raw}'")),
        };

        let column_sort = match self.sort.as_deref() {
            Some(raw) => {
                let field =
                    SortField::parse(raw).ok_or_else(|| format!("unknown sort column '{raw}'"))?;
                Some(ColumnSort { field, direction })
            }
            None => None,
        };

        let query = RosterQuery::for_view(view)
            .with_search(self.search.unwrap_or_default())
            .with_category(category)
            .with_column_sort(column_sort);
        Ok((view, query))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImportRequest {
    #[serde(default)]
    pub(crate) rows: Option<Vec<ImportRow>>,
    #[serde(default)]
    pub(crate) csv: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActivePointsRequest {
    pub(crate) active_points: i64,
}

pub(crate) async fn listing_handler<S>(
    State(service): State<SharedService<S>>,
    Query(params): Query<ListingParams>,
) -> Response
where
    S: MemberStore + 'static,
{
    let (view, query) = match params.into_query() {
        Ok(parsed) => parsed,
        Err(message) => return validation_response(message),
    };

    match service.listing(view, &query) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn import_handler<S>(
    State(service): State<SharedService<S>>,
    payload: Result<Json<ImportRequest>, JsonRejection>,
) -> Response
where
    S: MemberStore + 'static,
{
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let plan = match request {
        ImportRequest {
            csv: Some(csv),
            rows: None,
        } => match RosterImporter::from_reader(Cursor::new(csv.into_bytes())) {
            Ok(plan) => plan,
            Err(error) => return AppError::from(error).into_response(),
        },
        ImportRequest {
            rows: Some(rows),
            csv: None,
        } => RosterImporter::from_rows(rows),
        _ => return validation_response("provide either `rows` or `csv`, not both".to_string()),
    };

    match service.import(plan) {
        Ok(report) => {
            let payload = json!({ "report": report, "message": report.message() });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn summary_handler<S>(State(service): State<SharedService<S>>) -> Response
where
    S: MemberStore + 'static,
{
    match service.summary() {
        Ok(tally) => (StatusCode::OK, Json(tally)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn member_handler<S>(
    State(service): State<SharedService<S>>,
    Path(member_id): Path<String>,
) -> Response
where
    S: MemberStore + 'static,
{
    respond(service.get(&MemberId(member_id)))
}

pub(crate) async fn milestones_handler<S>(
    State(service): State<SharedService<S>>,
    Path(member_id): Path<String>,
    payload: Result<Json<Milestones>, JsonRejection>,
) -> Response
where
    S: MemberStore + 'static,
{
    let milestones = match json_body(payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(service.update_milestones(&MemberId(member_id), milestones))
}

pub(crate) async fn counters_handler<S>(
    State(service): State<SharedService<S>>,
    Path(member_id): Path<String>,
    payload: Result<Json<CounterUpdate>, JsonRejection>,
) -> Response
where
    S: MemberStore + 'static,
{
    let counters = match json_body(payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(service.update_counters(&MemberId(member_id), counters))
}

pub(crate) async fn active_points_handler<S>(
    State(service): State<SharedService<S>>,
    Path(member_id): Path<String>,
    payload: Result<Json<ActivePointsRequest>, JsonRejection>,
) -> Response
where
    S: MemberStore + 'static,
{
    let request = match json_body(payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(service.set_active_points(&MemberId(member_id), request.active_points))
}

pub(crate) async fn physical_handler<S>(
    State(service): State<SharedService<S>>,
    Path(member_id): Path<String>,
    payload: Result<Json<PhysicalEvaluation>, JsonRejection>,
) -> Response
where
    S: MemberStore + 'static,
{
    let evaluation = match json_body(payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(service.record_physical_evaluation(&MemberId(member_id), evaluation))
}

pub(crate) async fn enqueue_handler<S>(
    State(service): State<SharedService<S>>,
    Path(member_id): Path<String>,
) -> Response
where
    S: MemberStore + 'static,
{
    respond(service.enqueue_interview(&MemberId(member_id), Utc::now()))
}

pub(crate) async fn queue_handler<S>(State(service): State<SharedService<S>>) -> Response
where
    S: MemberStore + 'static,
{
    match service.interview_queue(Utc::now()) {
        Ok(queue) => (StatusCode::OK, Json(json!({ "queue": queue }))).into_response(),
        Err(error) => error_response(error),
    }
}

fn respond<T: serde::Serialize>(result: Result<T, RosterServiceError>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

fn validation_response(message: String) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
}

/// Malformed or mistyped bodies are reported like any other validation failure.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| validation_response(rejection.body_text()))
}

pub(crate) fn error_response(error: RosterServiceError) -> Response {
    AppError::from(error).into_response()
}
