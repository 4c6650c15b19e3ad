//! Request handlers for the `/api` routes.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use longlist_core::model::{
    Health, MoveAck, MoveRequest, NoteRequest, SelectionRequest, WriteAck,
};
use longlist_core::{ItemQuery, Page, StateDocument, StatePatch};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::AppState;
use super::error::ApiError;

/// Raw query string of `GET /api/items`. Numbers that do not parse as
/// non-negative integers are rejected with 400.
#[derive(Debug, Default, Deserialize)]
pub struct ItemsParams {
    #[serde(default)]
    pub search: String,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

#[instrument(skip_all)]
pub async fn list_items(
    State(app): State<AppState>,
    params: Result<Query<ItemsParams>, QueryRejection>,
) -> Result<Json<Page>, ApiError> {
    let Query(params) = params.map_err(|rejection| ApiError::invalid_query(&rejection))?;
    let query = app.limits.query(params);
    debug!(search = %query.search, offset = query.offset, limit = query.limit, "list items");

    let snapshot = app.store.read();
    let projector = app.projector;
    let page = tokio::task::spawn_blocking(move || projector.project(&query, &snapshot.state))
        .await
        .map_err(ApiError::internal)?;
    Ok(Json(page))
}

pub async fn read_state(State(app): State<AppState>) -> Json<StateDocument> {
    Json(app.store.read().to_document())
}

#[instrument(skip_all)]
pub async fn merge_state(
    State(app): State<AppState>,
    body: Result<Json<StatePatch>, JsonRejection>,
) -> Result<Json<WriteAck>, ApiError> {
    let Json(mut patch) = body.map_err(|rejection| ApiError::invalid_body(&rejection))?;
    let snapshot = match patch.expected_version.take() {
        Some(expected) => app.store.merge_if(expected, patch)?,
        None => app.store.merge(patch),
    };
    info!(version = snapshot.version, "state merged");
    Ok(Json(WriteAck::ok(snapshot.version)))
}

#[instrument(skip_all)]
pub async fn set_selection(
    State(app): State<AppState>,
    body: Result<Json<SelectionRequest>, JsonRejection>,
) -> Result<Json<WriteAck>, ApiError> {
    let Json(request) = body.map_err(|rejection| ApiError::invalid_body(&rejection))?;
    let snapshot = app.store.set_selected(request.id, request.selected)?;
    debug!(id = %request.id, selected = request.selected, version = snapshot.version, "selection set");
    Ok(Json(WriteAck::ok(snapshot.version)))
}

#[instrument(skip_all)]
pub async fn move_item(
    State(app): State<AppState>,
    body: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<MoveAck>, ApiError> {
    let Json(request) = body.map_err(|rejection| ApiError::invalid_body(&rejection))?;
    let store = app.store.clone();
    let (snapshot, outcome) = tokio::task::spawn_blocking(move || {
        store.move_item(request.source_id, request.target_id)
    })
    .await
    .map_err(ApiError::internal)?;

    if outcome.is_moved() {
        info!(source = %request.source_id, target = %request.target_id, version = snapshot.version, "item moved");
    }
    Ok(Json(MoveAck {
        success: true,
        moved: outcome.is_moved(),
        version: snapshot.version,
    }))
}

#[instrument(skip_all)]
pub async fn save_note(
    State(app): State<AppState>,
    body: Result<Json<NoteRequest>, JsonRejection>,
) -> Result<Json<WriteAck>, ApiError> {
    let Json(request) = body.map_err(|rejection| ApiError::invalid_body(&rejection))?;
    let snapshot = app.store.set_note(request.id, &request.note)?;
    Ok(Json(WriteAck::ok(snapshot.version)))
}

pub async fn health(State(app): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok".to_owned(),
        universe: app.store.universe().size(),
        version: app.store.version(),
    })
}

/// Page size bounds applied to every items request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl PageLimits {
    pub fn query(self, params: ItemsParams) -> ItemQuery {
        let limit = params.limit.unwrap_or(self.default_limit).min(self.max_limit);
        ItemQuery::new(params.search, params.offset.unwrap_or(0), limit)
    }
}
