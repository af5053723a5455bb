//! REST API for the duplicate content resolver
//!
//! Exposes the admin listing with bulk removal, per-view canonical-link
//! emission, and a small content seeding surface backed by the in-memory
//! store.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use dcr_core::{ContentKind, ContentRecord, ContentStatus, RecordId};
use dcr_dedup::{DedupError, DuplicateGroup};
use dcr_manager::{DedupManager, DeletionReport, ManagerConfig, ManagerError, ManagerStats};
use dcr_store::{ContentStore, InMemoryContentStore, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// API state holding the dedup manager and its backing store
#[derive(Clone)]
pub struct ApiState {
    store: InMemoryContentStore,
    manager: Arc<DedupManager<InMemoryContentStore>>,
}

impl ApiState {
    /// Create a new API state with default configuration
    pub fn new() -> Self {
        Self::with_config(ManagerConfig::default())
    }

    /// Create API state with custom configuration
    pub fn with_config(config: ManagerConfig) -> Self {
        let store = InMemoryContentStore::new();
        let manager = DedupManager::new(store.clone(), config);

        Self {
            store,
            manager: Arc::new(manager),
        }
    }
}

impl Default for ApiState {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the main API router
pub fn create_router() -> Router {
    create_router_with_config(ManagerConfig::default())
}

/// Create the API router with a custom manager configuration
pub fn create_router_with_config(config: ManagerConfig) -> Router {
    let state = ApiState::with_config(config);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Content operations
        .route("/content", post(add_content))
        .route("/content/{id}", get(get_content))
        .route("/content/{id}", delete(delete_content))
        .route("/content/{id}/canonical", get(get_canonical))
        // Duplicate administration
        .route("/duplicates", get(list_duplicates))
        .route("/duplicates/delete", post(bulk_delete))
        // System operations
        .route("/system/stats", get(get_stats))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// Request/Response DTOs
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct AddContentRequest {
    pub title: String,
    pub slug: String,
    pub kind: ContentKind,
    pub status: Option<ContentStatus>,
    /// RFC 3339 timestamp; defaults to now
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub id: u64,
    pub title: String,
    pub slug: String,
    pub kind: ContentKind,
    pub status: ContentStatus,
    pub created_at: String,
    pub permalink: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub original: RecordResponse,
    pub duplicates: Vec<RecordResponse>,
    /// The original's URL, emitted as canonical for every duplicate row
    pub canonical_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DuplicatesPageResponse {
    pub page: usize,
    pub total_groups: usize,
    pub total_pages: usize,
    pub groups: Vec<GroupResponse>,
}

#[derive(Debug, Serialize)]
pub struct CanonicalResponse {
    pub is_duplicate: bool,
    pub canonical_id: Option<u64>,
    pub href: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FailedDeletion {
    pub id: u64,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct DeletionReportResponse {
    pub deleted: Vec<u64>,
    pub missing: Vec<u64>,
    pub failed: Vec<FailedDeletion>,
}

impl From<DeletionReport> for DeletionReportResponse {
    fn from(report: DeletionReport) -> Self {
        Self {
            deleted: report.deleted.into_iter().map(|id| id.0).collect(),
            missing: report.missing.into_iter().map(|id| id.0).collect(),
            failed: report
                .failed
                .into_iter()
                .map(|(id, reason)| FailedDeletion { id: id.0, reason })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub scans_run: u64,
    pub groups_found: u64,
    pub records_deleted: u64,
    pub resolutions: u64,
}

impl From<ManagerStats> for StatsResponse {
    fn from(stats: ManagerStats) -> Self {
        Self {
            scans_run: stats.scans_run,
            groups_found: stats.groups_found,
            records_deleted: stats.records_deleted,
            resolutions: stats.resolutions,
        }
    }
}

async fn record_response(store: &InMemoryContentStore, record: &ContentRecord) -> RecordResponse {
    // Tolerate records vanishing between the scan and rendering.
    let permalink = store.permalink(record.id).await.ok();

    RecordResponse {
        id: record.id.0,
        title: record.title.clone(),
        slug: record.slug.clone(),
        kind: record.kind,
        status: record.status,
        created_at: record.created_at.to_rfc3339(),
        permalink,
    }
}

async fn group_response(store: &InMemoryContentStore, group: &DuplicateGroup) -> GroupResponse {
    let original = record_response(store, group.original()).await;
    let canonical_url = original.permalink.clone();

    let mut duplicates = Vec::with_capacity(group.candidates().len());
    for candidate in group.candidates() {
        duplicates.push(record_response(store, candidate).await);
    }

    GroupResponse {
        original,
        duplicates,
        canonical_url,
    }
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<ManagerError> for ApiError {
    fn from(err: ManagerError) -> Self {
        match err {
            ManagerError::RecordNotFound(_) => ApiError::NotFound(err.to_string()),
            ManagerError::Store(StoreError::RecordNotFound(_)) => {
                ApiError::NotFound(err.to_string())
            }
            ManagerError::Dedup(DedupError::UnsortedInput { .. }) => {
                // The store broke its listing contract.
                ApiError::InternalError(err.to_string())
            }
            _ => ApiError::InternalError(err.to_string()),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "Duplicate Content Resolver"
    }))
}

/// Seed a content record into the backing store
async fn add_content(
    State(state): State<ApiState>,
    Json(req): Json<AddContentRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let created_at = match req.created_at {
        Some(raw) => chrono::DateTime::parse_from_rfc3339(&raw)
            .map_err(|_| ApiError::BadRequest("Invalid created_at timestamp".to_string()))?
            .with_timezone(&chrono::Utc),
        None => chrono::Utc::now(),
    };

    let id = state.store.create(
        req.title,
        req.slug,
        req.kind,
        req.status.unwrap_or(ContentStatus::Published),
        created_at,
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "id": id.0
        })),
    ))
}

/// Fetch one content record
async fn get_content(
    State(state): State<ApiState>,
    Path(id): Path<u64>,
) -> Result<Json<RecordResponse>, ApiError> {
    let record = state
        .store
        .get(RecordId(id))
        .await
        .map_err(|e| ApiError::InternalError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("record not found: {id}")))?;

    Ok(Json(record_response(&state.store, &record).await))
}

/// Delete one content record; absent ids are a no-op
async fn delete_content(
    State(state): State<ApiState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    let report = state.manager.delete_records(&[RecordId(id)]).await;

    if let Some((_, reason)) = report.failed.first() {
        return Err(ApiError::InternalError(reason.clone()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Canonical-link emission for one content view
async fn get_canonical(
    State(state): State<ApiState>,
    Path(id): Path<u64>,
) -> Result<Json<CanonicalResponse>, ApiError> {
    let link = state.manager.canonical_link(RecordId(id)).await?;

    Ok(Json(CanonicalResponse {
        is_duplicate: link.decision.is_duplicate(),
        canonical_id: link.decision.canonical_id().map(|id| id.0),
        href: link.href,
    }))
}

/// One page of the duplicate report
async fn list_duplicates(
    State(state): State<ApiState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<DuplicatesPageResponse>, ApiError> {
    let page = state.manager.duplicates_page(query.page.unwrap_or(1)).await?;

    let mut groups = Vec::with_capacity(page.groups.len());
    for group in &page.groups {
        groups.push(group_response(&state.store, group).await);
    }

    Ok(Json(DuplicatesPageResponse {
        page: page.page,
        total_groups: page.total_groups,
        total_pages: page.total_pages,
        groups,
    }))
}

/// Bulk-delete selected duplicates
async fn bulk_delete(
    State(state): State<ApiState>,
    Json(req): Json<BulkDeleteRequest>,
) -> Result<Json<DeletionReportResponse>, ApiError> {
    let ids: Vec<RecordId> = req.ids.into_iter().map(RecordId).collect();
    let report = state.manager.delete_records(&ids).await;

    Ok(Json(report.into()))
}

/// Get system statistics
async fn get_stats(State(state): State<ApiState>) -> Result<Json<StatsResponse>, ApiError> {
    let stats = state.manager.stats();
    Ok(Json(stats.into()))
}
