//! JSON request/response surface over one shared session. Every handler
//! takes the session lock for the whole operation and never awaits while
//! holding it.

use std::net::SocketAddr;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::errors::{Error, Result};
use crate::models::EntryKind;
use crate::services::listing::{self, EntryDto, ListParams, ListResult, TreeRowDto};
use crate::services::search::{SearchHit, SearchRequest};
use crate::services::tree::TreeStats;
use crate::session::SharedSession;

#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::NameCollision(_)
            | Error::CannotDeleteRoot
            | Error::CannotDeleteCurrent
            | Error::CannotDeleteAncestorOfCurrent(_)
            | Error::CannotMoveRoot
            | Error::CyclicMove(_) => StatusCode::CONFLICT,
            Error::CapacityExceeded(_) => StatusCode::INSUFFICIENT_STORAGE,
            Error::Io(_) | Error::Config(_) | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.0.code();
        let message = self.0.to_string();
        tracing::warn!(%status, code, %message, "request failed");
        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct CdRequest {
    pub target: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub name: String,
    pub kind: EntryKind,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub source: String,
    pub destination: String,
}

#[derive(Debug, Deserialize)]
pub struct PathQuery {
    pub path: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub path: Option<String>,
    pub limit: Option<usize>,
    pub cursor: Option<String>,
}

pub fn router(session: SharedSession) -> Router {
    Router::new()
        .route("/pwd", get(pwd))
        .route("/cd", post(change_directory))
        .route("/ls", get(list))
        .route("/entries", post(create_entry).delete(delete_entry))
        .route("/move", post(move_entry))
        .route("/search", get(search))
        .route("/tree", get(tree))
        .route("/stats", get(stats))
        .with_state(session)
}

pub async fn serve(session: SharedSession, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "api listening");
    axum::serve(listener, router(session))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {}", e);
    }
}

pub async fn pwd(State(session): State<SharedSession>) -> ApiResult<Value> {
    let session = session.lock()?;
    Ok(Json(json!({ "path": session.current_path()? })))
}

pub async fn change_directory(
    State(session): State<SharedSession>,
    Json(request): Json<CdRequest>,
) -> ApiResult<Value> {
    let mut session = session.lock()?;
    session.change_directory(&request.target)?;
    Ok(Json(json!({ "path": session.current_path()? })))
}

pub async fn list(
    State(session): State<SharedSession>,
    Query(query): Query<ListQuery>,
) -> ApiResult<ListResult> {
    let session = session.lock()?;
    let listing = session.list(
        query.path.as_deref(),
        ListParams {
            limit: query.limit.unwrap_or(usize::MAX),
            cursor: query.cursor.as_deref(),
        },
    )?;
    Ok(Json(listing))
}

pub async fn create_entry(
    State(session): State<SharedSession>,
    Json(request): Json<CreateRequest>,
) -> std::result::Result<(StatusCode, Json<EntryDto>), ApiError> {
    let mut session = session.lock()?;
    let id = session.create(&request.name, request.kind)?;
    let dto = listing::describe(session.tree(), id)?;
    Ok((StatusCode::CREATED, Json(dto)))
}

pub async fn delete_entry(
    State(session): State<SharedSession>,
    Query(query): Query<PathQuery>,
) -> ApiResult<Value> {
    let mut session = session.lock()?;
    let removed = session.remove(&query.path)?;
    Ok(Json(json!({
        "name": removed.name,
        "kind": removed.kind,
        "released": removed.released,
    })))
}

pub async fn move_entry(
    State(session): State<SharedSession>,
    Json(request): Json<MoveRequest>,
) -> ApiResult<Value> {
    let mut session = session.lock()?;
    let folder = session.move_entry(&request.source, &request.destination)?;
    Ok(Json(json!({ "destination": session.tree().full_path(folder)? })))
}

pub async fn search(
    State(session): State<SharedSession>,
    Query(request): Query<SearchRequest>,
) -> ApiResult<Vec<SearchHit>> {
    let session = session.lock()?;
    Ok(Json(session.search(&request)?))
}

pub async fn tree(State(session): State<SharedSession>) -> ApiResult<Vec<TreeRowDto>> {
    let session = session.lock()?;
    let tree = session.tree();
    Ok(Json(listing::snapshot(tree, tree.root())?))
}

pub async fn stats(State(session): State<SharedSession>) -> ApiResult<TreeStats> {
    let session = session.lock()?;
    Ok(Json(session.stats()?))
}
