//! API endpoints for memos.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::error::Error;
use crate::memo::{sort_for_listing, validate_title, Memo, MemoStore};

use crate::web::AppState;

/// Create/edit memo request.
#[derive(Deserialize)]
pub struct SaveMemoRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Run a store call on the blocking pool; rusqlite calls block the thread.
async fn with_store<T, F>(store: AppState, f: F) -> Result<T, StatusCode>
where
    T: Send + 'static,
    F: FnOnce(&MemoStore) -> Result<T, Error> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&store))
        .await
        .map_err(|e| {
            tracing::error!("memo store task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| status_for(&e))
}

/// Read back a memo that was just written.
fn fetch_saved(store: &MemoStore, id: i64) -> Result<Memo, Error> {
    store
        .get_by_id(id)?
        .ok_or_else(|| Error::Other(format!("memo {} missing after save", id)))
}

/// List all memos in list-screen order.
pub async fn list_memos(State(store): State<AppState>) -> Result<Json<Vec<Memo>>, StatusCode> {
    let memos = with_store(store, |store| {
        let mut memos = store.list()?;
        sort_for_listing(&mut memos);
        Ok(memos)
    })
    .await?;
    Ok(Json(memos))
}

/// Get a single memo.
pub async fn get_memo(
    State(store): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Memo>, StatusCode> {
    let memo = with_store(store, move |store| store.get_by_id(id))
        .await?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(memo))
}

/// Create a memo.
pub async fn create_memo(
    State(store): State<AppState>,
    Json(payload): Json<SaveMemoRequest>,
) -> Result<(StatusCode, Json<Memo>), StatusCode> {
    validate_title(&payload.title).map_err(|e| status_for(&e))?;

    let memo = with_store(store, move |store| {
        let id = store.add(&payload.title, &payload.content)?;
        fetch_saved(store, id)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(memo)))
}

/// Save a memo; ID 0 creates a new one.
pub async fn update_memo(
    State(store): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<SaveMemoRequest>,
) -> Result<(StatusCode, Json<Memo>), StatusCode> {
    validate_title(&payload.title).map_err(|e| status_for(&e))?;

    let memo = with_store(store, move |store| {
        let saved = store.update(Some(id), &payload.title, &payload.content)?;
        fetch_saved(store, saved)
    })
    .await?;

    let status = if memo.id == id {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(memo)))
}

/// Delete a memo.
pub async fn delete_memo(
    State(store): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    if with_store(store, move |store| store.delete_by_id(id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}
