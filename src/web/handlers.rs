use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

use super::AppState;
use super::errors::AppError;
use super::extract::{FormFields, RequireAdmin};
use crate::models::{POST, Post, PostCreate, PostUpdate, REASON, Reason, ReasonCreate, parse_id};

/// List envelope. Reasons share the `posts` key with posts.
#[derive(Serialize)]
pub struct Listing<T> {
    pub posts: Vec<T>,
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Visitor check-in. The admin pair logs in instead of being recorded.
pub async fn where_to(
    State(state): State<AppState>,
    FormFields(payload): FormFields<ReasonCreate>,
) -> Result<Json<Value>, AppError> {
    let is_admin = state
        .credentials
        .as_ref()
        .is_some_and(|c| c.matches(&payload.name, &payload.why));

    if is_admin {
        let (token, expires_at) = state.tokens.issue();
        info!(%expires_at, "admin session issued");
        return Ok(Json(json!({ "admin": true, "token": token })));
    }

    let reason = state.db()?.insert_reason(&payload)?;
    info!(reason_id = %reason.id, "reason recorded");
    Ok(Json(json!({
        "admin": false,
        "name": reason.name,
        "why": reason.why,
    })))
}

pub async fn list_reasons(State(state): State<AppState>) -> Result<Json<Listing<Reason>>, AppError> {
    let reasons = state.db()?.list_reasons()?;
    Ok(Json(Listing { posts: reasons }))
}

pub async fn delete_reason(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(REASON, &raw_id)?;
    if !state.db()?.delete_reason(&id)? {
        return Err(AppError::not_found(REASON));
    }
    info!(reason_id = %id, "reason deleted");
    Ok(Json(json!({
        "success": true,
        "message": "Reason deleted successfully",
    })))
}

pub async fn create_post(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    FormFields(payload): FormFields<PostCreate>,
) -> Result<Json<Post>, AppError> {
    let post = state.db()?.insert_post(&payload)?;
    info!(post_id = %post.id, title = %post.title, "post created");
    Ok(Json(post))
}

pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Listing<Post>>, AppError> {
    let posts = state.db()?.list_posts()?;
    Ok(Json(Listing { posts }))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Post>, AppError> {
    let id = parse_id(POST, &raw_id)?;
    let post = state
        .db()?
        .get_post(&id)?
        .ok_or_else(|| AppError::not_found(POST))?;
    Ok(Json(post))
}

pub async fn update_post(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    FormFields(changes): FormFields<PostUpdate>,
) -> Result<Json<Post>, AppError> {
    let id = parse_id(POST, &raw_id)?;
    let post = state
        .db()?
        .update_post(&id, &changes)?
        .ok_or_else(|| AppError::not_found(POST))?;
    info!(post_id = %id, "post updated");
    Ok(Json(post))
}

pub async fn delete_post(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(POST, &raw_id)?;
    if !state.db()?.delete_post(&id)? {
        return Err(AppError::not_found(POST));
    }
    info!(post_id = %id, "post deleted");
    Ok(Json(json!({
        "Success": true,
        "Message": "Post deleted successfully",
    })))
}

/// End the caller's admin session early.
pub async fn logout(admin: RequireAdmin, State(state): State<AppState>) -> Json<Value> {
    state.tokens.revoke(&admin.token);
    info!("admin session revoked");
    Json(json!({ "success": true }))
}
