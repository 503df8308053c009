use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};

use auth::model::Identity;
use board_core::{IdResponse, ListParams, ServiceError};

use crate::api::AppState;
use crate::model::{LikeState, PostInput, PostSummary, PostView};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts))
        .route("/post/{post_id}", get(get_post))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/post", post(create_post))
        .route("/post/{post_id}", put(update_post).delete(delete_post))
        .route("/post/{post_id}/like", post(toggle_like))
}

async fn list_posts(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<PostSummary>>, ServiceError> {
    Ok(Json(svc.list_posts(&params)?))
}

async fn get_post(
    State(svc): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<PostView>, ServiceError> {
    Ok(Json(svc.get_post(&post_id)?))
}

async fn create_post(
    State(svc): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(input): Json<PostInput>,
) -> Result<(StatusCode, Json<IdResponse>), ServiceError> {
    let created = svc.create_post(&identity, input)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_post(
    State(svc): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(post_id): Path<String>,
    Json(input): Json<PostInput>,
) -> Result<Json<IdResponse>, ServiceError> {
    Ok(Json(svc.update_post(&identity, &post_id, input)?))
}

async fn delete_post(
    State(svc): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(post_id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    svc.delete_post(&identity, &post_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /post/{post_id}/like: toggles; the response says which way.
async fn toggle_like(
    State(svc): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(post_id): Path<String>,
) -> Result<Json<LikeState>, ServiceError> {
    Ok(Json(svc.toggle_post_like(&identity, &post_id)?))
}
