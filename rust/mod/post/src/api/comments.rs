use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};

use auth::model::Identity;
use board_core::{IdResponse, ListParams, ServiceError};

use crate::api::AppState;
use crate::model::{CommentInput, CommentView, LikeState};

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/post/{post_id}/comments", get(list_comments))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/post/{post_id}/comment", post(create_comment))
        .route(
            "/post/{post_id}/comment/{comment_id}",
            put(update_comment).delete(delete_comment),
        )
        .route("/post/{post_id}/comment/{comment_id}/like", post(toggle_like))
}

async fn list_comments(
    State(svc): State<AppState>,
    Path(post_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<CommentView>>, ServiceError> {
    Ok(Json(svc.list_comments(&post_id, &params)?))
}

async fn create_comment(
    State(svc): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(post_id): Path<String>,
    Json(input): Json<CommentInput>,
) -> Result<(StatusCode, Json<IdResponse>), ServiceError> {
    let created = svc.create_comment(&identity, &post_id, input)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_comment(
    State(svc): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((post_id, comment_id)): Path<(String, String)>,
    Json(input): Json<CommentInput>,
) -> Result<Json<IdResponse>, ServiceError> {
    Ok(Json(svc.update_comment(&identity, &post_id, &comment_id, input)?))
}

async fn delete_comment(
    State(svc): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> Result<StatusCode, ServiceError> {
    svc.delete_comment(&identity, &post_id, &comment_id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_like(
    State(svc): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> Result<Json<LikeState>, ServiceError> {
    Ok(Json(svc.toggle_comment_like(&identity, &post_id, &comment_id)?))
}
