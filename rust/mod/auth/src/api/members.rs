use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use board_core::{IdResponse, ListParams, ListResult, ServiceError};

use crate::api::AppState;
use crate::model::{Identity, MemberView, UpdateMemberRequest};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/members", get(list_members))
        .route(
            "/member/{member_id}",
            get(get_member).patch(update_member).delete(delete_member),
        )
}

async fn list_members(
    State(svc): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResult<MemberView>>, ServiceError> {
    Ok(Json(svc.list_members(&identity, &params)?))
}

async fn get_member(
    State(svc): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(member_id): Path<String>,
) -> Result<Json<MemberView>, ServiceError> {
    Ok(Json(svc.get_member(&identity, &member_id)?))
}

async fn update_member(
    State(svc): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(member_id): Path<String>,
    Json(input): Json<UpdateMemberRequest>,
) -> Result<Json<IdResponse>, ServiceError> {
    Ok(Json(svc.update_member(&identity, &member_id, input)?))
}

async fn delete_member(
    State(svc): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(member_id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    svc.delete_member(&identity, &member_id)?;
    Ok(StatusCode::NO_CONTENT)
}
