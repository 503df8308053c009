use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use board_core::{IdResponse, ServiceError};

use crate::api::AppState;
use crate::model::{JoinRequest, LoginForm, LoginResponse};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/join", post(join))
        .route("/login", post(login))
}

/// POST /join: register a member.
async fn join(
    State(svc): State<AppState>,
    Json(input): Json<JoinRequest>,
) -> Result<(StatusCode, Json<IdResponse>), ServiceError> {
    let created = svc.join(input)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /login: form `username` + `password`, returns a bearer token.
async fn login(
    State(svc): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<LoginResponse>, ServiceError> {
    let token = svc.login(&form.username, &form.password)?;
    Ok(Json(token))
}
