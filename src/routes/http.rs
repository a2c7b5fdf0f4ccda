//! HTTP endpoint handlers. These are thin wrappers that forward to session state.
//! Each handler is instrumented and logs the session id and basic result info.

use std::sync::Arc;
use axum::{
  extract::{rejection::JsonRejection, FromRequest, Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument, warn};

use crate::logic::level_list;
use crate::protocol::*;
use crate::session::Action;
use crate::state::AppState;

/// Error body `{ "error": ... }` with a status code.
pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    (self.0, Json(ErrorOut { error: self.1 })).into_response()
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    warn!(target: "quiz", status = %rejection.status(), error = %rejection.body_text(), "Rejected request body");
    ApiError(rejection.status(), rejection.body_text())
  }
}

/// `Json` whose rejections (bad syntax, wrong shape, missing content type) use the error body too.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

fn unknown_session(id: &str) -> ApiError {
  ApiError(StatusCode::NOT_FOUND, format!("Unknown session: {id}"))
}

async fn apply(state: &AppState, id: &str, action: Action) -> Result<Json<SessionView>, ApiError> {
  match state.apply(id, action).await {
    Ok(Some(view)) => Ok(Json(view)),
    Ok(None) => Err(unknown_session(id)),
    Err(e) => {
      warn!(target: "quiz", %id, error = %e, "Rejected session action");
      Err(ApiError(StatusCode::BAD_REQUEST, e.to_string()))
    }
  }
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info")]
pub async fn http_get_levels() -> impl IntoResponse {
  Json(LevelsOut { levels: level_list() })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_records(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let records = state.records().await;
  info!(target: "records", count = records.len(), "HTTP records served");
  Json(RecordsOut { records })
}

#[instrument(level = "info", skip(state))]
pub async fn http_create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let (id, session) = state.create_session().await;
  Json(SessionCreatedOut { id, session })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
  state.session_view(&id).await.map(Json).ok_or_else(|| unknown_session(&id))
}

#[instrument(level = "info", skip(state))]
pub async fn http_delete_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  if state.drop_session(&id).await { Ok(StatusCode::NO_CONTENT) } else { Err(unknown_session(&id)) }
}

#[instrument(level = "info", skip(state, body), fields(level_index = body.level_index))]
pub async fn http_start_level(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  JsonBody(body): JsonBody<StartIn>,
) -> Result<Json<SessionView>, ApiError> {
  apply(&state, &id, Action::StartLevel(body.level_index)).await
}

#[instrument(level = "info", skip(state, body), fields(answer_len = body.answer.len()))]
pub async fn http_submit_answer(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  JsonBody(body): JsonBody<AnswerIn>,
) -> Result<Json<SessionView>, ApiError> {
  let view = apply(&state, &id, Action::SubmitAnswer(body.answer)).await?;
  if let Some(v) = &view.verdict {
    info!(target: "quiz", %id, correct = v.verdict.correct, "HTTP answer evaluated");
  }
  Ok(view)
}

#[instrument(level = "info", skip(state))]
pub async fn http_next(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
  apply(&state, &id, Action::Advance).await
}

#[instrument(level = "info", skip(state))]
pub async fn http_menu(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
  apply(&state, &id, Action::ReturnToMenu).await
}
