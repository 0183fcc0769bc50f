use axum::{
	Json, Router,
	extract::{Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::get,
};
use serde::Serialize;

use planfeed_service::{Error, SearchRequest, SearchResponse};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/planning_search", get(planning_search))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn planning_search(
	State(state): State<AppState>,
	Query(req): Query<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search(req).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: &'static str,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: &'static str, message: impl Into<String>) -> Self {
		Self { status, error_code, message: message.into() }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		let message = err.to_string();

		match err {
			Error::InvalidRequest { .. } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_request", message),
			Error::Engine { .. } => {
				tracing::warn!(error = %message, "Planning search failed.");

				Self::new(StatusCode::BAD_GATEWAY, "engine_error", message)
			},
			Error::InvalidResponse { .. } => {
				tracing::warn!(error = %message, "Planning search got an invalid engine response.");

				Self::new(StatusCode::BAD_GATEWAY, "invalid_engine_response", message)
			},
			Error::Config { .. } =>
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message),
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code.to_string(), message: self.message };

		(self.status, Json(body)).into_response()
	}
}
