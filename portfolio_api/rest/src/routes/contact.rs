use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use portfolio_core_contact_contracts::ContactService;
use portfolio_models::contact::{ContactSubmission, SubmissionErrorKind};

pub fn router(service: Arc<impl ContactService>) -> Router<()> {
    Router::new()
        .route("/contact", routing::post(submit))
        .with_state(service)
}

async fn submit(
    service: State<Arc<impl ContactService>>,
    Json(submission): Json<ContactSubmission>,
) -> Response {
    let result = service.submit(submission).await;

    let status = match result.error {
        None => StatusCode::OK,
        Some(SubmissionErrorKind::ValidationError) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(SubmissionErrorKind::SendError) => StatusCode::BAD_GATEWAY,
        Some(SubmissionErrorKind::ServerError) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(result)).into_response()
}
