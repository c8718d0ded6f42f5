use axum::{extract::State, response::IntoResponse, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::checkin::{self, CheckInSuccess};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/tickets/validate", post(validate_ticket))
}

// POST /api/tickets/validate
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidateTicketRequest {
    ticket_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateTicketResponse {
    success: bool,
    #[serde(flatten)]
    details: CheckInSuccess,
}

async fn validate_ticket(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<ValidateTicketRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ticket_id = req.ticket_id.trim();
    if ticket_id.is_empty() {
        return Err(ApiError::Validation("ticketId must not be empty".into()));
    }

    // Сканировать может только организатор, предъявивший токен
    let details = checkin::check_in(state.store.as_ref(), ticket_id, &user.user.id).await?;

    Ok(Json(ValidateTicketResponse {
        success: true,
        details,
    }))
}
