use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::store::StoreError;

// Все исходы, видимые клиенту. Сообщения короткие и различимые,
// чтобы UI сканера мог показать конкретную причину отказа.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid identity")]
    InvalidIdentity,
    #[error("Unauthorized")]
    Unauthenticated,
    #[error("Forbidden")]
    Forbidden,
    #[error("Event not found")]
    EventNotFound,
    #[error("Invalid ticket")]
    TicketNotFound,
    #[error("Unauthorized ticket scan")]
    UnauthorizedScan,
    #[error("Ticket already checked in")]
    AlreadyCheckedIn,
    #[error("Ticket is not valid")]
    TicketNotValid,
    #[error("{0}")]
    Validation(String),
    #[error("Internal server error")]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidIdentity => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::EventNotFound => StatusCode::NOT_FOUND,
            ApiError::TicketNotFound => StatusCode::NOT_FOUND,
            ApiError::UnauthorizedScan => StatusCode::FORBIDDEN,
            ApiError::AlreadyCheckedIn => StatusCode::CONFLICT,
            ApiError::TicketNotValid => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Детали ошибок хранилища наружу не отдаем, только в лог
        if let ApiError::Store(ref e) = self {
            tracing::error!("store error: {:?}", e);
        }
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
