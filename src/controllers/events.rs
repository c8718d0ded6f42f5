use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{Event, EventFields};
use crate::services::{capacity, events};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/organizer/events", get(organizer_events))
}

/* ---------- EVENTS ---------- */

// GET /api/events/{id}
async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state
        .store
        .find_event(&id)
        .await?
        .filter(|e| !e.is_deleted)
        .ok_or(ApiError::EventNotFound)?;

    Ok(Json(event))
}

// PUT /api/events/{id}
// Полная замена редактируемых полей, частичных апдейтов нет
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateEventRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    title: String,
    description: String,
    #[validate(length(min = 1, message = "category must not be empty"))]
    category: String,
    date: NaiveDate,
    #[validate(length(min = 1, message = "startTime must not be empty"))]
    start_time: String,
    #[validate(length(min = 1, message = "endTime must not be empty"))]
    end_time: String,
    #[validate(range(min = 0, message = "price must not be negative"))]
    price: i32,
    venue: String,
    city: String,
    #[validate(range(min = 1, message = "capacity must be at least 1"))]
    capacity: i32,
    is_hidden_gem: bool,
}

async fn update_event(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let fields = EventFields {
        title: req.title,
        description: req.description,
        category: req.category,
        date: req.date,
        start_time: req.start_time,
        end_time: req.end_time,
        price: req.price,
        venue: req.venue,
        city: req.city,
        capacity: req.capacity,
        is_hidden_gem: req.is_hidden_gem,
    };

    let updated = events::update_event(state.store.as_ref(), &id, fields, &user.user).await?;
    Ok(Json(updated))
}

// DELETE /api/events/{id}
async fn delete_event(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    events::soft_delete_event(state.store.as_ref(), &id, &user.user).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/* ---------- ORGANIZER DASHBOARD ---------- */

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrganizerEventRow {
    id: String,
    title: String,
    date: NaiveDate,
    capacity: i32,
    booked: i64,
    checked_in: i64,
    remaining: i64,
    is_deleted: bool,
}

// GET /api/organizer/events
//
// Организатор определяется только по предъявленному токену; id из запроса
// не принимается, чтобы нельзя было подсмотреть чужую статистику.
async fn organizer_events(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let events = state.store.events_by_organizer(&user.user.id).await?;

    let mut rows = Vec::with_capacity(events.len());
    for event in events {
        let tallies = state.store.ticket_counts(&event.id).await?;
        let summary = capacity::tally(event.capacity, &tallies);
        rows.push(OrganizerEventRow {
            id: event.id,
            title: event.title,
            date: event.date,
            capacity: event.capacity,
            booked: summary.booked,
            checked_in: summary.checked_in,
            remaining: summary.remaining,
            is_deleted: event.is_deleted,
        });
    }

    Ok(Json(rows))
}
