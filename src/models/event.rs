use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub price: i32,
    pub venue: String,
    pub city: String,
    pub capacity: i32,
    pub is_hidden_gem: bool,
    pub is_deleted: bool,
    pub organizer_id: String,
}

// Полный набор редактируемых полей события. organizer_id и is_deleted
// через этот путь не меняются никогда.
#[derive(Debug, Clone)]
pub struct EventFields {
    pub title: String,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub price: i32,
    pub venue: String,
    pub city: String,
    pub capacity: i32,
    pub is_hidden_gem: bool,
}
