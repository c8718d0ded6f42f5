use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Статусы жизненного цикла бронирования. Ядро выполняет единственный
// переход CONFIRMED -> CHECKED_IN, остальные статусы только читает.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
    CheckedIn,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::CheckedIn => "CHECKED_IN",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    // None для статусов вне ядра; вызывающий код решает, что с ними делать
    pub fn parse(s: &str) -> Option<BookingStatus> {
        match s {
            "CONFIRMED" => Some(BookingStatus::Confirmed),
            "CHECKED_IN" => Some(BookingStatus::CheckedIn),
            "CANCELLED" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub ticket_id: String,
    pub user_id: String,
    pub event_id: String,
    pub quantity: i32,
    pub status: String,
}
