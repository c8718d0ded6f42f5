//! checkin.rs
//!
//! Машина состояний гашения билета. Один скан — одна попытка перевода
//! бронирования CONFIRMED -> CHECKED_IN.
//!
//! Порядок проверок фиксирован, первый сработавший отказ выигрывает:
//! 1. билет не найден;
//! 2. событие принадлежит другому организатору (ADMIN здесь НЕ имеет
//!    обхода — сканировать может только владелец события);
//! 3. билет уже погашен;
//! 4. статус не CONFIRMED (отмененные и прочие);
//! 5. иначе условный апдейт; проигравший гонку скан получает тот же
//!    ответ, что и повторный.

use serde::Serialize;

use crate::error::ApiError;
use crate::models::BookingStatus;
use crate::store::TicketStore;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInSuccess {
    pub event_title: String,
    pub ticket_id: String,
    pub quantity: i32,
    pub attendee_id: String,
}

pub async fn check_in(
    store: &dyn TicketStore,
    ticket_id: &str,
    requesting_organizer_id: &str,
) -> Result<CheckInSuccess, ApiError> {
    let target = store
        .find_booking_by_ticket(ticket_id)
        .await?
        .ok_or(ApiError::TicketNotFound)?;

    if target.event_organizer_id != requesting_organizer_id {
        return Err(ApiError::UnauthorizedScan);
    }

    match BookingStatus::parse(&target.status) {
        Some(BookingStatus::CheckedIn) => return Err(ApiError::AlreadyCheckedIn),
        Some(BookingStatus::Confirmed) => {}
        _ => return Err(ApiError::TicketNotValid),
    }

    // Между чтением и записью статус мог смениться, поэтому полагаемся
    // только на результат условного апдейта
    if !store.mark_checked_in(&target.booking_id).await? {
        return Err(ApiError::AlreadyCheckedIn);
    }

    Ok(CheckInSuccess {
        event_title: target.event_title,
        ticket_id: target.ticket_id,
        quantity: target.quantity,
        attendee_id: target.attendee_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Booking, Event, Role, User};
    use crate::store::MemoryStore;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn organizer(id: &str) -> User {
        User {
            id: id.into(),
            email: format!("{id}@test.com"),
            role: Role::Organizer,
        }
    }

    fn event(id: &str, organizer_id: &str) -> Event {
        Event {
            id: id.into(),
            title: "Live Indie Music Gig".into(),
            description: String::new(),
            category: "Music".into(),
            date: NaiveDate::from_ymd_opt(2026, 2, 3).unwrap(),
            start_time: "20:00".into(),
            end_time: "22:30".into(),
            price: 499,
            venue: "Hard Rock Cafe".into(),
            city: "Chennai".into(),
            capacity: 200,
            is_hidden_gem: false,
            is_deleted: false,
            organizer_id: organizer_id.into(),
        }
    }

    fn booking(id: &str, ticket_id: &str, event_id: &str, status: &str) -> Booking {
        Booking {
            id: id.into(),
            ticket_id: ticket_id.into(),
            user_id: "attendee-1".into(),
            event_id: event_id.into(),
            quantity: 2,
            status: status.into(),
        }
    }

    fn store_with_booking(status: &str) -> MemoryStore {
        let store = MemoryStore::new();
        store.put_user(organizer("org-music"));
        store.put_event(event("ev-1", "org-music"));
        store.put_booking(booking("bk-1", "T1", "ev-1", status));
        store
    }

    #[tokio::test]
    async fn confirmed_ticket_checks_in_and_reports_booking_details() {
        let store = store_with_booking("CONFIRMED");

        let result = check_in(&store, "T1", "org-music").await.unwrap();

        assert_eq!(result.event_title, "Live Indie Music Gig");
        assert_eq!(result.ticket_id, "T1");
        assert_eq!(result.quantity, 2);
        assert_eq!(result.attendee_id, "attendee-1");
        assert_eq!(store.booking_status("bk-1").as_deref(), Some("CHECKED_IN"));
    }

    #[tokio::test]
    async fn second_scan_reports_already_checked_in() {
        let store = store_with_booking("CONFIRMED");

        check_in(&store, "T1", "org-music").await.unwrap();
        let err = check_in(&store, "T1", "org-music").await.unwrap_err();

        assert!(matches!(err, ApiError::AlreadyCheckedIn));
    }

    #[tokio::test]
    async fn unknown_ticket_is_not_found() {
        let store = store_with_booking("CONFIRMED");

        let err = check_in(&store, "no-such-ticket", "org-music")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::TicketNotFound));
    }

    #[tokio::test]
    async fn foreign_organizer_cannot_scan_regardless_of_status() {
        for status in ["CONFIRMED", "CHECKED_IN", "CANCELLED"] {
            let store = store_with_booking(status);

            let err = check_in(&store, "T1", "org-other").await.unwrap_err();

            assert!(matches!(err, ApiError::UnauthorizedScan));
            // Чужой скан ничего не меняет
            assert_eq!(store.booking_status("bk-1").as_deref(), Some(status));
        }
    }

    #[tokio::test]
    async fn cancelled_ticket_is_rejected_as_not_valid() {
        let store = store_with_booking("CANCELLED");

        let err = check_in(&store, "T1", "org-music").await.unwrap_err();

        assert!(matches!(err, ApiError::TicketNotValid));
        assert_eq!(store.booking_status("bk-1").as_deref(), Some("CANCELLED"));
    }

    #[tokio::test]
    async fn already_checked_in_wins_over_not_valid() {
        let store = store_with_booking("CHECKED_IN");

        let err = check_in(&store, "T1", "org-music").await.unwrap_err();

        assert!(matches!(err, ApiError::AlreadyCheckedIn));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_scans_admit_exactly_one() {
        let store = Arc::new(store_with_booking("CONFIRMED"));

        let a = {
            let store = store.clone();
            tokio::spawn(async move { check_in(store.as_ref(), "T1", "org-music").await })
        };
        let b = {
            let store = store.clone();
            tokio::spawn(async move { check_in(store.as_ref(), "T1", "org-music").await })
        };

        let results = [a.await.unwrap(), b.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let already = results
            .iter()
            .filter(|r| matches!(r, Err(ApiError::AlreadyCheckedIn)))
            .count();

        assert_eq!(successes, 1);
        assert_eq!(already, 1);
        assert_eq!(store.booking_status("bk-1").as_deref(), Some("CHECKED_IN"));
    }
}
