use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::{Booking, BookingStatus, Event, EventFields, User};

use super::{BookingTally, ScanTarget, StoreError, TicketStore};

// In-memory реализация хранилища для тестов и локальных прогонов.
// Повторяет контракт Postgres-версии: уникальность id пользователя,
// условный переход статуса под одной блокировкой.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<String, User>,
    events: HashMap<String, Event>,
    bookings: HashMap<String, Booking>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_event(&self, event: Event) {
        self.inner
            .lock()
            .unwrap()
            .events
            .insert(event.id.clone(), event);
    }

    pub fn put_booking(&self, booking: Booking) {
        self.inner
            .lock()
            .unwrap()
            .bookings
            .insert(booking.id.clone(), booking);
    }

    pub fn put_user(&self, user: User) {
        self.inner.lock().unwrap().users.insert(user.id.clone(), user);
    }

    pub fn booking_status(&self, booking_id: &str) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .bookings
            .get(booking_id)
            .map(|b| b.status.clone())
    }

    pub fn user_count(&self) -> usize {
        self.inner.lock().unwrap().users.len()
    }
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.inner.lock().unwrap().users.get(id).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.contains_key(&user.id) {
            return Err(StoreError::UniqueViolation);
        }
        inner.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn find_event(&self, id: &str) -> Result<Option<Event>, StoreError> {
        Ok(self.inner.lock().unwrap().events.get(id).cloned())
    }

    async fn update_event(
        &self,
        id: &str,
        fields: &EventFields,
    ) -> Result<Option<Event>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(event) = inner.events.get_mut(id) else {
            return Ok(None);
        };
        event.title = fields.title.clone();
        event.description = fields.description.clone();
        event.category = fields.category.clone();
        event.date = fields.date;
        event.start_time = fields.start_time.clone();
        event.end_time = fields.end_time.clone();
        event.price = fields.price;
        event.venue = fields.venue.clone();
        event.city = fields.city.clone();
        event.capacity = fields.capacity;
        event.is_hidden_gem = fields.is_hidden_gem;
        Ok(Some(event.clone()))
    }

    async fn soft_delete_event(&self, id: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.events.get_mut(id) {
            Some(event) => {
                event.is_deleted = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn events_by_organizer(&self, organizer_id: &str) -> Result<Vec<Event>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut events: Vec<Event> = inner
            .events
            .values()
            .filter(|e| e.organizer_id == organizer_id)
            .cloned()
            .collect();
        events.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(events)
    }

    async fn ticket_counts(&self, event_id: &str) -> Result<Vec<BookingTally>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .bookings
            .values()
            .filter(|b| {
                b.event_id == event_id
                    && matches!(
                        BookingStatus::parse(&b.status),
                        Some(BookingStatus::Confirmed) | Some(BookingStatus::CheckedIn)
                    )
            })
            .map(|b| BookingTally {
                quantity: b.quantity,
                status: b.status.clone(),
            })
            .collect())
    }

    async fn find_booking_by_ticket(
        &self,
        ticket_id: &str,
    ) -> Result<Option<ScanTarget>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let Some(booking) = inner.bookings.values().find(|b| b.ticket_id == ticket_id) else {
            return Ok(None);
        };
        let event = inner
            .events
            .get(&booking.event_id)
            .ok_or(StoreError::Inconsistent("booking references missing event"))?;
        Ok(Some(ScanTarget {
            booking_id: booking.id.clone(),
            ticket_id: booking.ticket_id.clone(),
            attendee_id: booking.user_id.clone(),
            quantity: booking.quantity,
            status: booking.status.clone(),
            event_title: event.title.clone(),
            event_organizer_id: event.organizer_id.clone(),
        }))
    }

    async fn mark_checked_in(&self, booking_id: &str) -> Result<bool, StoreError> {
        // Проверка и запись под одной блокировкой, как условный апдейт в SQL
        let mut inner = self.inner.lock().unwrap();
        match inner.bookings.get_mut(booking_id) {
            Some(b) if b.status == BookingStatus::Confirmed.as_str() => {
                b.status = BookingStatus::CheckedIn.as_str().to_string();
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Ok(false),
        }
    }
}
