//! store
//!
//! Доступ к реляционному хранилищу за одним трейтом, чтобы логику
//! проверки билетов и подсчета вместимости можно было гонять на
//! in-memory реализации без поднятого Postgres.

use async_trait::async_trait;

use crate::models::{Event, EventFields, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgTicketStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    // Нарушение уникального ключа (id пользователя, ticket_id)
    #[error("unique constraint violation")]
    UniqueViolation,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store inconsistency: {0}")]
    Inconsistent(&'static str),
}

// Строка тиража по одному бронированию: сколько билетов и в каком статусе
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingTally {
    pub quantity: i32,
    pub status: String,
}

// Все, что нужно машине состояний для решения по одному скану:
// само бронирование плюс владелец и название события
#[derive(Debug, Clone)]
pub struct ScanTarget {
    pub booking_id: String,
    pub ticket_id: String,
    pub attendee_id: String,
    pub quantity: i32,
    pub status: String,
    pub event_title: String,
    pub event_organizer_id: String,
}

#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError>;

    // Только вставка, никогда не обновление. Повторная вставка того же id
    // обязана вернуть UniqueViolation.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    // Возвращает событие и в случае soft delete; фильтрует вызывающий код
    async fn find_event(&self, id: &str) -> Result<Option<Event>, StoreError>;

    // Целиком заменяет редактируемые поля. None, если строки уже нет.
    async fn update_event(
        &self,
        id: &str,
        fields: &EventFields,
    ) -> Result<Option<Event>, StoreError>;

    // Ставит is_deleted = TRUE. false, если строки нет.
    async fn soft_delete_event(&self, id: &str) -> Result<bool, StoreError>;

    // События организатора по возрастанию даты, включая удаленные
    async fn events_by_organizer(&self, organizer_id: &str) -> Result<Vec<Event>, StoreError>;

    // Бронирования события в статусах CONFIRMED / CHECKED_IN; остальные
    // статусы в подсчет вместимости не попадают уже на этом уровне
    async fn ticket_counts(&self, event_id: &str) -> Result<Vec<BookingTally>, StoreError>;

    async fn find_booking_by_ticket(
        &self,
        ticket_id: &str,
    ) -> Result<Option<ScanTarget>, StoreError>;

    // Условный переход CONFIRMED -> CHECKED_IN одним запросом.
    // true, если строка была переведена именно этим вызовом; false
    // означает, что статус уже не CONFIRMED (в т.ч. проигрыш гонки).
    async fn mark_checked_in(&self, booking_id: &str) -> Result<bool, StoreError>;
}
