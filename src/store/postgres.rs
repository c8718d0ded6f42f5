use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{Event, EventFields, Role, User};

use super::{BookingTally, ScanTarget, StoreError, TicketStore};

#[derive(Clone)]
pub struct PgTicketStore {
    pool: PgPool,
}

impl PgTicketStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// 23505 = unique_violation; различаем его, чтобы гонку первой вставки
// пользователя можно было разрулить повторным чтением
fn map_sqlx(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db) = e {
        if db.code().as_deref() == Some("23505") {
            return StoreError::UniqueViolation;
        }
    }
    StoreError::Database(e)
}

const EVENT_COLUMNS: &str = "id, title, description, category, date, start_time, end_time, \
     price, venue, city, capacity, is_hidden_gem, is_deleted, organizer_id";

#[async_trait]
impl TicketStore for PgTicketStore {
    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, (String, String, String)>(
            "SELECT id, email, role FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(row.map(|(id, email, role)| User {
            id,
            email,
            role: Role::parse(&role),
        }))
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO users (id, email, role) VALUES ($1, $2, $3)")
            .bind(&user.id)
            .bind(&user.email)
            .bind(user.role.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }

    async fn find_event(&self, id: &str) -> Result<Option<Event>, StoreError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn update_event(
        &self,
        id: &str,
        fields: &EventFields,
    ) -> Result<Option<Event>, StoreError> {
        let sql = format!(
            r#"
            UPDATE events
            SET title = $1, description = $2, category = $3, date = $4,
                start_time = $5, end_time = $6, price = $7, venue = $8,
                city = $9, capacity = $10, is_hidden_gem = $11
            WHERE id = $12
            RETURNING {EVENT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Event>(&sql)
            .bind(&fields.title)
            .bind(&fields.description)
            .bind(&fields.category)
            .bind(fields.date)
            .bind(&fields.start_time)
            .bind(&fields.end_time)
            .bind(fields.price)
            .bind(&fields.venue)
            .bind(&fields.city)
            .bind(fields.capacity)
            .bind(fields.is_hidden_gem)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn soft_delete_event(&self, id: &str) -> Result<bool, StoreError> {
        let res = sqlx::query("UPDATE events SET is_deleted = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(res.rows_affected() > 0)
    }

    async fn events_by_organizer(&self, organizer_id: &str) -> Result<Vec<Event>, StoreError> {
        let sql =
            format!("SELECT {EVENT_COLUMNS} FROM events WHERE organizer_id = $1 ORDER BY date ASC");
        sqlx::query_as::<_, Event>(&sql)
            .bind(organizer_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn ticket_counts(&self, event_id: &str) -> Result<Vec<BookingTally>, StoreError> {
        let rows = sqlx::query_as::<_, (i32, String)>(
            "SELECT quantity, status FROM bookings \
             WHERE event_id = $1 AND status IN ('CONFIRMED', 'CHECKED_IN')",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(rows
            .into_iter()
            .map(|(quantity, status)| BookingTally { quantity, status })
            .collect())
    }

    async fn find_booking_by_ticket(
        &self,
        ticket_id: &str,
    ) -> Result<Option<ScanTarget>, StoreError> {
        let row = sqlx::query_as::<_, (String, String, String, i32, String, String, String)>(
            r#"
            SELECT b.id, b.ticket_id, b.user_id, b.quantity, b.status,
                   e.title, e.organizer_id
            FROM bookings b
            JOIN events e ON e.id = b.event_id
            WHERE b.ticket_id = $1
            "#,
        )
        .bind(ticket_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(row.map(
            |(booking_id, ticket_id, attendee_id, quantity, status, event_title, organizer_id)| {
                ScanTarget {
                    booking_id,
                    ticket_id,
                    attendee_id,
                    quantity,
                    status,
                    event_title,
                    event_organizer_id: organizer_id,
                }
            },
        ))
    }

    async fn mark_checked_in(&self, booking_id: &str) -> Result<bool, StoreError> {
        // Условный апдейт: из двух одновременных сканов выигрывает ровно один
        let res = sqlx::query(
            "UPDATE bookings SET status = 'CHECKED_IN' \
             WHERE id = $1 AND status = 'CONFIRMED'",
        )
        .bind(booking_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(res.rows_affected() > 0)
    }
}
