//! seed.rs
//!
//! Загрузка демо-данных: организаторы, события и несколько бронирований,
//! чтобы сканирование можно было прогнать руками сразу после старта.
//! Данные каждый раз пересоздаются с нуля.

use anyhow::Context;
use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use gatepass::config::Config;
use gatepass::database::Database;

struct SeedEvent {
    title: &'static str,
    description: &'static str,
    category: &'static str,
    date: NaiveDate,
    start_time: &'static str,
    end_time: &'static str,
    price: i32,
    venue: &'static str,
    capacity: i32,
    is_hidden_gem: bool,
    organizer_id: &'static str,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid seed date")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().init();

    let config = Config::from_env();
    let db = Database::new(&config.database.url, config.database.pool_size)
        .await
        .context("failed to connect to database")?;
    db.run_migrations().await?;

    // Чистим в порядке внешних ключей
    sqlx::query("DELETE FROM bookings").execute(&db.pool).await?;
    sqlx::query("DELETE FROM events").execute(&db.pool).await?;
    sqlx::query("DELETE FROM users").execute(&db.pool).await?;
    info!("Old seed data removed");

    let organizers = [
        ("org-comedy", "comedy@test.com", "ORGANIZER"),
        ("org-music", "music@test.com", "ORGANIZER"),
        ("org-workshop", "workshop@test.com", "ORGANIZER"),
        ("attendee-1", "attendee@test.com", "USER"),
    ];
    for (id, email, role) in organizers {
        sqlx::query("INSERT INTO users (id, email, role) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(email)
            .bind(role)
            .execute(&db.pool)
            .await?;
    }
    info!("Users inserted");

    let events = [
        SeedEvent {
            title: "Stand-up Comedy Night",
            description: "An intimate stand-up comedy show featuring upcoming comics.",
            category: "Comedy",
            date: date(2026, 2, 1),
            start_time: "19:30",
            end_time: "21:00",
            price: 399,
            venue: "Indiranagar Social",
            capacity: 120,
            is_hidden_gem: true,
            organizer_id: "org-comedy",
        },
        SeedEvent {
            title: "Open Mic Comedy Evening",
            description: "A relaxed open mic night with new and experienced comedians.",
            category: "Comedy",
            date: date(2026, 2, 2),
            start_time: "20:00",
            end_time: "22:00",
            price: 299,
            venue: "Dialogue Cafe",
            capacity: 80,
            is_hidden_gem: false,
            organizer_id: "org-comedy",
        },
        SeedEvent {
            title: "Live Indie Music Gig",
            description: "Live performances by independent artists and bands.",
            category: "Music",
            date: date(2026, 2, 3),
            start_time: "20:00",
            end_time: "22:30",
            price: 499,
            venue: "Hard Rock Cafe",
            capacity: 200,
            is_hidden_gem: false,
            organizer_id: "org-music",
        },
        SeedEvent {
            title: "Watercolor Workshop for Beginners",
            description: "Learn the basics of watercolor painting in a hands-on workshop.",
            category: "Workshops",
            date: date(2026, 2, 4),
            start_time: "11:00",
            end_time: "14:00",
            price: 350,
            venue: "Art House Studio",
            capacity: 40,
            is_hidden_gem: false,
            organizer_id: "org-workshop",
        },
        SeedEvent {
            title: "Pottery Workshop for Beginners",
            description: "Hands-on pottery workshop focused on fundamentals.",
            category: "Workshops",
            date: date(2026, 2, 5),
            start_time: "10:00",
            end_time: "13:00",
            price: 450,
            venue: "Clay Station",
            capacity: 35,
            is_hidden_gem: true,
            organizer_id: "org-workshop",
        },
    ];

    let mut first_event_id = String::new();
    for event in &events {
        let id = Uuid::new_v4().to_string();
        if first_event_id.is_empty() {
            first_event_id = id.clone();
        }
        sqlx::query(
            r#"
            INSERT INTO events
                (id, title, description, category, date, start_time, end_time,
                 price, venue, city, capacity, is_hidden_gem, is_deleted, organizer_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, FALSE, $13)
            "#,
        )
        .bind(&id)
        .bind(event.title)
        .bind(event.description)
        .bind(event.category)
        .bind(event.date)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(event.price)
        .bind(event.venue)
        .bind("Chennai")
        .bind(event.capacity)
        .bind(event.is_hidden_gem)
        .bind(event.organizer_id)
        .execute(&db.pool)
        .await?;
    }
    info!("Events inserted");

    // Пара бронирований на первое событие: одно свежее, одно уже погашенное
    for (quantity, status) in [(2, "CONFIRMED"), (1, "CHECKED_IN")] {
        let ticket_id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO bookings (id, ticket_id, user_id, event_id, quantity, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&ticket_id)
        .bind("attendee-1")
        .bind(&first_event_id)
        .bind(quantity)
        .bind(status)
        .execute(&db.pool)
        .await?;
        info!("Booking {} x{} ticket: {}", status, quantity, ticket_id);
    }

    info!("Seed data inserted successfully");
    Ok(())
}
