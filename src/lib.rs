pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;

use std::sync::Arc;

// Shared state для всего приложения
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn store::TicketStore>,
    pub identity: services::identity::IdentityClient,
    pub cache: cache::CacheService,
    pub config: config::Config,
}
