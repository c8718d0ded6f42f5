use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::models::User;

// Кеш разрешенных токенов: sha256(токен) -> JSON пользователя с TTL.
// Работает по принципу best effort: любая ошибка Redis означает просто
// промах, запрос идет обычным путем через провайдера.
#[derive(Clone)]
pub struct CacheService {
    conn: MultiplexedConnection,
    ttl_seconds: u64,
}

impl CacheService {
    pub async fn connect(redis_url: &str, ttl_seconds: u64) -> redis::RedisResult<Self> {
        let client = Client::open(redis_url)?;
        let conn = client.get_multiplexed_tokio_connection().await?;
        Ok(Self { conn, ttl_seconds })
    }

    // Сырой bearer-токен в ключах не светим
    fn identity_key(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("identity:{:x}", hasher.finalize())
    }

    pub async fn get_identity(&self, token: &str) -> Option<User> {
        let mut conn = self.conn.clone();
        let cached: Result<Option<String>, _> = conn.get(Self::identity_key(token)).await;
        cached
            .ok()
            .flatten()
            .and_then(|json| serde_json::from_str(&json).ok())
    }

    pub async fn put_identity(&self, token: &str, user: &User) {
        let Ok(json) = serde_json::to_string(user) else {
            return;
        };
        let mut conn = self.conn.clone();
        let res: Result<(), _> = conn
            .set_ex(Self::identity_key(token), json, self.ttl_seconds)
            .await;
        if let Err(e) = res {
            debug!("identity cache write failed: {:?}", e);
        }
    }
}
