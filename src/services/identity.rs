//! identity.rs
//!
//! Интеграция с внешним identity-провайдером и ленивое заведение
//! локального пользователя.
//!
//! Ключевые компоненты:
//! 1.  **IdentityClient**: HTTP-клиент к GoTrue-совместимому эндпоинту
//!     `/auth/v1/user`. Любой сбой провайдера (сеть, 4xx, кривой ответ)
//!     схлопывается в "пользователя нет" — наружу уходит 401, детали в лог.
//! 2.  **resolve_user**: по подтвержденной внешней личности находит или
//!     создает локальную запись. Только вставка, существующая строка не
//!     пересинхронизируется. Гонка двух первых входов разрешается через
//!     уникальный ключ id: проигравший ловит UniqueViolation и перечитывает.

use serde::Deserialize;
use tracing::warn;

use crate::config::IdentityConfig;
use crate::error::ApiError;
use crate::models::{Role, User};
use crate::store::{StoreError, TicketStore};

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalUser {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl IdentityClient {
    pub fn new(base_url: String, api_key: String, timeout_seconds: u64) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .expect("Failed to build identity HTTP client");
        Self {
            http,
            base_url,
            api_key,
        }
    }

    pub fn from_config(config: &IdentityConfig) -> Self {
        Self::new(
            config.provider_url.clone(),
            config.api_key.clone(),
            config.timeout_seconds,
        )
    }

    // Опознает предъявителя токена. None означает, что токен не принят
    // провайдером либо провайдер недоступен.
    pub async fn authenticate(&self, token: &str) -> Option<ExternalUser> {
        let url = format!("{}/auth/v1/user", self.base_url.trim_end_matches('/'));

        let response = match self
            .http
            .get(&url)
            .bearer_auth(token)
            .header("apikey", &self.api_key)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("identity provider unreachable: {:?}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            return None;
        }

        match response.json::<ExternalUser>().await {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("identity provider returned malformed user: {:?}", e);
                None
            }
        }
    }
}

// Находит локального пользователя по внешнему id или создает его с ролью
// USER. email существующей записи не трогается.
pub async fn resolve_user(
    store: &dyn TicketStore,
    external: &ExternalUser,
) -> Result<User, ApiError> {
    let email = external.email.as_deref().unwrap_or("").trim();
    if external.id.trim().is_empty() || email.is_empty() {
        return Err(ApiError::InvalidIdentity);
    }

    if let Some(user) = store.find_user(&external.id).await? {
        return Ok(user);
    }

    let user = User {
        id: external.id.clone(),
        email: email.to_string(),
        role: Role::User,
    };

    match store.insert_user(&user).await {
        Ok(()) => Ok(user),
        // Параллельный первый вход уже вставил строку, берем ее
        Err(StoreError::UniqueViolation) => Ok(store
            .find_user(&external.id)
            .await?
            .ok_or(StoreError::Inconsistent("user vanished after insert race"))?),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn external(id: &str, email: &str) -> ExternalUser {
        ExternalUser {
            id: id.into(),
            email: Some(email.into()),
        }
    }

    #[tokio::test]
    async fn first_sight_creates_user_with_role_user() {
        let store = MemoryStore::new();

        let user = resolve_user(&store, &external("u1", "a@b.com"))
            .await
            .unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.role, Role::User);
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn existing_user_is_not_resynced_from_provider() {
        let store = MemoryStore::new();
        store.put_user(User {
            id: "u1".into(),
            email: "old@b.com".into(),
            role: Role::Organizer,
        });

        let user = resolve_user(&store, &external("u1", "new@b.com"))
            .await
            .unwrap();

        // Email и роль остаются как в хранилище
        assert_eq!(user.email, "old@b.com");
        assert_eq!(user.role, Role::Organizer);
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn missing_email_is_rejected() {
        let store = MemoryStore::new();
        let no_email = ExternalUser {
            id: "u1".into(),
            email: None,
        };

        let err = resolve_user(&store, &no_email).await.unwrap_err();

        assert!(matches!(err, ApiError::InvalidIdentity));
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn blank_id_is_rejected() {
        let store = MemoryStore::new();

        let err = resolve_user(&store, &external("  ", "a@b.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::InvalidIdentity));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_first_sight_resolves_to_single_row() {
        let store = Arc::new(MemoryStore::new());

        let a = {
            let store = store.clone();
            tokio::spawn(
                async move { resolve_user(store.as_ref(), &external("u1", "a@b.com")).await },
            )
        };
        let b = {
            let store = store.clone();
            tokio::spawn(
                async move { resolve_user(store.as_ref(), &external("u1", "a@b.com")).await },
            )
        };

        let ra = a.await.unwrap().unwrap();
        let rb = b.await.unwrap().unwrap();

        assert_eq!(ra.id, "u1");
        assert_eq!(rb.id, "u1");
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn authenticate_returns_user_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("apikey", "anon-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({
                    "id": "u1",
                    "email": "a@b.com",
                    "aud": "authenticated"
                })),
            )
            .mount(&server)
            .await;

        let client = IdentityClient::new(server.uri(), "anon-key".into(), 5);
        let user = client.authenticate("some-token").await.unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(user.email.as_deref(), Some("a@b.com"));
    }

    #[tokio::test]
    async fn authenticate_maps_rejected_token_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "invalid JWT"
            })))
            .mount(&server)
            .await;

        let client = IdentityClient::new(server.uri(), "anon-key".into(), 5);

        assert!(client.authenticate("bad-token").await.is_none());
    }
}
