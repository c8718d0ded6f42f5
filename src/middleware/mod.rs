use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::User;
use crate::services::identity::resolve_user;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

// Bearer-auth extractor: токен -> кеш -> identity-провайдер -> локальный
// пользователь. Любой невалидный токен дает один и тот же 401.
impl FromRequestParts<Arc<crate::AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<crate::AppState>,
    ) -> Result<Self, Self::Rejection> {
        // Получаем заголовок Authorization
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthenticated)?;

        // Горячий путь: токен уже разрешался недавно
        if let Some(user) = state.cache.get_identity(token).await {
            return Ok(AuthUser { user });
        }

        let external = state
            .identity
            .authenticate(token)
            .await
            .ok_or(ApiError::Unauthenticated)?;

        let user = resolve_user(state.store.as_ref(), &external).await?;

        state.cache.put_identity(token, &user).await;

        Ok(AuthUser { user })
    }
}
