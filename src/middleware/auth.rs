use crate::{error::AppError, models::User, services::accounts, AppState};
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

/// The authenticated caller, resolved from a bearer session token
pub struct CurrentUser(pub User);

/// Caller identity on routes that work with or without a session; a missing,
/// invalid or expired token is treated as anonymous
pub struct OptionalUser(pub Option<User>);

/// Caller that must hold the admin flag
pub struct AdminUser(pub User);

/// Pulls the bearer token out of an Authorization header, if any
pub fn bearer_from_headers(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    bearer_from_headers(&parts.headers)
}

#[async_trait::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("Missing session token".to_string()))?;

        let user = accounts::user_for_token(&state.db, token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired session".to_string()))?;

        Ok(CurrentUser(user))
    }
}

#[async_trait::async_trait]
impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = match bearer_token(parts) {
            Some(token) => accounts::user_for_token(&state.db, token).await?,
            None => None,
        };

        Ok(OptionalUser(user))
    }
}

#[async_trait::async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(AdminUser(user))
    }
}
