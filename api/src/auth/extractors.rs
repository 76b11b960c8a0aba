use axum::{
    extract::{FromRequestParts, Query},
    http::{StatusCode, request::Parts},
};
use axum_extra::extract::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use std::collections::HashMap;
use util::config::AppConfig;

use crate::auth::claims::{AuthUser, Claims};

/// Extracts `AuthUser` from a Bearer token.
///
/// The token is read from the `Authorization` header, or from a `token`
/// query parameter for WebSocket upgrades where browsers cannot set headers.
///
/// # Errors
/// `401 Unauthorized` when no token is present or it does not verify.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
            Ok(TypedHeader(Authorization(bearer))) => bearer.token().to_owned(),
            Err(_) => query_token(parts)
                .ok_or((StatusCode::UNAUTHORIZED, "Missing or invalid Authorization header"))?,
        };

        let secret = AppConfig::global().jwt_secret.clone();
        let token_data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| (StatusCode::UNAUTHORIZED, "Invalid or expired token"))?;

        Ok(AuthUser(token_data.claims))
    }
}

fn query_token(parts: &Parts) -> Option<String> {
    let Query(params) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri).ok()?;
    params.get("token").filter(|t| !t.is_empty()).cloned()
}
