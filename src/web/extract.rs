//! Request extractors: the admin guard and form-style bodies.

use axum::extract::{FromRequest, FromRequestParts, Multipart, Request};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::request::Parts;
use axum::{Form, Json};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::AppState;
use super::errors::AppError;
use crate::auth::{AuthError, parse_bearer};

/// Rejects the request with 401 unless it carries a live admin token.
pub struct RequireAdmin {
    pub token: String,
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let value = match parts.headers.get(AUTHORIZATION) {
            None => return Err(AuthError::Missing.into()),
            Some(v) => v.to_str().map_err(|_| AuthError::Malformed)?,
        };
        if value.trim().is_empty() {
            return Err(AuthError::Missing.into());
        }

        let token = parse_bearer(value)?;
        if !state.tokens.is_valid(token) {
            return Err(AuthError::InvalidToken.into());
        }
        Ok(RequireAdmin {
            token: token.to_string(),
        })
    }
}

/// Form fields from a urlencoded, multipart, or JSON body.
///
/// Browsers posting `FormData` send multipart; curl and tests usually send
/// urlencoded. A missing or unrecognized body yields no fields, so `T`'s
/// serde defaults apply.
pub struct FormFields<T>(pub T);

impl<S, T> FromRequest<S> for FormFields<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let mut fields = Map::new();

        if content_type.starts_with("multipart/form-data") {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.to_string()))?;
            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|e| AppError::Validation(e.to_string()))?
            {
                let Some(name) = field.name().map(str::to_string) else {
                    continue;
                };
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                fields.insert(name, Value::String(text));
            }
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.to_string()))?;
            for (name, text) in pairs {
                fields.insert(name, Value::String(text));
            }
        } else if content_type.starts_with("application/json") {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.to_string()))?;
            return Ok(FormFields(value));
        }

        serde_json::from_value(Value::Object(fields))
            .map(FormFields)
            .map_err(|e| AppError::Validation(e.to_string()))
    }
}
