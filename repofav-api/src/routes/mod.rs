/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Signup, login, logout, current user
/// - `github`: OAuth linking and repository listing
/// - `favorites`: Favorite repositories

pub mod auth;
pub mod favorites;
pub mod github;
pub mod health;

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that has passed `validator` checks
///
/// Malformed JSON and failed validation both reject with 400.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        value.validate()?;
        Ok(Self(value))
    }
}
