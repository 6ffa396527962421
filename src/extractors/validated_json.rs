//! Validated JSON extractor.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::domain::violation_messages;
use crate::errors::AppError;

/// JSON extractor that rejects the request before the handler runs when the
/// payload fails validation. Validation failure and persistence failure are
/// mutually exclusive: a rejected payload never reaches the repository.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // A body that does not even deserialize yields a single violation.
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(vec![e.body_text()]))?;

        // All rules are checked; the client sees every violation at once.
        value
            .validate()
            .map_err(|e| AppError::Validation(violation_messages(&e)))?;

        Ok(ValidatedJson(value))
    }
}
