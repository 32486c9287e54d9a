//! Parameter extractors that reject with the JSON error envelope

use axum::Form;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;

use super::types::ApiError;

/// Ordered `(key, value)` pairs from the query string
#[derive(Debug)]
pub struct QueryPairs(pub Vec<(String, String)>);

impl<S> FromRequestParts<S> for QueryPairs
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(ApiError::from)?;
        Ok(Self(pairs))
    }
}

/// Ordered `(key, value)` pairs from a urlencoded body
#[derive(Debug)]
pub struct FormPairs(pub Vec<(String, String)>);

impl<S> FromRequest<S> for FormPairs
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
            .await
            .map_err(ApiError::from)?;
        Ok(Self(pairs))
    }
}
