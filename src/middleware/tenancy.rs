// src/middleware/tenancy.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::common::error::{ApiError, AppError};

// O nome do nosso cabeçalho HTTP customizado
pub const STORE_ID_HEADER: &str = "x-store-id";

// Loja (tenant) que o utilizador quer aceder.
#[derive(Debug, Clone, Copy)]
pub struct StoreContext(pub Uuid);

impl<S> FromRequestParts<S> for StoreContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(STORE_ID_HEADER)
            .ok_or(AppError::MissingStoreHeader)?;

        let value_str = value.to_str().map_err(|_| AppError::InvalidStoreHeader)?;

        let store_id = Uuid::parse_str(value_str.trim()).map_err(|_| AppError::InvalidStoreHeader)?;

        Ok(StoreContext(store_id))
    }
}
