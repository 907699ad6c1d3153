// src/middleware/site.rs

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use uuid::Uuid;

use crate::common::error::AppError;

// O nome do nosso cabeçalho HTTP customizado
const SITE_ID_HEADER: &str = "x-site-id";

// O extrator da obra em que o usuário está trabalhando.
// Quem garante que ele PODE trabalhar nela é o site_guard.
#[derive(Debug, Clone, Copy)]
pub struct SiteContext(pub Uuid);

impl<S> FromRequestParts<S> for SiteContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        // Depois do site_guard o contexto já está nos extensions;
        // senão, caímos para o cabeçalho.
        if let Some(ctx) = parts.extensions.get::<SiteContext>() {
            return Ok(*ctx);
        }

        let header_value = parts.headers.get(SITE_ID_HEADER);

        match header_value {
            Some(value) => {
                let value_str = value.to_str().map_err(|_| AppError::SiteHeaderInvalid)?;
                let site_id =
                    Uuid::parse_str(value_str).map_err(|_| AppError::SiteHeaderInvalid)?;
                Ok(SiteContext(site_id))
            }
            None => Err(AppError::SiteHeaderMissing),
        }
    }
}
