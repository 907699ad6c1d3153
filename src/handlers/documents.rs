// src/handlers/documents.rs

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, site::SiteContext},
};

// GET /api/inventory/transactions/{id}/slip
pub async fn transaction_slip(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    site: SiteContext,
    Path(transaction_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let pdf_bytes = app_state
        .document_service
        .generate_transaction_slip(site.0, transaction_id, &locale)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    // Configura os Headers para o navegador baixar ou mostrar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"guia_{}.pdf\"", transaction_id),
        ),
    ];

    Ok((headers, pdf_bytes).into_response())
}
