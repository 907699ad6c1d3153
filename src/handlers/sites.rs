// src/handlers/sites.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{db_utils::resolve_site_access, error::{ApiError, AppError}},
    config::AppState,
    middleware::{
        access::{AdminOnly, RequireRole},
        auth::AuthenticatedUser,
        i18n::Locale,
    },
    models::sites::CreateSitePayload,
};

// POST /api/sites (apenas admins)
pub async fn create_site(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<AdminOnly>,
    Json(payload): Json<CreateSitePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let site = app_state
        .site_service
        .create_site_with_manager(
            payload.name.trim(),
            payload.code.trim(),
            payload.address.as_deref(),
            &user.0,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(site)))
}

// GET /api/sites
pub async fn list_sites(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let sites = app_state
        .site_service
        .list_sites_for(&user.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(sites)))
}

// GET /api/sites/{id}
pub async fn get_site(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(site_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    // Quem não tem concessão nesta obra não vê nem o detalhe
    resolve_site_access(&app_state, site_id, &user.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let site = app_state
        .site_service
        .get_site(site_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(site)))
}
