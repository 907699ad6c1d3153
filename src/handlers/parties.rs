// src/handlers/parties.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        access::{ManageAccess, RequireSiteAccess},
        auth::AuthenticatedUser,
        i18n::Locale,
        site::SiteContext,
    },
    models::parties::{CreatePartyPayload, PartyKind},
};

// POST /api/parties (MANAGE: é cadastro da obra)
pub async fn create_party(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    site: SiteContext,
    _guard: RequireSiteAccess<ManageAccess>,
    Json(payload): Json<CreatePartyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let party = app_state
        .party_service
        .create_party(
            site.0,
            payload.kind,
            &payload.name,
            payload.phone.as_deref(),
            payload.notes.as_deref(),
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(party)))
}

#[derive(Debug, Deserialize)]
pub struct PartiesQuery {
    pub kind: Option<PartyKind>,
}

// GET /api/parties?kind=SUPPLIER
pub async fn list_parties(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    site: SiteContext,
    Query(query): Query<PartiesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let parties = app_state
        .party_service
        .list_parties(site.0, query.kind)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(parties)))
}
