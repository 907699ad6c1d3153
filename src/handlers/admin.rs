// src/handlers/admin.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        access::{AdminOnly, RequireRole, SuperAdminOnly},
        auth::AuthenticatedUser,
        i18n::Locale,
    },
    models::auth::{UserRole, UserStatus},
    models::sites::AccessLevel,
};

// ---
// Payloads do painel
// ---

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub status: Option<UserStatus>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusPayload {
    pub status: UserStatus,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRolePayload {
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantAccessPayload {
    pub user_id: Uuid,
    pub site_id: Uuid,
    pub level: AccessLevel,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeAccessPayload {
    pub user_id: Uuid,
    pub site_id: Uuid,
}

// ---
// Contas
// ---

// GET /api/admin/users?status=PENDING
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    _guard: RequireRole<AdminOnly>,
    Query(query): Query<ListUsersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let users = app_state
        .admin_service
        .list_users(query.status)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(users)))
}

// PUT /api/admin/users/{id}/status
// A decisão de aprovação: APPROVED, REJECTED ou SUSPENDED
pub async fn set_user_status(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<AdminOnly>,
    Path(target_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = app_state
        .admin_service
        .set_user_status(&user.0, target_id, payload.status)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(updated)))
}

// PUT /api/admin/users/{id}/role (apenas o super admin)
pub async fn set_user_role(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<SuperAdminOnly>,
    Path(target_id): Path<Uuid>,
    Json(payload): Json<UpdateRolePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = app_state
        .admin_service
        .set_user_role(&user.0, target_id, payload.role)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(updated)))
}

// ---
// Concessões de obra
// ---

// POST /api/admin/access
pub async fn grant_access(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<AdminOnly>,
    Json(payload): Json<GrantAccessPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let access = app_state
        .admin_service
        .grant_site_access(&user.0, payload.user_id, payload.site_id, payload.level)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(access)))
}

// DELETE /api/admin/access (idempotente)
pub async fn revoke_access(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    _guard: RequireRole<AdminOnly>,
    Json(payload): Json<RevokeAccessPayload>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .admin_service
        .revoke_site_access(payload.user_id, payload.site_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/admin/users/{id}/access
pub async fn list_user_access(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    _guard: RequireRole<AdminOnly>,
    Path(target_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let grants = app_state
        .admin_service
        .list_user_access(target_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(grants)))
}
