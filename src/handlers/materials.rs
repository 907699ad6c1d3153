// src/handlers/materials.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        access::{AdminOnly, RequireRole},
        auth::AuthenticatedUser,
        i18n::Locale,
    },
    models::materials::{AddVariantPayload, CreateMaterialPayload},
};

#[utoipa::path(
    get,
    path = "/api/inventory/materials",
    tag = "Materials",
    responses(
        (status = 200, description = "O catálogo: os 5 nativos + os customizados, com subtipos", body = Vec<crate::models::materials::MaterialResponse>)
    ),
    params(
        ("x-site-id" = Uuid, Header, description = "ID da Obra")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_materials(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let catalog = app_state
        .material_service
        .list_catalog()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(catalog)))
}

#[utoipa::path(
    post,
    path = "/api/admin/materials",
    tag = "Materials",
    request_body = CreateMaterialPayload,
    responses(
        (status = 201, description = "Material customizado criado com seus subtipos", body = crate::models::materials::MaterialResponse),
        (status = 409, description = "Nome de material já existe")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_material(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    _guard: RequireRole<AdminOnly>,
    Json(payload): Json<CreateMaterialPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let material = app_state
        .material_service
        .create_material_with_variants(
            payload.name.trim(),
            payload.unit_name.trim(),
            payload.unit_symbol.trim(),
            payload.variants,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(material)))
}

#[utoipa::path(
    post,
    path = "/api/admin/materials/{id}/variants",
    tag = "Materials",
    request_body = AddVariantPayload,
    responses(
        (status = 201, description = "Subtipo adicionado", body = crate::models::materials::MaterialVariant),
        (status = 404, description = "Material não encontrado"),
        (status = 409, description = "Subtipo já existe")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do material")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn add_variant(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    _guard: RequireRole<AdminOnly>,
    Path(material_id): Path<Uuid>,
    Json(payload): Json<AddVariantPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let variant = app_state
        .material_service
        .add_variant(material_id, &payload.name)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(variant)))
}
