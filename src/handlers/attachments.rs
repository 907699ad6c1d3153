// src/handlers/attachments.rs

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        access::{EditAccess, RequireSiteAccess},
        auth::AuthenticatedUser,
        i18n::Locale,
        site::SiteContext,
    },
};

// PDF ou foto da nota; o resto é recusado na porta
const ALLOWED_TYPES: [&str; 4] = [
    "application/pdf",
    "image/jpeg",
    "image/png",
    "image/webp",
];

// POST /api/attachments (multipart, campo "file")
pub async fn upload_attachment(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    site: SiteContext,
    _guard: RequireSiteAccess<EditAccess>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::InvalidUpload(e.to_string()).to_api_error(&locale, &app_state.i18n_store)
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .map(|m| m.to_string())
            .ok_or_else(|| {
                AppError::InvalidUpload("content-type ausente".to_string())
                    .to_api_error(&locale, &app_state.i18n_store)
            })?;

        if !ALLOWED_TYPES.contains(&content_type.as_str()) {
            return Err(AppError::UnsupportedAttachmentType(content_type)
                .to_api_error(&locale, &app_state.i18n_store));
        }

        // O DefaultBodyLimit do router já segura os 10 MiB
        let data = field.bytes().await.map_err(|e| {
            AppError::InvalidUpload(e.to_string()).to_api_error(&locale, &app_state.i18n_store)
        })?;

        if data.is_empty() {
            return Err(AppError::InvalidUpload("arquivo vazio".to_string())
                .to_api_error(&locale, &app_state.i18n_store));
        }

        let meta = app_state
            .attachment_repo
            .insert_attachment(
                &app_state.db_pool,
                site.0,
                &file_name,
                &content_type,
                &data,
                user.0.id,
            )
            .await
            .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

        return Ok((StatusCode::CREATED, Json(meta)));
    }

    Err(AppError::InvalidUpload("campo 'file' ausente".to_string())
        .to_api_error(&locale, &app_state.i18n_store))
}

// GET /api/attachments/{id}
pub async fn download_attachment(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    site: SiteContext,
    Path(attachment_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let file = app_state
        .attachment_repo
        .find_file(site.0, attachment_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?
        .ok_or_else(|| {
            AppError::AttachmentNotFound.to_api_error(&locale, &app_state.i18n_store)
        })?;

    // Configura os Headers para o navegador baixar ou mostrar o arquivo
    let headers = [
        (header::CONTENT_TYPE, file.content_type.clone()),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", file.file_name),
        ),
    ];

    Ok((headers, file.data).into_response())
}
