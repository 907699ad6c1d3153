// src/models/attachments.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

// Metadados do anexo: é isso que sai no JSON (nunca os bytes)
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentMeta {
    pub id: Uuid,
    pub site_id: Uuid,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

// A linha completa, só para o download
#[derive(Debug, Clone, FromRow)]
pub struct AttachmentFile {
    pub id: Uuid,
    pub site_id: Uuid,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub data: Vec<u8>,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}
