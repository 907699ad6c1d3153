// src/models/sites.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

// ---
// 1. Site (A "Obra")
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "site_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SiteStatus {
    Active,
    Closed,
}

// O canteiro de obras: a unidade de escopo de todo o estoque
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub address: Option<String>,
    pub status: SiteStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 2. SiteAccess (A "Ponte" Usuário-Obra)
// ---
// VIEW lê, EDIT movimenta estoque, MANAGE ajusta limites e cadastros
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "site_access_level", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessLevel {
    View,
    Edit,
    Manage,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SiteAccess {
    pub user_id: Uuid,
    pub site_id: Uuid,
    pub level: AccessLevel,
    pub granted_by: Uuid,
    pub created_at: DateTime<Utc>,
}

// Concessão com os dados da obra (para a tela do admin)
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SiteAccessView {
    pub site_id: Uuid,
    pub site_name: String,
    pub site_code: String,
    pub level: AccessLevel,
    pub created_at: DateTime<Utc>,
}

// ---
// 3. Payloads
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSitePayload {
    #[validate(length(min = 3, message = "O nome da obra deve ter no mínimo 3 caracteres."))]
    pub name: String,

    // Código curto único (ex: "OBR-012"), usado nos relatórios
    #[validate(length(min = 2, max = 16, message = "O código deve ter entre 2 e 16 caracteres."))]
    pub code: String,

    pub address: Option<String>,
}
