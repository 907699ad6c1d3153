// src/models/parties.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "party_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartyKind {
    Supplier,   // Entrega material na obra
    Contractor, // Retira material da obra
}

// Cadastro por obra; a movimentação grava só o nome (texto livre)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub id: Uuid,
    pub site_id: Uuid,
    pub kind: PartyKind,
    pub name: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartyPayload {
    pub kind: PartyKind,

    #[validate(length(min = 2, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(length(min = 8, max = 20, message = "O telefone fornecido é inválido."))]
    pub phone: Option<String>,

    pub notes: Option<String>,
}
