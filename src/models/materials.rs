// src/models/materials.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// O que sai do banco (Tabela materials)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "Steel")]
    pub name: String,

    #[schema(example = "kilogram")]
    pub unit_name: String,

    #[schema(example = "kg")]
    pub unit_symbol: String,

    // Os 5 materiais nativos não podem ser removidos
    pub is_builtin: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// O que sai do banco (Tabela material_variants)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialVariant {
    pub id: Uuid,

    #[schema(ignore)]
    pub material_id: Uuid,

    #[schema(example = "12mm")]
    pub name: String,

    pub created_at: DateTime<Utc>,
}

// Resposta completa (Material + lista de subtipos)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialResponse {
    #[serde(flatten)]
    pub material: Material,

    #[schema(example = json!(["8mm", "10mm", "12mm"]))]
    pub variants: Vec<String>,
}

// O Payload para criar um material customizado
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaterialPayload {
    #[validate(length(min = 2, message = "O nome do material é obrigatório."))]
    #[schema(example = "Bricks")]
    pub name: String,

    #[validate(length(min = 1, message = "A unidade é obrigatória."))]
    #[schema(example = "piece")]
    pub unit_name: String,

    #[validate(length(min = 1, max = 8, message = "O símbolo da unidade é obrigatório."))]
    #[schema(example = "pc")]
    pub unit_symbol: String,

    // Pelo menos um subtipo; material sem variação cadastra um único
    #[validate(length(min = 1, message = "Informe ao menos um subtipo."))]
    #[schema(example = json!(["Red Clay", "Fly Ash"]))]
    pub variants: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddVariantPayload {
    #[validate(length(min = 1, message = "O nome do subtipo é obrigatório."))]
    pub name: String,
}
