// src/models/inventory.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// ---
// 1. Direção da movimentação
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "stock_direction", rename_all = "SCREAMING_SNAKE_CASE")] // Banco
#[serde(rename_all = "SCREAMING_SNAKE_CASE")] // JSON
pub enum StockDirection {
    Inward,  // Vira "INWARD" (entrega de fornecedor)
    Outward, // Vira "OUTWARD" (retirada por empreiteiro)
}

// ---
// 2. Saldo atual (Tabela stock_levels)
// ---
// Uma linha por (obra, material, subtipo). É o "closing balance" vivo.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    pub id: Uuid,
    pub site_id: Uuid,
    pub material_id: Uuid,
    pub variant: String,
    pub quantity: Decimal,
    pub low_stock_threshold: Decimal,
    pub updated_at: DateTime<Utc>,
}

// Saldo com os dados do material e a flag de alerta (calculada no SQL)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockLevelView {
    pub id: Uuid,
    #[schema(ignore)]
    pub site_id: Uuid,
    pub material_id: Uuid,
    pub material_name: String,
    pub unit_symbol: String,
    pub variant: String,
    pub quantity: Decimal,
    pub low_stock_threshold: Decimal,
    pub low_stock: bool,
    pub updated_at: DateTime<Utc>,
}

// ---
// 3. Movimentações (Histórico append-only)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockTransaction {
    pub id: Uuid,
    pub site_id: Uuid,
    pub material_id: Uuid,
    pub variant: String,
    pub direction: StockDirection,
    pub quantity: Decimal,
    pub unit_rate: Option<Decimal>,

    // Fornecedor (entrada) ou empreiteiro (saída)
    pub counterparty: String,
    pub vehicle_number: Option<String>,
    pub attachment_id: Option<Uuid>,
    pub notes: Option<String>,

    // Data escrita na nota de papel; quando falta, a movimentação
    // conta como "dentro do período" em qualquer filtro de datas
    pub occurred_on: Option<NaiveDate>,

    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

// ---
// 4. Resumo de estoque (o reducer de abertura/fechamento)
// ---
// closing = saldo atual; opening é reconstruído andando o diário para trás
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariantSummary {
    #[schema(example = "12mm")]
    pub variant: String,
    pub opening: Decimal,
    pub incoming: Decimal,
    pub outgoing: Decimal,
    pub closing: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub material_id: Uuid,
    #[schema(example = "Steel")]
    pub material_name: String,
    #[schema(example = "kg")]
    pub unit_symbol: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub rows: Vec<VariantSummary>,
}

// ---
// 5. Quebra por fornecedor / empreiteiro
// ---
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CounterpartyBreakdownRow {
    #[schema(example = "Shree Traders")]
    pub counterparty: String,
    pub total_quantity: Decimal,
    pub transaction_count: i64,
    pub last_movement: Option<NaiveDate>,
}
