// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::inventory::StockLevelView;

// Total por material (somando todos os subtipos)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialTotalRow {
    pub material_id: Uuid,
    #[schema(example = "Cement")]
    pub material_name: String,
    #[schema(example = "bag")]
    pub unit_symbol: String,
    pub total_quantity: Decimal,
    pub variant_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub totals: Vec<MaterialTotalRow>,
    pub low_stock: Vec<StockLevelView>,
    pub transactions_today: i64,
}

// Um dia do gráfico de movimentação (entradas x saídas)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementChartEntry {
    #[schema(example = "2025-06-14")]
    pub date: String,
    pub inward: Decimal,
    pub outward: Decimal,
}

// Ranking de fornecedores por volume entregue
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopSupplierEntry {
    #[schema(example = "Shree Traders")]
    pub counterparty: String,
    pub total_quantity: Decimal,
    pub deliveries: i64,
}
