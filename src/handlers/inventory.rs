// src/handlers/inventory.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Importa os nossos extratores e erros
use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        access::{EditAccess, ManageAccess, RequireSiteAccess}, // Guardiões por nível
        auth::AuthenticatedUser, // O extrator de Utilizador
        i18n::Locale,            // O extrator de Idioma
        site::SiteContext,       // O extrator da Obra (do X-Site-Id)
    },
    models::inventory::StockDirection,
};

// ---
// Validação Customizada
// ---
fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if val <= &Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("A quantidade deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: movimentação (serve para entrada E saída)
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MovementPayload {
    #[validate(required(message = "O campo 'materialId' é obrigatório."))]
    pub material_id: Option<Uuid>,

    #[validate(length(min = 1, message = "O subtipo é obrigatório."))]
    pub variant: String,

    #[validate(custom(function = "validate_positive"))]
    pub quantity: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    pub unit_rate: Option<Decimal>,

    // Fornecedor na entrada, empreiteiro na saída
    #[validate(length(min = 2, message = "Informe o fornecedor/empreiteiro."))]
    pub counterparty: String,

    pub vehicle_number: Option<String>,

    // Nota fiscal ou guia digitalizada, se já foi enviada
    pub attachment_id: Option<Uuid>,

    pub notes: Option<String>,

    // A data escrita na nota de papel (pode faltar)
    pub occurred_on: Option<NaiveDate>,
}

// ---
// Handler: receive_stock (ENTRADA)
// ---
pub async fn receive_stock(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    site: SiteContext,
    _guard: RequireSiteAccess<EditAccess>,
    Json(payload): Json<MovementPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let movement = app_state
        .inventory_service
        .receive_stock(
            site.0,
            payload.material_id.unwrap(),
            payload.variant.trim(),
            payload.quantity,
            payload.unit_rate,
            payload.counterparty.trim(),
            payload.vehicle_number.as_deref(),
            payload.attachment_id,
            payload.notes.as_deref(),
            payload.occurred_on,
            user.0.id,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(movement)))
}

// ---
// Handler: issue_stock (SAÍDA)
// ---
// A saída valida o saldo com a linha travada: sem estoque, sem guia.
pub async fn issue_stock(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    site: SiteContext,
    _guard: RequireSiteAccess<EditAccess>,
    Json(payload): Json<MovementPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let movement = app_state
        .inventory_service
        .issue_stock(
            site.0,
            payload.material_id.unwrap(),
            payload.variant.trim(),
            payload.quantity,
            payload.unit_rate,
            payload.counterparty.trim(),
            payload.vehicle_number.as_deref(),
            payload.attachment_id,
            payload.notes.as_deref(),
            payload.occurred_on,
            user.0.id,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(movement)))
}

// ---
// Handler: list_stock
// ---
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockQuery {
    pub material_id: Option<Uuid>,
}

#[utoipa::path(
    get,
    path = "/api/inventory/stock",
    tag = "Inventory",
    responses(
        (status = 200, description = "Saldos da obra com a flag de estoque baixo", body = Vec<crate::models::inventory::StockLevelView>),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Sem acesso à obra")
    ),
    params(
        ("x-site-id" = Uuid, Header, description = "ID da Obra"),
        ("materialId" = Option<Uuid>, Query, description = "Filtra por material")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_stock(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    site: SiteContext,
    Query(query): Query<StockQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let levels = app_state
        .inventory_service
        .list_stock(site.0, query.material_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(levels)))
}

// ---
// Handler: set_threshold (MANAGE)
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetThresholdPayload {
    #[validate(required(message = "O campo 'materialId' é obrigatório."))]
    pub material_id: Option<Uuid>,

    #[validate(length(min = 1, message = "O subtipo é obrigatório."))]
    pub variant: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub threshold: Decimal,
}

pub async fn set_threshold(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    site: SiteContext,
    _guard: RequireSiteAccess<ManageAccess>,
    Json(payload): Json<SetThresholdPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let level = app_state
        .inventory_service
        .set_threshold(
            site.0,
            payload.material_id.unwrap(),
            payload.variant.trim(),
            payload.threshold,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(level)))
}

// ---
// Handler: list_transactions
// ---
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsQuery {
    pub material_id: Option<Uuid>,
    pub variant: Option<String>,
    pub direction: Option<StockDirection>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
}

pub async fn list_transactions(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    site: SiteContext,
    Query(query): Query<TransactionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let movements = app_state
        .inventory_service
        .list_transactions(
            site.0,
            query.material_id,
            query.variant.as_deref(),
            query.direction,
            query.from,
            query.to,
            query.limit,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(movements)))
}

// ---
// Handler: stock_summary (o resumo de abertura/fechamento)
// ---
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    pub material_id: Uuid,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[utoipa::path(
    get,
    path = "/api/inventory/summary",
    tag = "Inventory",
    responses(
        (status = 200, description = "Abertura/entrada/saída/fechamento por subtipo no período", body = crate::models::inventory::StockSummary),
        (status = 404, description = "Material não encontrado")
    ),
    params(
        ("x-site-id" = Uuid, Header, description = "ID da Obra"),
        ("materialId" = Uuid, Query, description = "O material a resumir"),
        ("from" = Option<NaiveDate>, Query, description = "Início do período (inclusivo)"),
        ("to" = Option<NaiveDate>, Query, description = "Fim do período (inclusivo)")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn stock_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    site: SiteContext,
    Query(query): Query<SummaryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .inventory_service
        .stock_summary(site.0, query.material_id, query.from, query.to)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summary)))
}

// ---
// Handlers: quebras por fornecedor / empreiteiro
// ---
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownQuery {
    pub material_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[utoipa::path(
    get,
    path = "/api/inventory/suppliers",
    tag = "Inventory",
    responses(
        (status = 200, description = "Entradas agrupadas por fornecedor", body = Vec<crate::models::inventory::CounterpartyBreakdownRow>)
    ),
    params(
        ("x-site-id" = Uuid, Header, description = "ID da Obra")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn supplier_breakdown(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    site: SiteContext,
    Query(query): Query<BreakdownQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = app_state
        .inventory_service
        .counterparty_breakdown(
            site.0,
            StockDirection::Inward,
            query.material_id,
            query.from,
            query.to,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(rows)))
}

#[utoipa::path(
    get,
    path = "/api/inventory/contractors",
    tag = "Inventory",
    responses(
        (status = 200, description = "Saídas agrupadas por empreiteiro", body = Vec<crate::models::inventory::CounterpartyBreakdownRow>)
    ),
    params(
        ("x-site-id" = Uuid, Header, description = "ID da Obra")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn contractor_breakdown(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    site: SiteContext,
    Query(query): Query<BreakdownQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = app_state
        .inventory_service
        .counterparty_breakdown(
            site.0,
            StockDirection::Outward,
            query.material_id,
            query.from,
            query.to,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(rows)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_values_fail_validation() {
        assert!(validate_not_negative(&"-1".parse().unwrap()).is_err());
        assert!(validate_not_negative(&Decimal::ZERO).is_ok());
        assert!(validate_not_negative(&"2.5".parse().unwrap()).is_ok());
    }

    #[test]
    fn quantity_must_be_strictly_positive() {
        assert!(validate_positive(&Decimal::ZERO).is_err());
        assert!(validate_positive(&"-3".parse().unwrap()).is_err());
        assert!(validate_positive(&"0.001".parse().unwrap()).is_ok());
    }
}
