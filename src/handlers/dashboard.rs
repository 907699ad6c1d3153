// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, site::SiteContext},
};

#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Totais por material, alertas de estoque baixo e movimentações do dia", body = crate::models::dashboard::DashboardSummary),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Sem acesso à obra")
    ),
    params(
        ("x-site-id" = Uuid, Header, description = "ID da Obra")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    site: SiteContext,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .dashboard_service
        .get_summary(site.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summary)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementChartQuery {
    pub material_id: Uuid,
    pub days: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/dashboard/movement-chart",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Entradas x saídas por dia (padrão: últimos 30 dias)", body = Vec<crate::models::dashboard::MovementChartEntry>)
    ),
    params(
        ("x-site-id" = Uuid, Header, description = "ID da Obra"),
        ("materialId" = Uuid, Query, description = "O material do gráfico"),
        ("days" = Option<i32>, Query, description = "Janela em dias (1 a 365)")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_movement_chart(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    site: SiteContext,
    Query(query): Query<MovementChartQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = app_state
        .dashboard_service
        .get_movement_chart(site.0, query.material_id, query.days)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(entries)))
}

#[derive(Debug, Deserialize)]
pub struct TopSuppliersQuery {
    pub limit: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/dashboard/top-suppliers",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Ranking dos fornecedores por volume entregue", body = Vec<crate::models::dashboard::TopSupplierEntry>)
    ),
    params(
        ("x-site-id" = Uuid, Header, description = "ID da Obra")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_top_suppliers(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    site: SiteContext,
    Query(query): Query<TopSuppliersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let ranking = app_state
        .dashboard_service
        .get_top_suppliers(site.0, query.limit)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(ranking)))
}
