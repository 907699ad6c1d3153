// src/services/dashboard_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DashboardRepository, MaterialRepository},
    models::dashboard::{DashboardSummary, MovementChartEntry, TopSupplierEntry},
};

#[derive(Clone)]
pub struct DashboardService {
    dashboard_repo: DashboardRepository,
    material_repo: MaterialRepository,
    pool: PgPool,
}

impl DashboardService {
    pub fn new(
        dashboard_repo: DashboardRepository,
        material_repo: MaterialRepository,
        pool: PgPool,
    ) -> Self {
        Self { dashboard_repo, material_repo, pool }
    }

    pub async fn get_summary(&self, site_id: Uuid) -> Result<DashboardSummary, AppError> {
        let (totals, low_stock, transactions_today) = self.dashboard_repo
            .get_summary_rows(&self.pool, site_id)
            .await?;

        Ok(DashboardSummary { totals, low_stock, transactions_today })
    }

    pub async fn get_movement_chart(
        &self,
        site_id: Uuid,
        material_id: Uuid,
        days: Option<i32>,
    ) -> Result<Vec<MovementChartEntry>, AppError> {
        self.material_repo
            .find_material_by_id(material_id)
            .await?
            .ok_or(AppError::MaterialNotFound)?;

        let days = days.unwrap_or(30).clamp(1, 365);

        self.dashboard_repo
            .get_movement_chart(&self.pool, site_id, material_id, days)
            .await
    }

    pub async fn get_top_suppliers(
        &self,
        site_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<TopSupplierEntry>, AppError> {
        let limit = limit.unwrap_or(5).clamp(1, 50);

        self.dashboard_repo
            .get_top_suppliers(&self.pool, site_id, limit)
            .await
    }
}
