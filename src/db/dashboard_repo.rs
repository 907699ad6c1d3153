// src/db/dashboard_repo.rs

use sqlx::{Acquire, Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::dashboard::{MaterialTotalRow, MovementChartEntry, TopSupplierEntry},
    models::inventory::StockLevelView,
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 1. Totais por material + alertas + contagem do dia
    pub async fn get_summary_rows<'e, E>(
        &self,
        executor: E,
        site_id: Uuid,
    ) -> Result<(Vec<MaterialTotalRow>, Vec<StockLevelView>, i64), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        // Transação para um snapshot consistente das três leituras
        let mut tx = executor.begin().await?;

        let totals = sqlx::query_as::<_, MaterialTotalRow>(
            r#"
            SELECT m.id AS material_id, m.name AS material_name, m.unit_symbol,
                   COALESCE(SUM(sl.quantity), 0) AS total_quantity,
                   COUNT(*) AS variant_count
            FROM stock_levels sl
            JOIN materials m ON m.id = sl.material_id
            WHERE sl.site_id = $1
            GROUP BY m.id, m.name, m.unit_symbol
            ORDER BY m.name ASC
            "#,
        )
        .bind(site_id)
        .fetch_all(&mut *tx)
        .await?;

        let low_stock = sqlx::query_as::<_, StockLevelView>(
            r#"
            SELECT sl.id, sl.site_id, sl.material_id,
                   m.name AS material_name, m.unit_symbol,
                   sl.variant, sl.quantity, sl.low_stock_threshold,
                   true AS low_stock,
                   sl.updated_at
            FROM stock_levels sl
            JOIN materials m ON m.id = sl.material_id
            WHERE sl.site_id = $1
              AND sl.low_stock_threshold > 0
              AND sl.quantity <= sl.low_stock_threshold
            ORDER BY m.name ASC, sl.variant ASC
            "#,
        )
        .bind(site_id)
        .fetch_all(&mut *tx)
        .await?;

        let transactions_today = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM stock_transactions
            WHERE site_id = $1 AND created_at::date = CURRENT_DATE
            "#,
        )
        .bind(site_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((totals, low_stock, transactions_today))
    }

    // 2. Gráfico de movimentação (entradas x saídas por dia)
    pub async fn get_movement_chart<'e, E>(
        &self,
        executor: E,
        site_id: Uuid,
        material_id: Uuid,
        days: i32,
    ) -> Result<Vec<MovementChartEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let data = sqlx::query_as::<_, MovementChartEntry>(
            r#"
            SELECT
                to_char(created_at, 'YYYY-MM-DD') AS date,
                COALESCE(SUM(quantity) FILTER (WHERE direction = 'INWARD'), 0) AS inward,
                COALESCE(SUM(quantity) FILTER (WHERE direction = 'OUTWARD'), 0) AS outward
            FROM stock_transactions
            WHERE site_id = $1
              AND material_id = $2
              AND created_at >= (CURRENT_DATE - make_interval(days => $3))
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
        .bind(site_id)
        .bind(material_id)
        .bind(days)
        .fetch_all(executor)
        .await?;
        Ok(data)
    }

    // 3. Ranking dos fornecedores que mais entregaram
    pub async fn get_top_suppliers<'e, E>(
        &self,
        executor: E,
        site_id: Uuid,
        limit: i64,
    ) -> Result<Vec<TopSupplierEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let data = sqlx::query_as::<_, TopSupplierEntry>(
            r#"
            SELECT counterparty,
                   COALESCE(SUM(quantity), 0) AS total_quantity,
                   COUNT(*) AS deliveries
            FROM stock_transactions
            WHERE site_id = $1 AND direction = 'INWARD'
            GROUP BY counterparty
            ORDER BY total_quantity DESC
            LIMIT $2
            "#,
        )
        .bind(site_id)
        .bind(limit)
        .fetch_all(executor)
        .await?;
        Ok(data)
    }
}
