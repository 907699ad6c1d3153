// src/db/inventory_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{
        CounterpartyBreakdownRow, StockDirection, StockLevel, StockLevelView, StockTransaction,
    },
};

#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Funções de "Leitura" (Getters)
    // ---

    // Saldos da obra, com a flag de alerta calculada direto no SQL
    pub async fn get_stock_levels<'e, E>(
        &self,
        executor: E,
        site_id: Uuid,
        material_id: Option<Uuid>,
    ) -> Result<Vec<StockLevelView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let levels = sqlx::query_as::<_, StockLevelView>(
            r#"
            SELECT sl.id, sl.site_id, sl.material_id,
                   m.name AS material_name, m.unit_symbol,
                   sl.variant, sl.quantity, sl.low_stock_threshold,
                   (sl.low_stock_threshold > 0 AND sl.quantity <= sl.low_stock_threshold) AS low_stock,
                   sl.updated_at
            FROM stock_levels sl
            JOIN materials m ON m.id = sl.material_id
            WHERE sl.site_id = $1
              AND ($2::uuid IS NULL OR sl.material_id = $2)
            ORDER BY m.name ASC, sl.variant ASC
            "#,
        )
        .bind(site_id)
        .bind(material_id)
        .fetch_all(executor)
        .await?;
        Ok(levels)
    }

    /// Trava a linha de saldo para a saída (FOR UPDATE).
    /// Dois lançamentos simultâneos no mesmo subtipo ficam em fila aqui.
    pub async fn get_stock_level_for_update<'e, E>(
        &self,
        executor: E,
        site_id: Uuid,
        material_id: Uuid,
        variant: &str,
    ) -> Result<Option<StockLevel>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let level = sqlx::query_as::<_, StockLevel>(
            r#"
            SELECT * FROM stock_levels
            WHERE site_id = $1 AND material_id = $2 AND variant = $3
            FOR UPDATE
            "#,
        )
        .bind(site_id)
        .bind(material_id)
        .bind(variant)
        .fetch_optional(executor)
        .await?;
        Ok(level)
    }

    // ---
    // Funções de "Escrita" (Transacionais)
    // ---
    // Estas usam o padrão genérico 'Executor' para rodar dentro de uma transação.

    /// Soma `delta` no saldo (cria a linha no primeiro lançamento).
    /// O CHECK (quantity >= 0) do banco é a última linha de defesa.
    pub async fn apply_stock_delta<'e, E>(
        &self,
        executor: E,
        site_id: Uuid,
        material_id: Uuid,
        variant: &str,
        delta: Decimal,
    ) -> Result<StockLevel, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let level = sqlx::query_as::<_, StockLevel>(
            r#"
            INSERT INTO stock_levels (site_id, material_id, variant, quantity)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (site_id, material_id, variant)
            DO UPDATE SET quantity = stock_levels.quantity + EXCLUDED.quantity,
                          updated_at = now()
            RETURNING *
            "#,
        )
        .bind(site_id)
        .bind(material_id)
        .bind(variant)
        .bind(delta)
        .fetch_one(executor)
        .await?;
        Ok(level)
    }

    pub async fn set_threshold<'e, E>(
        &self,
        executor: E,
        site_id: Uuid,
        material_id: Uuid,
        variant: &str,
        threshold: Decimal,
    ) -> Result<StockLevel, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let level = sqlx::query_as::<_, StockLevel>(
            r#"
            INSERT INTO stock_levels (site_id, material_id, variant, quantity, low_stock_threshold)
            VALUES ($1, $2, $3, 0, $4)
            ON CONFLICT (site_id, material_id, variant)
            DO UPDATE SET low_stock_threshold = EXCLUDED.low_stock_threshold,
                          updated_at = now()
            RETURNING *
            "#,
        )
        .bind(site_id)
        .bind(material_id)
        .bind(variant)
        .bind(threshold)
        .fetch_one(executor)
        .await?;
        Ok(level)
    }

    /// Grava uma linha do diário. Ninguém edita nem apaga depois.
    #[allow(clippy::too_many_arguments)]
    pub async fn record_transaction<'e, E>(
        &self,
        executor: E,
        site_id: Uuid,
        material_id: Uuid,
        variant: &str,
        direction: StockDirection,
        quantity: Decimal,
        unit_rate: Option<Decimal>,
        counterparty: &str,
        vehicle_number: Option<&str>,
        attachment_id: Option<Uuid>,
        notes: Option<&str>,
        occurred_on: Option<NaiveDate>,
        created_by: Uuid,
    ) -> Result<StockTransaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tx = sqlx::query_as::<_, StockTransaction>(
            r#"
            INSERT INTO stock_transactions
                (site_id, material_id, variant, direction, quantity, unit_rate,
                 counterparty, vehicle_number, attachment_id, notes, occurred_on, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(site_id)
        .bind(material_id)
        .bind(variant)
        .bind(direction)
        .bind(quantity)
        .bind(unit_rate)
        .bind(counterparty)
        .bind(vehicle_number)
        .bind(attachment_id)
        .bind(notes)
        .bind(occurred_on)
        .bind(created_by)
        .fetch_one(executor)
        .await?;
        Ok(tx)
    }

    // ---
    // Diário e agregações
    // ---

    pub async fn find_transaction(
        &self,
        site_id: Uuid,
        id: Uuid,
    ) -> Result<Option<StockTransaction>, AppError> {
        let tx = sqlx::query_as::<_, StockTransaction>(
            "SELECT * FROM stock_transactions WHERE site_id = $1 AND id = $2",
        )
        .bind(site_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(tx)
    }

    // Movimentação sem data na nota (occurred_on NULL) entra em
    // qualquer período filtrado
    #[allow(clippy::too_many_arguments)]
    pub async fn list_transactions(
        &self,
        site_id: Uuid,
        material_id: Option<Uuid>,
        variant: Option<&str>,
        direction: Option<StockDirection>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        limit: i64,
    ) -> Result<Vec<StockTransaction>, AppError> {
        let txs = sqlx::query_as::<_, StockTransaction>(
            r#"
            SELECT * FROM stock_transactions
            WHERE site_id = $1
              AND ($2::uuid IS NULL OR material_id = $2)
              AND ($3::text IS NULL OR variant = $3)
              AND ($4::stock_direction IS NULL OR direction = $4)
              AND ($5::date IS NULL OR occurred_on IS NULL OR occurred_on >= $5)
              AND ($6::date IS NULL OR occurred_on IS NULL OR occurred_on <= $6)
            ORDER BY created_at DESC
            LIMIT $7
            "#,
        )
        .bind(site_id)
        .bind(material_id)
        .bind(variant)
        .bind(direction)
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(txs)
    }

    /// O diário completo de um material na obra (insumo do reducer de resumo;
    /// o filtro de período é aplicado em memória, junto com a regra do NULL).
    pub async fn list_material_movements<'e, E>(
        &self,
        executor: E,
        site_id: Uuid,
        material_id: Uuid,
    ) -> Result<Vec<StockTransaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let txs = sqlx::query_as::<_, StockTransaction>(
            r#"
            SELECT * FROM stock_transactions
            WHERE site_id = $1 AND material_id = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(site_id)
        .bind(material_id)
        .fetch_all(executor)
        .await?;
        Ok(txs)
    }

    // Quebra por fornecedor (INWARD) ou empreiteiro (OUTWARD)
    pub async fn counterparty_breakdown(
        &self,
        site_id: Uuid,
        direction: StockDirection,
        material_id: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<CounterpartyBreakdownRow>, AppError> {
        let rows = sqlx::query_as::<_, CounterpartyBreakdownRow>(
            r#"
            SELECT counterparty,
                   COALESCE(SUM(quantity), 0) AS total_quantity,
                   COUNT(*) AS transaction_count,
                   MAX(COALESCE(occurred_on, created_at::date)) AS last_movement
            FROM stock_transactions
            WHERE site_id = $1
              AND direction = $2
              AND ($3::uuid IS NULL OR material_id = $3)
              AND ($4::date IS NULL OR occurred_on IS NULL OR occurred_on >= $4)
              AND ($5::date IS NULL OR occurred_on IS NULL OR occurred_on <= $5)
            GROUP BY counterparty
            ORDER BY total_quantity DESC
            "#,
        )
        .bind(site_id)
        .bind(direction)
        .bind(material_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
