// src/db/material_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::materials::{Material, MaterialVariant},
};

#[derive(Clone)]
pub struct MaterialRepository {
    pool: PgPool,
}

impl MaterialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    pub async fn list_materials(&self) -> Result<Vec<Material>, AppError> {
        let materials =
            sqlx::query_as::<_, Material>("SELECT * FROM materials ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(materials)
    }

    pub async fn find_material_by_id(&self, id: Uuid) -> Result<Option<Material>, AppError> {
        let material = sqlx::query_as::<_, Material>("SELECT * FROM materials WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(material)
    }

    // Todos os subtipos de uma vez (montamos as respostas em memória)
    pub async fn list_all_variants(&self) -> Result<Vec<MaterialVariant>, AppError> {
        let variants = sqlx::query_as::<_, MaterialVariant>(
            "SELECT * FROM material_variants ORDER BY material_id, name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(variants)
    }

    pub async fn list_variants_for(
        &self,
        material_id: Uuid,
    ) -> Result<Vec<MaterialVariant>, AppError> {
        let variants = sqlx::query_as::<_, MaterialVariant>(
            "SELECT * FROM material_variants WHERE material_id = $1 ORDER BY name ASC",
        )
        .bind(material_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(variants)
    }

    /// O subtipo pertence à lista do material? Toda movimentação valida isso.
    pub async fn variant_exists<'e, E>(
        &self,
        executor: E,
        material_id: Uuid,
        name: &str,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM material_variants WHERE material_id = $1 AND name = $2)",
        )
        .bind(material_id)
        .bind(name)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }

    // ---
    // Escrita (Transacional)
    // ---

    pub async fn create_material<'e, E>(
        &self,
        executor: E,
        name: &str,
        unit_name: &str,
        unit_symbol: &str,
    ) -> Result<Material, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Material>(
            r#"
            INSERT INTO materials (name, unit_name, unit_symbol, is_builtin)
            VALUES ($1, $2, $3, false)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(unit_name)
        .bind(unit_symbol)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::MaterialNameAlreadyExists(name.to_string());
                }
            }
            e.into()
        })
    }

    pub async fn create_variant<'e, E>(
        &self,
        executor: E,
        material_id: Uuid,
        name: &str,
    ) -> Result<MaterialVariant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, MaterialVariant>(
            r#"
            INSERT INTO material_variants (material_id, name)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(material_id)
        .bind(name)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::VariantAlreadyExists(name.to_string());
                }
            }
            e.into()
        })
    }
}
