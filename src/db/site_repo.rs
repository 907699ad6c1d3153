// src/db/site_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::sites::{AccessLevel, Site, SiteAccess, SiteAccessView},
};

#[derive(Clone)]
pub struct SiteRepository {
    pool: PgPool,
}

impl SiteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Obras
    // ---

    pub async fn create_site<'e, E>(
        &self,
        executor: E,
        name: &str,
        code: &str,
        address: Option<&str>,
        created_by: Uuid,
    ) -> Result<Site, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Site>(
            r#"
            INSERT INTO sites (name, code, address, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(code)
        .bind(address)
        .bind(created_by)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::SiteCodeAlreadyExists(code.to_string());
                }
            }
            e.into()
        })
    }

    pub async fn find_site_by_id(&self, id: Uuid) -> Result<Option<Site>, AppError> {
        let site = sqlx::query_as::<_, Site>("SELECT * FROM sites WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(site)
    }

    // Admins enxergam o diretório completo
    pub async fn list_all_sites(&self) -> Result<Vec<Site>, AppError> {
        let sites = sqlx::query_as::<_, Site>("SELECT * FROM sites ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(sites)
    }

    // Os demais, só as obras em que têm concessão
    pub async fn list_sites_for_user(&self, user_id: Uuid) -> Result<Vec<Site>, AppError> {
        let sites = sqlx::query_as::<_, Site>(
            r#"
            SELECT s.*
            FROM sites s
            JOIN site_access a ON a.site_id = s.id
            WHERE a.user_id = $1
            ORDER BY s.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(sites)
    }

    // ---
    // Concessões
    // ---

    pub async fn find_access_level(
        &self,
        user_id: Uuid,
        site_id: Uuid,
    ) -> Result<Option<AccessLevel>, AppError> {
        let level = sqlx::query_scalar::<_, AccessLevel>(
            "SELECT level FROM site_access WHERE user_id = $1 AND site_id = $2",
        )
        .bind(user_id)
        .bind(site_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(level)
    }

    /// No máximo uma concessão por (usuário, obra): re-conceder sobrescreve.
    pub async fn upsert_access<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        site_id: Uuid,
        level: AccessLevel,
        granted_by: Uuid,
    ) -> Result<SiteAccess, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let access = sqlx::query_as::<_, SiteAccess>(
            r#"
            INSERT INTO site_access (user_id, site_id, level, granted_by)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, site_id)
            DO UPDATE SET level = EXCLUDED.level, granted_by = EXCLUDED.granted_by
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(site_id)
        .bind(level)
        .bind(granted_by)
        .fetch_one(executor)
        .await?;
        Ok(access)
    }

    pub async fn revoke_access<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        site_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM site_access WHERE user_id = $1 AND site_id = $2")
            .bind(user_id)
            .bind(site_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_access_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<SiteAccessView>, AppError> {
        let rows = sqlx::query_as::<_, SiteAccessView>(
            r#"
            SELECT a.site_id, s.name AS site_name, s.code AS site_code,
                   a.level, a.created_at
            FROM site_access a
            JOIN sites s ON s.id = a.site_id
            WHERE a.user_id = $1
            ORDER BY s.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
