// src/db/party_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::parties::{Party, PartyKind},
};

#[derive(Clone)]
pub struct PartyRepository {
    pool: PgPool,
}

impl PartyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_party<'e, E>(
        &self,
        executor: E,
        site_id: Uuid,
        kind: PartyKind,
        name: &str,
        phone: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Party, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Party>(
            r#"
            INSERT INTO parties (site_id, kind, name, phone, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(site_id)
        .bind(kind)
        .bind(name)
        .bind(phone)
        .bind(notes)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::PartyNameAlreadyExists(name.to_string());
                }
            }
            e.into()
        })
    }

    pub async fn list_parties(
        &self,
        site_id: Uuid,
        kind: Option<PartyKind>,
    ) -> Result<Vec<Party>, AppError> {
        let parties = sqlx::query_as::<_, Party>(
            r#"
            SELECT * FROM parties
            WHERE site_id = $1
              AND ($2::party_kind IS NULL OR kind = $2)
            ORDER BY name ASC
            "#,
        )
        .bind(site_id)
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;
        Ok(parties)
    }
}
