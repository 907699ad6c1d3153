// src/db/attachment_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::attachments::{AttachmentFile, AttachmentMeta},
};

#[derive(Clone)]
pub struct AttachmentRepository {
    pool: PgPool,
}

impl AttachmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_attachment<'e, E>(
        &self,
        executor: E,
        site_id: Uuid,
        file_name: &str,
        content_type: &str,
        data: &[u8],
        uploaded_by: Uuid,
    ) -> Result<AttachmentMeta, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let meta = sqlx::query_as::<_, AttachmentMeta>(
            r#"
            INSERT INTO attachments (site_id, file_name, content_type, size_bytes, data, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, site_id, file_name, content_type, size_bytes, uploaded_by, created_at
            "#,
        )
        .bind(site_id)
        .bind(file_name)
        .bind(content_type)
        .bind(data.len() as i64)
        .bind(data)
        .bind(uploaded_by)
        .fetch_one(executor)
        .await?;
        Ok(meta)
    }

    // Só os metadados (para validar a referência da movimentação)
    pub async fn find_meta(
        &self,
        site_id: Uuid,
        id: Uuid,
    ) -> Result<Option<AttachmentMeta>, AppError> {
        let meta = sqlx::query_as::<_, AttachmentMeta>(
            r#"
            SELECT id, site_id, file_name, content_type, size_bytes, uploaded_by, created_at
            FROM attachments
            WHERE site_id = $1 AND id = $2
            "#,
        )
        .bind(site_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(meta)
    }

    // A linha completa, com os bytes, para o download
    pub async fn find_file(
        &self,
        site_id: Uuid,
        id: Uuid,
    ) -> Result<Option<AttachmentFile>, AppError> {
        let file = sqlx::query_as::<_, AttachmentFile>(
            "SELECT * FROM attachments WHERE site_id = $1 AND id = $2",
        )
        .bind(site_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(file)
    }
}
