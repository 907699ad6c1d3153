// src/services/site_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::SiteRepository,
    models::auth::{User, UserRole},
    models::sites::{AccessLevel, Site},
};

#[derive(Clone)]
pub struct SiteService {
    site_repo: SiteRepository,
    pool: PgPool, // Usamos a pool para iniciar transações
}

impl SiteService {
    pub fn new(site_repo: SiteRepository, pool: PgPool) -> Self {
        Self { site_repo, pool }
    }

    /// LÓGICA DE NEGÓCIO: Cria a obra e, atomicamente, concede MANAGE a quem
    /// criou. Admin já enxerga tudo, mas a concessão deixa a trilha registrada
    /// mesmo que o criador deixe de ser admin um dia.
    pub async fn create_site_with_manager(
        &self,
        name: &str,
        code: &str,
        address: Option<&str>,
        creator: &User,
    ) -> Result<Site, AppError> {
        // 1. Inicia a transação
        let mut tx = self.pool.begin().await?;

        // 2. Cria a obra
        let new_site = self.site_repo
            .create_site(&mut *tx, name, code, address, creator.id)
            .await?;

        // 3. Concede MANAGE ao criador
        self.site_repo
            .upsert_access(&mut *tx, creator.id, new_site.id, AccessLevel::Manage, creator.id)
            .await?;

        // 4. Commit
        tx.commit().await?;

        tracing::info!("🏗️ Obra criada: {} ({})", new_site.name, new_site.code);

        Ok(new_site)
    }

    /// Admins veem o diretório inteiro; os demais, só as concessões.
    pub async fn list_sites_for(&self, user: &User) -> Result<Vec<Site>, AppError> {
        match user.role {
            UserRole::Admin | UserRole::SuperAdmin => self.site_repo.list_all_sites().await,
            UserRole::User => self.site_repo.list_sites_for_user(user.id).await,
        }
    }

    pub async fn get_site(&self, site_id: Uuid) -> Result<Site, AppError> {
        self.site_repo
            .find_site_by_id(site_id)
            .await?
            .ok_or(AppError::SiteNotFound)
    }
}
