// src/services/party_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PartyRepository,
    models::parties::{Party, PartyKind},
};

#[derive(Clone)]
pub struct PartyService {
    party_repo: PartyRepository,
    pool: PgPool,
}

impl PartyService {
    pub fn new(party_repo: PartyRepository, pool: PgPool) -> Self {
        Self { party_repo, pool }
    }

    pub async fn create_party(
        &self,
        site_id: Uuid,
        kind: PartyKind,
        name: &str,
        phone: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Party, AppError> {
        self.party_repo
            .create_party(&self.pool, site_id, kind, name.trim(), phone, notes)
            .await
    }

    pub async fn list_parties(
        &self,
        site_id: Uuid,
        kind: Option<PartyKind>,
    ) -> Result<Vec<Party>, AppError> {
        self.party_repo.list_parties(site_id, kind).await
    }
}
