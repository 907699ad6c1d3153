// src/services/material_service.rs

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::MaterialRepository,
    models::materials::{MaterialResponse, MaterialVariant},
};

#[derive(Clone)]
pub struct MaterialService {
    material_repo: MaterialRepository,
    pool: PgPool,
}

impl MaterialService {
    pub fn new(material_repo: MaterialRepository, pool: PgPool) -> Self {
        Self { material_repo, pool }
    }

    /// O catálogo inteiro (definição + subtipos), montado em memória
    /// com duas consultas em vez de N+1.
    pub async fn list_catalog(&self) -> Result<Vec<MaterialResponse>, AppError> {
        let materials = self.material_repo.list_materials().await?;
        let variants = self.material_repo.list_all_variants().await?;

        let mut by_material: HashMap<Uuid, Vec<String>> = HashMap::new();
        for v in variants {
            by_material.entry(v.material_id).or_default().push(v.name);
        }

        Ok(materials
            .into_iter()
            .map(|m| {
                let variants = by_material.remove(&m.id).unwrap_or_default();
                MaterialResponse { material: m, variants }
            })
            .collect())
    }

    pub async fn create_material_with_variants(
        &self,
        name: &str,
        unit_name: &str,
        unit_symbol: &str,
        variant_names: Vec<String>,
    ) -> Result<MaterialResponse, AppError> {
        // 1. Inicia Transação
        let mut tx = self.pool.begin().await?;

        // 2. Cria a definição
        let material = self.material_repo
            .create_material(&mut *tx, name, unit_name, unit_symbol)
            .await?;

        // 3. Cria cada subtipo (nomes repetidos caem na unique do banco)
        let mut created: Vec<String> = Vec::with_capacity(variant_names.len());
        for variant in &variant_names {
            let trimmed = variant.trim();
            if trimmed.is_empty() {
                continue;
            }
            let row = self.material_repo
                .create_variant(&mut *tx, material.id, trimmed)
                .await?;
            created.push(row.name);
        }

        // 4. Commit
        tx.commit().await?;

        tracing::info!("🧱 Material customizado criado: {}", material.name);

        Ok(MaterialResponse { material, variants: created })
    }

    pub async fn add_variant(
        &self,
        material_id: Uuid,
        name: &str,
    ) -> Result<MaterialVariant, AppError> {
        // O material precisa existir antes do subtipo
        self.material_repo
            .find_material_by_id(material_id)
            .await?
            .ok_or(AppError::MaterialNotFound)?;

        self.material_repo
            .create_variant(&self.pool, material_id, name.trim())
            .await
    }
}
