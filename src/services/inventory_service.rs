// src/services/inventory_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AttachmentRepository, InventoryRepository, MaterialRepository},
    models::inventory::{
        CounterpartyBreakdownRow, StockDirection, StockLevelView, StockSummary, StockTransaction,
        VariantSummary,
    },
};

// ---
// O reducer de resumo (abertura/fechamento)
// ---

/// Movimentação sem data na nota conta como "dentro do período"
/// em qualquer filtro.
pub(crate) fn in_range(
    occurred_on: Option<NaiveDate>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> bool {
    match occurred_on {
        None => true,
        Some(d) => from.map_or(true, |f| d >= f) && to.map_or(true, |t| d <= t),
    }
}

/// Reconstrói abertura/entrada/saída/fechamento por subtipo.
///
/// closing  = saldo atual da linha de estoque
/// incoming = Σ entradas no período
/// outgoing = Σ saídas no período
/// opening  = max(0, closing - incoming + outgoing)
pub(crate) fn summarize_variants(
    levels: &[StockLevelView],
    movements: &[StockTransaction],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<VariantSummary> {
    let mut closings: BTreeMap<&str, Decimal> = BTreeMap::new();
    for level in levels {
        closings.insert(level.variant.as_str(), level.quantity);
    }

    // (entradas, saídas) dentro do período, por subtipo
    let mut flows: BTreeMap<&str, (Decimal, Decimal)> = BTreeMap::new();
    for tx in movements {
        if !in_range(tx.occurred_on, from, to) {
            continue;
        }
        let entry = flows.entry(tx.variant.as_str()).or_insert((Decimal::ZERO, Decimal::ZERO));
        match tx.direction {
            StockDirection::Inward => entry.0 += tx.quantity,
            StockDirection::Outward => entry.1 += tx.quantity,
        }
    }

    // A união: subtipo que só aparece no diário também entra no resumo
    let mut variants: BTreeSet<&str> = closings.keys().copied().collect();
    variants.extend(flows.keys().copied());

    variants
        .into_iter()
        .map(|variant| {
            let closing = closings.get(variant).copied().unwrap_or(Decimal::ZERO);
            let (incoming, outgoing) =
                flows.get(variant).copied().unwrap_or((Decimal::ZERO, Decimal::ZERO));
            let opening = (closing - incoming + outgoing).max(Decimal::ZERO);
            VariantSummary {
                variant: variant.to_string(),
                opening,
                incoming,
                outgoing,
                closing,
            }
        })
        .collect()
}

#[derive(Clone)]
pub struct InventoryService {
    inventory_repo: InventoryRepository,
    material_repo: MaterialRepository,
    attachment_repo: AttachmentRepository,
    pool: PgPool,
}

impl InventoryService {
    pub fn new(
        inventory_repo: InventoryRepository,
        material_repo: MaterialRepository,
        attachment_repo: AttachmentRepository,
        pool: PgPool,
    ) -> Self {
        Self { inventory_repo, material_repo, attachment_repo, pool }
    }

    // O subtipo precisa pertencer à lista do material, e o anexo
    // (se veio) precisa ser desta obra
    async fn check_movement_refs(
        &self,
        site_id: Uuid,
        material_id: Uuid,
        variant: &str,
        attachment_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        self.material_repo
            .find_material_by_id(material_id)
            .await?
            .ok_or(AppError::MaterialNotFound)?;

        if !self.material_repo.variant_exists(&self.pool, material_id, variant).await? {
            return Err(AppError::VariantUnknown(variant.to_string()));
        }

        if let Some(att_id) = attachment_id {
            self.attachment_repo
                .find_meta(site_id, att_id)
                .await?
                .ok_or(AppError::AttachmentNotFound)?;
        }

        Ok(())
    }

    // --- ENTRADA (entrega de fornecedor) ---
    #[allow(clippy::too_many_arguments)]
    pub async fn receive_stock(
        &self,
        site_id: Uuid,
        material_id: Uuid,
        variant: &str,
        quantity: Decimal,
        unit_rate: Option<Decimal>,
        supplier: &str,
        vehicle_number: Option<&str>,
        attachment_id: Option<Uuid>,
        notes: Option<&str>,
        occurred_on: Option<NaiveDate>,
        created_by: Uuid,
    ) -> Result<StockTransaction, AppError> {
        self.check_movement_refs(site_id, material_id, variant, attachment_id).await?;

        let mut tx = self.pool.begin().await?;

        // 1. Credita o saldo (cria a linha no primeiro lançamento)
        self.inventory_repo
            .apply_stock_delta(&mut *tx, site_id, material_id, variant, quantity)
            .await?;

        // 2. Grava o diário
        let movement = self.inventory_repo
            .record_transaction(
                &mut *tx,
                site_id,
                material_id,
                variant,
                StockDirection::Inward,
                quantity,
                unit_rate,
                supplier,
                vehicle_number,
                attachment_id,
                notes,
                occurred_on,
                created_by,
            )
            .await?;

        tx.commit().await?;
        Ok(movement)
    }

    // --- SAÍDA (retirada por empreiteiro) ---
    #[allow(clippy::too_many_arguments)]
    pub async fn issue_stock(
        &self,
        site_id: Uuid,
        material_id: Uuid,
        variant: &str,
        quantity: Decimal,
        unit_rate: Option<Decimal>,
        contractor: &str,
        vehicle_number: Option<&str>,
        attachment_id: Option<Uuid>,
        notes: Option<&str>,
        occurred_on: Option<NaiveDate>,
        created_by: Uuid,
    ) -> Result<StockTransaction, AppError> {
        self.check_movement_refs(site_id, material_id, variant, attachment_id).await?;

        let mut tx = self.pool.begin().await?;

        // 1. Trava e valida o saldo. Se falhar aqui, o rollback é automático
        // quando a transação sai de escopo.
        let level = self.inventory_repo
            .get_stock_level_for_update(&mut *tx, site_id, material_id, variant)
            .await?;

        let available = level.map(|l| l.quantity).unwrap_or(Decimal::ZERO);
        if available < quantity {
            return Err(AppError::InsufficientStock { available, requested: quantity });
        }

        // 2. Debita
        self.inventory_repo
            .apply_stock_delta(&mut *tx, site_id, material_id, variant, -quantity)
            .await?;

        // 3. Grava o diário
        let movement = self.inventory_repo
            .record_transaction(
                &mut *tx,
                site_id,
                material_id,
                variant,
                StockDirection::Outward,
                quantity,
                unit_rate,
                contractor,
                vehicle_number,
                attachment_id,
                notes,
                occurred_on,
                created_by,
            )
            .await?;

        tx.commit().await?;
        Ok(movement)
    }

    pub async fn list_stock(
        &self,
        site_id: Uuid,
        material_id: Option<Uuid>,
    ) -> Result<Vec<StockLevelView>, AppError> {
        self.inventory_repo
            .get_stock_levels(&self.pool, site_id, material_id)
            .await
    }

    pub async fn set_threshold(
        &self,
        site_id: Uuid,
        material_id: Uuid,
        variant: &str,
        threshold: Decimal,
    ) -> Result<StockLevelView, AppError> {
        self.check_movement_refs(site_id, material_id, variant, None).await?;

        self.inventory_repo
            .set_threshold(&self.pool, site_id, material_id, variant, threshold)
            .await?;

        // Relê com os dados do material para devolver a mesma forma da listagem
        let levels = self.inventory_repo
            .get_stock_levels(&self.pool, site_id, Some(material_id))
            .await?;
        levels
            .into_iter()
            .find(|l| l.variant == variant)
            .ok_or_else(|| anyhow::anyhow!("Linha de saldo sumiu após o upsert").into())
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn list_transactions(
        &self,
        site_id: Uuid,
        material_id: Option<Uuid>,
        variant: Option<&str>,
        direction: Option<StockDirection>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        limit: Option<i64>,
    ) -> Result<Vec<StockTransaction>, AppError> {
        let limit = limit.unwrap_or(100).clamp(1, 500);
        self.inventory_repo
            .list_transactions(site_id, material_id, variant, direction, from, to, limit)
            .await
    }

    /// O resumo do período: o diário é lido inteiro e o recorte de datas
    /// acontece aqui, junto com a regra da nota sem data.
    pub async fn stock_summary(
        &self,
        site_id: Uuid,
        material_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<StockSummary, AppError> {
        let material = self.material_repo
            .find_material_by_id(material_id)
            .await?
            .ok_or(AppError::MaterialNotFound)?;

        let levels = self.inventory_repo
            .get_stock_levels(&self.pool, site_id, Some(material_id))
            .await?;

        let movements = self.inventory_repo
            .list_material_movements(&self.pool, site_id, material_id)
            .await?;

        let rows = summarize_variants(&levels, &movements, from, to);

        Ok(StockSummary {
            material_id,
            material_name: material.name,
            unit_symbol: material.unit_symbol,
            from,
            to,
            rows,
        })
    }

    pub async fn counterparty_breakdown(
        &self,
        site_id: Uuid,
        direction: StockDirection,
        material_id: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<CounterpartyBreakdownRow>, AppError> {
        self.inventory_repo
            .counterparty_breakdown(site_id, direction, material_id, from, to)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn level(variant: &str, quantity: &str) -> StockLevelView {
        StockLevelView {
            id: Uuid::new_v4(),
            site_id: Uuid::new_v4(),
            material_id: Uuid::new_v4(),
            material_name: "Steel".to_string(),
            unit_symbol: "kg".to_string(),
            variant: variant.to_string(),
            quantity: quantity.parse().unwrap(),
            low_stock_threshold: Decimal::ZERO,
            low_stock: false,
            updated_at: Utc::now(),
        }
    }

    fn movement(
        variant: &str,
        direction: StockDirection,
        quantity: &str,
        occurred_on: Option<NaiveDate>,
    ) -> StockTransaction {
        StockTransaction {
            id: Uuid::new_v4(),
            site_id: Uuid::new_v4(),
            material_id: Uuid::new_v4(),
            variant: variant.to_string(),
            direction,
            quantity: quantity.parse().unwrap(),
            unit_rate: None,
            counterparty: "Shree Traders".to_string(),
            vehicle_number: None,
            attachment_id: None,
            notes: None,
            occurred_on,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn reconstructs_opening_from_closing_and_flows() {
        let levels = vec![level("12mm", "50")];
        let movements = vec![
            movement("12mm", StockDirection::Inward, "30", Some(date(2025, 6, 10))),
            movement("12mm", StockDirection::Outward, "10", Some(date(2025, 6, 12))),
        ];

        let rows = summarize_variants(
            &levels,
            &movements,
            Some(date(2025, 6, 1)),
            Some(date(2025, 6, 30)),
        );

        assert_eq!(rows.len(), 1);
        // opening = 50 - 30 + 10
        assert_eq!(rows[0].opening, "30".parse().unwrap());
        assert_eq!(rows[0].incoming, "30".parse().unwrap());
        assert_eq!(rows[0].outgoing, "10".parse().unwrap());
        assert_eq!(rows[0].closing, "50".parse().unwrap());
    }

    #[test]
    fn opening_never_goes_below_zero() {
        // Entradas maiores que o saldo atual (houve saída sem registro,
        // ou o saldo foi ajustado): a abertura trava em zero
        let levels = vec![level("River", "5")];
        let movements = vec![movement("River", StockDirection::Inward, "20", Some(date(2025, 6, 10)))];

        let rows = summarize_variants(
            &levels,
            &movements,
            Some(date(2025, 6, 1)),
            Some(date(2025, 6, 30)),
        );

        assert_eq!(rows[0].opening, Decimal::ZERO);
    }

    #[test]
    fn undated_movements_fall_inside_every_range() {
        let levels = vec![level("OPC-53", "100")];
        let movements = vec![movement("OPC-53", StockDirection::Inward, "40", None)];

        let rows = summarize_variants(
            &levels,
            &movements,
            Some(date(2030, 1, 1)), // período em que nada datado caberia
            Some(date(2030, 1, 31)),
        );

        assert_eq!(rows[0].incoming, "40".parse().unwrap());
        assert_eq!(rows[0].opening, "60".parse().unwrap());
    }

    #[test]
    fn movements_outside_the_range_are_ignored() {
        let levels = vec![level("20mm", "80")];
        let movements = vec![
            movement("20mm", StockDirection::Inward, "80", Some(date(2025, 5, 1))),
            movement("20mm", StockDirection::Inward, "15", Some(date(2025, 6, 15))),
        ];

        let rows = summarize_variants(
            &levels,
            &movements,
            Some(date(2025, 6, 1)),
            Some(date(2025, 6, 30)),
        );

        assert_eq!(rows[0].incoming, "15".parse().unwrap());
        assert_eq!(rows[0].opening, "65".parse().unwrap());
    }

    #[test]
    fn variant_present_only_in_the_log_still_shows_up() {
        // Linha de saldo zerada pode nem existir; o diário manda no resumo
        let movements = vec![
            movement("Diesel", StockDirection::Inward, "200", Some(date(2025, 6, 5))),
            movement("Diesel", StockDirection::Outward, "200", Some(date(2025, 6, 20))),
        ];

        let rows = summarize_variants(&[], &movements, None, None);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].closing, Decimal::ZERO);
        assert_eq!(rows[0].opening, Decimal::ZERO);
        assert_eq!(rows[0].incoming, "200".parse().unwrap());
        assert_eq!(rows[0].outgoing, "200".parse().unwrap());
    }

    #[test]
    fn open_ended_filters_behave() {
        assert!(in_range(Some(date(2025, 6, 10)), None, None));
        assert!(in_range(Some(date(2025, 6, 10)), Some(date(2025, 6, 1)), None));
        assert!(!in_range(Some(date(2025, 5, 10)), Some(date(2025, 6, 1)), None));
        assert!(in_range(Some(date(2025, 6, 10)), None, Some(date(2025, 6, 30))));
        assert!(!in_range(Some(date(2025, 7, 10)), None, Some(date(2025, 6, 30))));
        assert!(in_range(None, Some(date(2025, 6, 1)), Some(date(2025, 6, 30))));
    }
}
