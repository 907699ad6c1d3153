// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Materials ---
        handlers::materials::list_materials,
        handlers::materials::create_material,
        handlers::materials::add_variant,

        // --- INVENTORY ---
        handlers::inventory::list_stock,
        handlers::inventory::stock_summary,
        handlers::inventory::supplier_breakdown,
        handlers::inventory::contractor_breakdown,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
        handlers::dashboard::get_movement_chart,
        handlers::dashboard::get_top_suppliers,
    ),
    components(
        schemas(
            models::materials::Material,
            models::materials::MaterialVariant,
            models::materials::MaterialResponse,
            models::materials::CreateMaterialPayload,
            models::materials::AddVariantPayload,
            models::inventory::StockDirection,
            models::inventory::StockLevelView,
            models::inventory::StockSummary,
            models::inventory::VariantSummary,
            models::inventory::CounterpartyBreakdownRow,
            models::dashboard::DashboardSummary,
            models::dashboard::MaterialTotalRow,
            models::dashboard::MovementChartEntry,
            models::dashboard::TopSupplierEntry,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Materials", description = "Catálogo de materiais e subtipos"),
        (name = "Inventory", description = "Estoque e movimentações por obra"),
        (name = "Dashboard", description = "Visão geral da obra")
    )
)]
pub struct ApiDoc;

// Registra o esquema Bearer para o botão "Authorize" do Swagger
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_jwt",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
