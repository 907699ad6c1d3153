pub mod auth;
pub mod site_service;
pub mod material_service;
pub mod inventory_service;
pub mod admin_service;
pub mod party_service;
pub mod dashboard_service;
pub mod document_service;
