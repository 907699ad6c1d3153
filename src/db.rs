pub mod user_repo;
pub use user_repo::UserRepository;
pub mod site_repo;
pub use site_repo::SiteRepository;
pub mod material_repo;
pub use material_repo::MaterialRepository;
pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod attachment_repo;
pub use attachment_repo::AttachmentRepository;
pub mod party_repo;
pub use party_repo::PartyRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
