// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        AttachmentRepository, DashboardRepository, InventoryRepository, MaterialRepository,
        PartyRepository, SiteRepository, UserRepository,
    },
    middleware::i18n::I18nStore,
    services::{
        admin_service::AdminService, auth::AuthService, dashboard_service::DashboardService,
        document_service::DocumentService, inventory_service::InventoryService,
        material_service::MaterialService, party_service::PartyService, site_service::SiteService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub i18n_store: I18nStore,

    // Repositórios que os guards consultam direto
    pub site_repo: SiteRepository,
    pub attachment_repo: AttachmentRepository,

    // Serviços
    pub auth_service: AuthService,
    pub site_service: SiteService,
    pub material_service: MaterialService,
    pub inventory_service: InventoryService,
    pub admin_service: AdminService,
    pub party_service: PartyService,
    pub dashboard_service: DashboardService,
    pub document_service: DocumentService,
}

impl AppState {
    // Carrega as configurações e monta o gráfico de dependências
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let site_repo = SiteRepository::new(db_pool.clone());
        let material_repo = MaterialRepository::new(db_pool.clone());
        let inventory_repo = InventoryRepository::new(db_pool.clone());
        let attachment_repo = AttachmentRepository::new(db_pool.clone());
        let party_repo = PartyRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service =
            AuthService::new(user_repo.clone(), jwt_secret.clone(), db_pool.clone());
        let site_service = SiteService::new(site_repo.clone(), db_pool.clone());
        let material_service = MaterialService::new(material_repo.clone(), db_pool.clone());
        let inventory_service = InventoryService::new(
            inventory_repo.clone(),
            material_repo.clone(),
            attachment_repo.clone(),
            db_pool.clone(),
        );
        let admin_service =
            AdminService::new(user_repo.clone(), site_repo.clone(), db_pool.clone());
        let party_service = PartyService::new(party_repo, db_pool.clone());
        let dashboard_service =
            DashboardService::new(dashboard_repo, material_repo.clone(), db_pool.clone());
        let document_service =
            DocumentService::new(inventory_repo, site_repo.clone(), material_repo);

        Ok(Self {
            db_pool,
            jwt_secret,
            i18n_store: I18nStore::new(),
            site_repo,
            attachment_repo,
            auth_service,
            site_service,
            material_service,
            inventory_service,
            admin_service,
            party_service,
            dashboard_service,
            document_service,
        })
    }
}
