// src/main.rs

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::env;
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

// Importações principais
use crate::config::AppState;
use crate::middleware::auth::{auth_guard, site_guard};

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Define as rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/me/sites", get(handlers::auth::get_my_sites))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Diretório de obras (criação é só de admin, via guardião no handler)
    let site_routes = Router::new()
        .route("/"
               ,post(handlers::sites::create_site)
               .get(handlers::sites::list_sites)
        )
        .route("/{id}", get(handlers::sites::get_site))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // O painel do admin (aprovação de contas, concessões, materiais customizados)
    let admin_routes = Router::new()
        .route("/users", get(handlers::admin::list_users))
        .route("/users/{id}/status", put(handlers::admin::set_user_status))
        .route("/users/{id}/role", put(handlers::admin::set_user_role))
        .route("/users/{id}/access", get(handlers::admin::list_user_access))
        .route("/access"
               ,post(handlers::admin::grant_access)
               .delete(handlers::admin::revoke_access)
        )
        .route("/materials", post(handlers::materials::create_material))
        .route("/materials/{id}/variants", post(handlers::materials::add_variant))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Tudo aqui é escopado pela obra do cabeçalho X-Site-Id
    let inventory_routes = Router::new()
        .route("/materials", get(handlers::materials::list_materials))
        .route("/stock", get(handlers::inventory::list_stock))
        .route("/stock/threshold", put(handlers::inventory::set_threshold))
        .route("/receive"
               ,post(handlers::inventory::receive_stock)
        )
        .route("/issue"
               ,post(handlers::inventory::issue_stock)
        )
        .route("/transactions", get(handlers::inventory::list_transactions))
        .route("/transactions/{id}/slip", get(handlers::documents::transaction_slip))
        .route("/summary", get(handlers::inventory::stock_summary))
        .route("/suppliers", get(handlers::inventory::supplier_breakdown))
        .route("/contractors", get(handlers::inventory::contractor_breakdown))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            site_guard,
        ));

    // Upload das notas: o corpo pode ser maior que o padrão (fotos de nota)
    let attachment_routes = Router::new()
        .route("/", post(handlers::attachments::upload_attachment))
        .route("/{id}", get(handlers::attachments::download_attachment))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            site_guard,
        ));

    let party_routes = Router::new()
        .route("/"
               ,post(handlers::parties::create_party)
               .get(handlers::parties::list_parties)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            site_guard,
        ));

    let dashboard_routes = Router::new()
        .route("/summary", get(handlers::dashboard::get_summary))
        .route("/movement-chart", get(handlers::dashboard::get_movement_chart))
        .route("/top-suppliers", get(handlers::dashboard::get_top_suppliers))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            site_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/sites", site_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/inventory", inventory_routes)
        .nest("/api/attachments", attachment_routes)
        .nest("/api/parties", party_routes)
        .nest("/api/dashboard", dashboard_routes)
        .with_state(app_state);

    // Inicia o servidor
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
