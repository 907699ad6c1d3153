// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{
    common::{db_utils::resolve_site_access, error::AppError},
    config::AppState,
    middleware::site::SiteContext,
    models::auth::User,
};

fn bearer_token(request: &axum::http::Request<axum::body::Body>) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
}

// Guarda de autenticação pura (rotas que não são escopadas por obra)
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request).ok_or(AppError::InvalidToken)?;

    // validate_token também rejeita contas que deixaram de ser APPROVED:
    // um token emitido antes da suspensão morre aqui
    let user = app_state.auth_service.validate_token(token).await?;

    // Insere o usuário nos "extensions" da requisição
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

// Guarda de obra: autentica E confere que o usuário tem alguma concessão
// na obra do cabeçalho X-Site-Id (admins enxergam todas)
pub async fn site_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request).ok_or(AppError::InvalidToken)?;
    let user = app_state.auth_service.validate_token(token).await?;

    let (mut parts, body) = request.into_parts();
    let site = SiteContext::from_request_parts(&mut parts, &app_state).await?;
    request = axum::http::Request::from_parts(parts, body);

    // Obra inexistente vira 404; sem concessão vira 403
    resolve_site_access(&app_state, site.0, &user).await?;

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(site);
    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::InvalidToken)
    }
}
