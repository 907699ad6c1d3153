// src/common/db_utils.rs

use uuid::Uuid;

use crate::common::error::AppError;
use crate::config::AppState;
use crate::models::auth::{User, UserRole};
use crate::models::sites::AccessLevel;

// ---
// Helper de escopo: a "chave" de acesso à obra
// ---
/// Resolve o nível efetivo de um usuário numa obra.
/// Obra inexistente é 404; usuário sem concessão é 403.
/// Admins têm MANAGE implícito em todas as obras.
pub(crate) async fn resolve_site_access(
    app_state: &AppState,
    site_id: Uuid,
    user: &User,
) -> Result<AccessLevel, AppError> {
    // 1. A obra precisa existir (mesmo para admins)
    app_state
        .site_repo
        .find_site_by_id(site_id)
        .await?
        .ok_or(AppError::SiteNotFound)?;

    // 2. Admins passam direto
    if matches!(user.role, UserRole::Admin | UserRole::SuperAdmin) {
        return Ok(AccessLevel::Manage);
    }

    // 3. Os demais precisam de uma concessão explícita
    app_state
        .site_repo
        .find_access_level(user.id, site_id)
        .await?
        .ok_or(AppError::SiteAccessDenied {
            required: AccessLevel::View,
        })
}
