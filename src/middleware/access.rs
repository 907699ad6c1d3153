// src/middleware/access.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::site::SiteContext,
    models::{auth::UserRole, sites::AccessLevel},
};

// ---
// 1. Acesso por obra (VIEW < EDIT < MANAGE)
// ---

/// O trait que define o nível mínimo exigido
pub trait AccessDef: Send + Sync + 'static {
    fn required() -> AccessLevel;
}

/// O Extractor (Guardião)
pub struct RequireSiteAccess<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireSiteAccess<T>
where
    T: AccessDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // A. Extrai Usuário (inserido pelo site_guard)
        let user = parts
            .extensions
            .get::<crate::models::auth::User>()
            .cloned()
            .ok_or(AppError::InvalidToken)?;

        // B. Extrai a obra
        let site = parts
            .extensions
            .get::<SiteContext>()
            .copied()
            .ok_or(AppError::SiteHeaderMissing)?;

        // Admins passam por qualquer nível
        if matches!(user.role, UserRole::Admin | UserRole::SuperAdmin) {
            return Ok(RequireSiteAccess(PhantomData));
        }

        let required = T::required();

        // C. Verifica a concessão no banco
        let level = app_state
            .site_repo
            .find_access_level(user.id, site.0)
            .await?
            .ok_or(AppError::SiteAccessDenied { required })?;

        if level < required {
            return Err(AppError::SiteAccessDenied { required });
        }

        Ok(RequireSiteAccess(PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS NÍVEIS (TIPOS)
// ---

pub struct ViewAccess;
impl AccessDef for ViewAccess {
    fn required() -> AccessLevel {
        AccessLevel::View
    }
}

pub struct EditAccess;
impl AccessDef for EditAccess {
    fn required() -> AccessLevel {
        AccessLevel::Edit
    }
}

pub struct ManageAccess;
impl AccessDef for ManageAccess {
    fn required() -> AccessLevel {
        AccessLevel::Manage
    }
}

// ---
// 2. Papel global (painel do admin)
// ---

pub trait RoleDef: Send + Sync + 'static {
    fn allows(role: UserRole) -> bool;
    fn rejection() -> AppError;
}

pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<crate::models::auth::User>()
            .ok_or(AppError::InvalidToken)?;

        if !T::allows(user.role) {
            return Err(T::rejection());
        }

        Ok(RequireRole(PhantomData))
    }
}

pub struct AdminOnly;
impl RoleDef for AdminOnly {
    fn allows(role: UserRole) -> bool {
        matches!(role, UserRole::Admin | UserRole::SuperAdmin)
    }
    fn rejection() -> AppError {
        AppError::AdminRequired
    }
}

pub struct SuperAdminOnly;
impl RoleDef for SuperAdminOnly {
    fn allows(role: UserRole) -> bool {
        matches!(role, UserRole::SuperAdmin)
    }
    fn rejection() -> AppError {
        AppError::SuperAdminRequired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_marker_accepts_both_admin_roles() {
        assert!(AdminOnly::allows(UserRole::Admin));
        assert!(AdminOnly::allows(UserRole::SuperAdmin));
        assert!(!AdminOnly::allows(UserRole::User));
    }

    #[test]
    fn super_admin_marker_is_exclusive() {
        assert!(SuperAdminOnly::allows(UserRole::SuperAdmin));
        assert!(!SuperAdminOnly::allows(UserRole::Admin));
    }

    #[test]
    fn access_levels_order_from_view_to_manage() {
        assert!(AccessLevel::View < AccessLevel::Edit);
        assert!(AccessLevel::Edit < AccessLevel::Manage);
        assert_eq!(EditAccess::required(), AccessLevel::Edit);
    }
}
