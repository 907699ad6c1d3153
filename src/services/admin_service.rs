// src/services/admin_service.rs

use sqlx::PgPool;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::{
    common::error::AppError,
    db::{SiteRepository, UserRepository},
    models::auth::{User, UserRole, UserStatus},
    models::sites::{AccessLevel, SiteAccess, SiteAccessView},
};

fn single_field_error(field: &'static str, message: &'static str) -> AppError {
    let mut err = ValidationError::new(field);
    err.message = Some(message.into());
    let mut errors = ValidationErrors::new();
    errors.add(field, err);
    AppError::ValidationError(errors)
}

// ---
// As regras de decisão, puras para podermos testar a tabela inteira
// ---

/// Quem pode mudar o status de quem, e para qual.
pub(crate) fn validate_status_decision(
    actor: &User,
    target: &User,
    decision: UserStatus,
) -> Result<(), AppError> {
    // Ninguém se aprova, se rejeita nem se suspende sozinho
    if actor.id == target.id {
        return Err(AppError::CannotModifySelf);
    }

    // PENDING é estado de nascimento, não de decisão
    if decision == UserStatus::Pending {
        return Err(single_field_error("status", "PENDING não é uma decisão válida."));
    }

    // Mexer em outro admin é papel do super admin
    if matches!(target.role, UserRole::Admin | UserRole::SuperAdmin)
        && actor.role != UserRole::SuperAdmin
    {
        return Err(AppError::SuperAdminRequired);
    }

    Ok(())
}

/// Promoção/demissão de papel: só o super admin, e nunca sobre si mesmo.
pub(crate) fn validate_role_decision(
    actor: &User,
    target: &User,
    new_role: UserRole,
) -> Result<(), AppError> {
    if actor.role != UserRole::SuperAdmin {
        return Err(AppError::SuperAdminRequired);
    }

    if actor.id == target.id {
        return Err(AppError::CannotModifySelf);
    }

    // Super admin só existe pelo bootstrap (primeira conta)
    if new_role == UserRole::SuperAdmin {
        return Err(single_field_error("role", "SUPER_ADMIN não pode ser atribuído."));
    }

    Ok(())
}

#[derive(Clone)]
pub struct AdminService {
    user_repo: UserRepository,
    site_repo: SiteRepository,
    pool: PgPool,
}

impl AdminService {
    pub fn new(user_repo: UserRepository, site_repo: SiteRepository, pool: PgPool) -> Self {
        Self { user_repo, site_repo, pool }
    }

    pub async fn list_users(&self, status: Option<UserStatus>) -> Result<Vec<User>, AppError> {
        self.user_repo.list_users(status).await
    }

    pub async fn set_user_status(
        &self,
        actor: &User,
        target_id: Uuid,
        decision: UserStatus,
    ) -> Result<User, AppError> {
        let target = self.user_repo
            .find_by_id(target_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        validate_status_decision(actor, &target, decision)?;

        let updated = self.user_repo
            .update_status(&self.pool, target_id, decision)
            .await?
            .ok_or(AppError::UserNotFound)?;

        tracing::info!(
            "🗂️ Conta {} movida para {:?} por {}",
            updated.email,
            updated.status,
            actor.email
        );

        Ok(updated)
    }

    pub async fn set_user_role(
        &self,
        actor: &User,
        target_id: Uuid,
        new_role: UserRole,
    ) -> Result<User, AppError> {
        let target = self.user_repo
            .find_by_id(target_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        validate_role_decision(actor, &target, new_role)?;

        let updated = self.user_repo
            .update_role(&self.pool, target_id, new_role)
            .await?
            .ok_or(AppError::UserNotFound)?;

        Ok(updated)
    }

    pub async fn grant_site_access(
        &self,
        actor: &User,
        user_id: Uuid,
        site_id: Uuid,
        level: AccessLevel,
    ) -> Result<SiteAccess, AppError> {
        let target = self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        // Conceder obra a conta pendente não faz sentido
        if target.status != UserStatus::Approved {
            return Err(AppError::TargetNotApproved);
        }

        self.site_repo
            .find_site_by_id(site_id)
            .await?
            .ok_or(AppError::SiteNotFound)?;

        self.site_repo
            .upsert_access(&self.pool, user_id, site_id, level, actor.id)
            .await
    }

    /// Revogação é idempotente: revogar o que não existe não é erro.
    pub async fn revoke_site_access(
        &self,
        user_id: Uuid,
        site_id: Uuid,
    ) -> Result<bool, AppError> {
        self.site_repo
            .revoke_access(&self.pool, user_id, site_id)
            .await
    }

    pub async fn list_user_access(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<SiteAccessView>, AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        self.site_repo.list_access_for_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            full_name: "Someone".to_string(),
            email: "someone@example.com".to_string(),
            phone: None,
            password_hash: "x".to_string(),
            status: UserStatus::Approved,
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn admin_approves_a_plain_user() {
        let admin = user(UserRole::Admin);
        let target = user(UserRole::User);
        assert!(validate_status_decision(&admin, &target, UserStatus::Approved).is_ok());
        assert!(validate_status_decision(&admin, &target, UserStatus::Suspended).is_ok());
    }

    #[test]
    fn nobody_decides_about_themselves() {
        let admin = user(UserRole::Admin);
        assert!(matches!(
            validate_status_decision(&admin, &admin, UserStatus::Suspended),
            Err(AppError::CannotModifySelf)
        ));
    }

    #[test]
    fn pending_is_not_a_decision() {
        let admin = user(UserRole::Admin);
        let target = user(UserRole::User);
        assert!(matches!(
            validate_status_decision(&admin, &target, UserStatus::Pending),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn only_super_admin_touches_admins() {
        let admin = user(UserRole::Admin);
        let other_admin = user(UserRole::Admin);
        assert!(matches!(
            validate_status_decision(&admin, &other_admin, UserStatus::Suspended),
            Err(AppError::SuperAdminRequired)
        ));

        let root = user(UserRole::SuperAdmin);
        assert!(validate_status_decision(&root, &other_admin, UserStatus::Suspended).is_ok());
    }

    #[test]
    fn role_changes_are_super_admin_only() {
        let admin = user(UserRole::Admin);
        let target = user(UserRole::User);
        assert!(matches!(
            validate_role_decision(&admin, &target, UserRole::Admin),
            Err(AppError::SuperAdminRequired)
        ));

        let root = user(UserRole::SuperAdmin);
        assert!(validate_role_decision(&root, &target, UserRole::Admin).is_ok());
        assert!(validate_role_decision(&root, &target, UserRole::User).is_ok());
    }

    #[test]
    fn super_admin_role_is_never_granted() {
        let root = user(UserRole::SuperAdmin);
        let target = user(UserRole::User);
        assert!(matches!(
            validate_role_decision(&root, &target, UserRole::SuperAdmin),
            Err(AppError::ValidationError(_))
        ));
    }
}
