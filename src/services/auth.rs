// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, User, UserRole, UserStatus},
};

/// A senha pode estar certa e mesmo assim a conta não entra:
/// o status decide. Pura de propósito, para testarmos a tabela inteira.
pub(crate) fn status_gate(status: UserStatus) -> Result<(), AppError> {
    match status {
        UserStatus::Approved => Ok(()),
        UserStatus::Pending => Err(AppError::AccountPending),
        UserStatus::Rejected => Err(AppError::AccountRejected),
        UserStatus::Suspended => Err(AppError::AccountSuspended),
    }
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, pool: PgPool) -> Self {
        Self { user_repo, jwt_secret, pool }
    }

    pub async fn register_user(
        &self,
        full_name: &str,
        email: &str,
        phone: Option<&str>,
        password: &str,
    ) -> Result<User, AppError> {
        // 1. Hashing (fica fora da transação, não toca no banco)
        let password_clone = password.to_owned();
        let hashed_password = tokio::task::spawn_blocking(move || {
            hash(&password_clone, bcrypt::DEFAULT_COST)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // --- INÍCIO DA TRANSAÇÃO ---
        // A contagem e o INSERT precisam andar juntos: é ela que decide
        // se esta conta é a primeira (e vira o super admin).
        let mut tx = self.pool.begin().await?;

        let existing = self.user_repo.count_users(&mut *tx).await?;

        let (status, role) = if existing == 0 {
            (UserStatus::Approved, UserRole::SuperAdmin)
        } else {
            (UserStatus::Pending, UserRole::User)
        };

        let new_user = self.user_repo
            .create_user(&mut *tx, full_name, email, phone, &hashed_password, status, role)
            .await?;

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        if existing == 0 {
            tracing::info!("👑 Primeira conta registrada vira o super admin: {}", new_user.email);
        }

        // Nenhum token aqui: conta pendente só recebe token depois de aprovada
        Ok(new_user)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<(String, User), AppError> {
        let user = self.user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // O gate de aprovação, DEPOIS da senha (não vazamos se a conta existe)
        status_gate(user.status)?;

        let token = self.create_token(user.id)?;
        Ok((token, user))
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let user = self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)?;

        // Token emitido ontem não vale nada se a conta foi suspensa hoje
        status_gate(user.status)?;

        Ok(user)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_approved_accounts_pass_the_gate() {
        assert!(status_gate(UserStatus::Approved).is_ok());
        assert!(matches!(status_gate(UserStatus::Pending), Err(AppError::AccountPending)));
        assert!(matches!(status_gate(UserStatus::Rejected), Err(AppError::AccountRejected)));
        assert!(matches!(status_gate(UserStatus::Suspended), Err(AppError::AccountSuspended)));
    }
}
