// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

use crate::middleware::i18n::{I18nStore, Locale};
use crate::models::sites::AccessLevel;

// Nosso tipo de erro interno, com `thiserror` para melhor ergonomia.
// Ele nunca vai direto para o cliente: o handler converte para `ApiError`
// com a mensagem no idioma do usuário.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    // O gate de aprovação: a senha pode estar certa e mesmo assim a conta
    // não entra enquanto o status não for APPROVED
    #[error("Conta aguardando aprovação")]
    AccountPending,

    #[error("Conta rejeitada")]
    AccountRejected,

    #[error("Conta suspensa")]
    AccountSuspended,

    #[error("Apenas administradores")]
    AdminRequired,

    #[error("Apenas o super admin")]
    SuperAdminRequired,

    #[error("Administrador não pode alterar a própria conta")]
    CannotModifySelf,

    #[error("Usuário ainda não aprovado")]
    TargetNotApproved,

    #[error("Cabeçalho X-Site-Id ausente")]
    SiteHeaderMissing,

    #[error("Cabeçalho X-Site-Id inválido")]
    SiteHeaderInvalid,

    #[error("Obra não encontrada")]
    SiteNotFound,

    #[error("Sem acesso à obra")]
    SiteAccessDenied { required: AccessLevel },

    #[error("Código de obra já existe: {0}")]
    SiteCodeAlreadyExists(String),

    #[error("Material não encontrado")]
    MaterialNotFound,

    #[error("Nome de material já existe: {0}")]
    MaterialNameAlreadyExists(String),

    #[error("Subtipo já existe: {0}")]
    VariantAlreadyExists(String),

    #[error("Subtipo desconhecido para este material: {0}")]
    VariantUnknown(String),

    #[error("Estoque insuficiente")]
    InsufficientStock { available: Decimal, requested: Decimal },

    #[error("Movimentação não encontrada")]
    TransactionNotFound,

    #[error("Anexo não encontrado")]
    AttachmentNotFound,

    #[error("Tipo de arquivo não suportado: {0}")]
    UnsupportedAttachmentType(String),

    #[error("Upload inválido: {0}")]
    InvalidUpload(String),

    #[error("Cadastro já existe: {0}")]
    PartyNameAlreadyExists(String),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    // Variante genérica para violações únicas que não mapeamos por nome
    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O erro "de fio": status + mensagem já localizada + detalhes opcionais.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => Json(json!({ "error": self.error, "details": details })),
            None => Json(json!({ "error": self.error })),
        };
        (self.status, body).into_response()
    }
}

impl AppError {
    /// Converte o erro interno na resposta HTTP, buscando a mensagem
    /// no idioma pedido pelo cliente (Accept-Language).
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let (status, key) = match self {
            AppError::ValidationError(errors) => {
                // Retorna todos os detalhes da validação, campo a campo.
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                return ApiError {
                    status: StatusCode::BAD_REQUEST,
                    error: store.message(locale, "validation").to_string(),
                    details: Some(json!(details)),
                };
            }
            AppError::InsufficientStock { available, requested } => {
                return ApiError {
                    status: StatusCode::CONFLICT,
                    error: store.message(locale, "insufficient_stock").to_string(),
                    details: Some(json!({
                        "available": available,
                        "requested": requested,
                    })),
                };
            }
            AppError::SiteAccessDenied { required } => {
                let template = store.message(locale, "site_access_denied");
                return ApiError {
                    status: StatusCode::FORBIDDEN,
                    error: template.replace("{level}", &format!("{:?}", required).to_uppercase()),
                    details: None,
                };
            }

            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "email_exists"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "user_not_found"),
            AppError::AccountPending => (StatusCode::FORBIDDEN, "account_pending"),
            AppError::AccountRejected => (StatusCode::FORBIDDEN, "account_rejected"),
            AppError::AccountSuspended => (StatusCode::FORBIDDEN, "account_suspended"),
            AppError::AdminRequired => (StatusCode::FORBIDDEN, "admin_required"),
            AppError::SuperAdminRequired => (StatusCode::FORBIDDEN, "super_admin_required"),
            AppError::CannotModifySelf => (StatusCode::CONFLICT, "cannot_modify_self"),
            AppError::TargetNotApproved => (StatusCode::CONFLICT, "target_not_approved"),
            AppError::SiteHeaderMissing => (StatusCode::BAD_REQUEST, "site_header_missing"),
            AppError::SiteHeaderInvalid => (StatusCode::BAD_REQUEST, "site_header_invalid"),
            AppError::SiteNotFound => (StatusCode::NOT_FOUND, "site_not_found"),
            AppError::SiteCodeAlreadyExists(_) => (StatusCode::CONFLICT, "site_code_exists"),
            AppError::MaterialNotFound => (StatusCode::NOT_FOUND, "material_not_found"),
            AppError::MaterialNameAlreadyExists(_) => (StatusCode::CONFLICT, "material_exists"),
            AppError::VariantAlreadyExists(_) => (StatusCode::CONFLICT, "variant_exists"),
            AppError::VariantUnknown(_) => (StatusCode::UNPROCESSABLE_ENTITY, "variant_unknown"),
            AppError::TransactionNotFound => (StatusCode::NOT_FOUND, "transaction_not_found"),
            AppError::AttachmentNotFound => (StatusCode::NOT_FOUND, "attachment_not_found"),
            AppError::UnsupportedAttachmentType(_) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "attachment_type")
            }
            AppError::InvalidUpload(_) => (StatusCode::BAD_REQUEST, "invalid_upload"),
            AppError::PartyNameAlreadyExists(_) => (StatusCode::CONFLICT, "party_exists"),
            AppError::UniqueConstraintViolation(_) => (StatusCode::CONFLICT, "unique_violation"),

            // Todos os outros (DatabaseError, InternalServerError, Bcrypt, JWT,
            // FontNotFound) viram 500. O `tracing` loga a mensagem detalhada
            // que o `thiserror` nos deu; o cliente só vê a genérica.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        };

        ApiError {
            status,
            error: store.message(locale, key).to_string(),
            details: None,
        }
    }
}

// Fallback para os middlewares, que devolvem AppError direto (sem Locale
// na mão). Usa as mensagens padrão em inglês.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let store = I18nStore::default();
        self.to_api_error(&Locale::default(), &store).into_response()
    }
}
