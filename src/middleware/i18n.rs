// src/middleware/i18n.rs

use std::collections::HashMap;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

// Nosso extrator de idioma
pub struct Locale(pub String);

impl Default for Locale {
    fn default() -> Self {
        Locale("en".to_string())
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let default_lang = "en".to_string();

        let lang = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .and_then(|header_str| {
                accept_language::parse(header_str)
                    .first() // Pega o primeiro idioma (ex: "pt-BR")
                    .map(|tag_string| {
                        // "pt-BR" -> split vira ["pt", "BR"] -> next() pega "pt"
                        // "en"    -> split vira ["en"]       -> next() pega "en"
                        tag_string.split('-').next().unwrap_or(tag_string).to_string()
                    })
            })
            .unwrap_or(default_lang);

        Ok(Locale(lang))
    }
}

// ---
// O catálogo de mensagens (en + pt)
// ---
// Vive no AppState; o handler chama `to_api_error(&locale, &store)`.
#[derive(Clone)]
pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

impl I18nStore {
    pub fn new() -> Self {
        let mut en: HashMap<&'static str, &'static str> = HashMap::new();
        let mut pt: HashMap<&'static str, &'static str> = HashMap::new();

        en.insert("validation", "One or more fields are invalid.");
        pt.insert("validation", "Um ou mais campos são inválidos.");

        en.insert("email_exists", "This e-mail is already in use.");
        pt.insert("email_exists", "Este e-mail já está em uso.");

        en.insert("invalid_credentials", "Invalid e-mail or password.");
        pt.insert("invalid_credentials", "E-mail ou senha inválidos.");

        en.insert("invalid_token", "Missing or invalid authentication token.");
        pt.insert("invalid_token", "Token de autenticação inválido ou ausente.");

        en.insert("user_not_found", "User not found.");
        pt.insert("user_not_found", "Usuário não encontrado.");

        en.insert("account_pending", "Your account is awaiting approval.");
        pt.insert("account_pending", "Sua conta está aguardando aprovação.");

        en.insert("account_rejected", "Your account was rejected.");
        pt.insert("account_rejected", "Sua conta foi rejeitada.");

        en.insert("account_suspended", "Your account is suspended.");
        pt.insert("account_suspended", "Sua conta está suspensa.");

        en.insert("admin_required", "Administrators only.");
        pt.insert("admin_required", "Apenas administradores.");

        en.insert("super_admin_required", "Super admin only.");
        pt.insert("super_admin_required", "Apenas o super admin.");

        en.insert("cannot_modify_self", "You cannot change your own account here.");
        pt.insert("cannot_modify_self", "Você não pode alterar a própria conta aqui.");

        en.insert("target_not_approved", "The user is not approved yet.");
        pt.insert("target_not_approved", "O usuário ainda não foi aprovado.");

        en.insert("site_header_missing", "The X-Site-Id header is required.");
        pt.insert("site_header_missing", "O cabeçalho X-Site-Id é obrigatório.");

        en.insert("site_header_invalid", "The X-Site-Id header is not a valid UUID.");
        pt.insert("site_header_invalid", "Cabeçalho X-Site-Id inválido (não é um UUID).");

        en.insert("site_not_found", "Site not found.");
        pt.insert("site_not_found", "Obra não encontrada.");

        en.insert("site_access_denied", "You need {level} access on this site.");
        pt.insert("site_access_denied", "Você precisa de acesso {level} nesta obra.");

        en.insert("site_code_exists", "This site code is already in use.");
        pt.insert("site_code_exists", "Este código de obra já está em uso.");

        en.insert("material_not_found", "Material not found.");
        pt.insert("material_not_found", "Material não encontrado.");

        en.insert("material_exists", "A material with this name already exists.");
        pt.insert("material_exists", "Já existe um material com este nome.");

        en.insert("variant_exists", "This subtype already exists.");
        pt.insert("variant_exists", "Este subtipo já existe.");

        en.insert("variant_unknown", "Unknown subtype for this material.");
        pt.insert("variant_unknown", "Subtipo desconhecido para este material.");

        en.insert("insufficient_stock", "Not enough stock for this issue.");
        pt.insert("insufficient_stock", "Estoque insuficiente para esta saída.");

        en.insert("transaction_not_found", "Transaction not found.");
        pt.insert("transaction_not_found", "Movimentação não encontrada.");

        en.insert("attachment_not_found", "Attachment not found.");
        pt.insert("attachment_not_found", "Anexo não encontrado.");

        en.insert("attachment_type", "Unsupported file type. Use PDF or an image.");
        pt.insert("attachment_type", "Tipo de arquivo não suportado. Use PDF ou imagem.");

        en.insert("invalid_upload", "Invalid upload.");
        pt.insert("invalid_upload", "Upload inválido.");

        en.insert("party_exists", "This name is already registered for the site.");
        pt.insert("party_exists", "Este nome já está cadastrado para a obra.");

        en.insert("unique_violation", "This record already exists.");
        pt.insert("unique_violation", "Este registro já existe.");

        en.insert("internal", "An unexpected error occurred.");
        pt.insert("internal", "Ocorreu um erro inesperado.");

        let mut messages = HashMap::new();
        messages.insert("en", en);
        messages.insert("pt", pt);

        Self { messages }
    }

    /// Busca a mensagem no idioma pedido, caindo para o inglês
    /// (e, em último caso, para a própria chave).
    pub fn message<'a>(&self, locale: &Locale, key: &'a str) -> &'a str {
        self.messages
            .get(locale.0.as_str())
            .and_then(|lang| lang.get(key))
            .or_else(|| self.messages.get("en").and_then(|lang| lang.get(key)))
            .copied()
            .unwrap_or(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_english_for_unknown_language() {
        let store = I18nStore::new();
        let locale = Locale("de".to_string());
        assert_eq!(store.message(&locale, "internal"), "An unexpected error occurred.");
    }

    #[test]
    fn returns_portuguese_when_asked() {
        let store = I18nStore::new();
        let locale = Locale("pt".to_string());
        assert_eq!(store.message(&locale, "site_not_found"), "Obra não encontrada.");
    }

    #[test]
    fn unknown_key_echoes_the_key() {
        let store = I18nStore::new();
        assert_eq!(store.message(&Locale::default(), "nope"), "nope");
    }
}
