pub mod auth;
pub mod site;
pub mod access;
pub mod i18n;
