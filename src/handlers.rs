pub mod auth;
pub mod sites;
pub mod materials;
pub mod inventory;
pub mod attachments;
pub mod parties;
pub mod dashboard;
pub mod documents;
pub mod admin;
