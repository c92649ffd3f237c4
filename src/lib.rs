// src/lib.rs

pub mod auth;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod conversation;
pub mod db;
pub mod error;
pub mod telegram;

pub use auth::{AuthGate, UserId};
pub use catalog::{CatalogStore, PhoneListing, PhoneRecord};
pub use config::BotConfig;
pub use conversation::{ConversationHandler, Reply};
pub use error::{CatalogError, Result};
