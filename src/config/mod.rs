// src/config/mod.rs
// Process configuration, loaded once at startup and passed by reference

use std::str::FromStr;
use tracing::{debug, warn};

use crate::auth::UserId;
use crate::error::{CatalogError, Result};

const DEFAULT_CONTACT: &str = "024-585-9086";

/// Contact channels offered when a lookup finds nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactChannels {
    pub telegram: String,
    pub whatsapp: String,
}

impl Default for ContactChannels {
    fn default() -> Self {
        Self {
            telegram: DEFAULT_CONTACT.to_string(),
            whatsapp: DEFAULT_CONTACT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    // ── Transport
    /// Bot token; only `serve` needs it
    pub bot_token: Option<String>,

    // ── Authorization
    pub admin_id: UserId,

    // ── Database
    pub database_url: String,

    // ── Replies
    pub contacts: ContactChannels,
}

// Trims whitespace and trailing `# comments` before parsing
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => {
                    debug!(key, "config value read from environment");
                    parsed
                }
                Err(_) => {
                    warn!(key, value = %val, "config parse failed, using default");
                    default
                }
            }
        }
        Err(_) => default,
    }
}

/// Log level name from `PRICEBOT_LOG_LEVEL`; read before the subscriber exists
pub fn log_level() -> String {
    env_var_or("PRICEBOT_LOG_LEVEL", "info".to_string())
}

fn read_key(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|k| !k.trim().is_empty())
}

impl BotConfig {
    /// Build the config from environment variables.
    ///
    /// `.env` loading is the caller's job (see `main`).
    pub fn from_env() -> Result<Self> {
        let admin_raw = read_key("PRICEBOT_ADMIN_ID")
            .ok_or_else(|| CatalogError::Config("PRICEBOT_ADMIN_ID is not set".to_string()))?;
        let admin_id = admin_raw.trim().parse::<u64>().map_err(|_| {
            CatalogError::Config(format!("PRICEBOT_ADMIN_ID is not a user id: {admin_raw}"))
        })?;

        Ok(Self {
            bot_token: read_key("TELOXIDE_TOKEN").or_else(|| read_key("BOT_TOKEN")),
            admin_id: UserId(admin_id),
            database_url: env_var_or("DATABASE_URL", "sqlite:phones.db".to_string()),
            contacts: ContactChannels {
                telegram: env_var_or("PRICEBOT_CONTACT_TELEGRAM", DEFAULT_CONTACT.to_string()),
                whatsapp: env_var_or("PRICEBOT_CONTACT_WHATSAPP", DEFAULT_CONTACT.to_string()),
            },
        })
    }

    /// Config for tests and embedding: in-memory defaults around a given admin
    pub fn with_admin(admin_id: UserId) -> Self {
        Self {
            bot_token: None,
            admin_id,
            database_url: "sqlite::memory:".to_string(),
            contacts: ContactChannels::default(),
        }
    }

    pub fn require_token(&self) -> Result<&str> {
        self.bot_token
            .as_deref()
            .ok_or_else(|| CatalogError::Config("TELOXIDE_TOKEN (or BOT_TOKEN) is not set".to_string()))
    }
}
