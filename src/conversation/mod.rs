//! Conversation handler - one inbound message in, exactly one reply out
//!
//! Routing: a message starting with a known command token goes to that
//! command, everything else is a catalog lookup. Authorization is checked
//! before the command body is parsed, so a denied request never reaches the
//! store. No error escapes [`ConversationHandler::handle`]; every failure
//! becomes reply text.

pub mod format;

use tracing::{debug, info};

use crate::auth::{AuthGate, UserId};
use crate::catalog::CatalogStore;
use crate::commands::{self, AddEntry, CommandKind, Invocation};
use crate::config::{BotConfig, ContactChannels};

/// Outbound message text plus rendering hints for the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub disable_link_preview: bool,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            disable_link_preview: false,
        }
    }

    fn without_preview(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            disable_link_preview: true,
        }
    }
}

#[derive(Clone)]
pub struct ConversationHandler {
    store: CatalogStore,
    gate: AuthGate,
    contacts: ContactChannels,
}

impl ConversationHandler {
    pub fn new(store: CatalogStore, config: &BotConfig) -> Self {
        Self {
            store,
            gate: AuthGate::new(config),
            contacts: config.contacts.clone(),
        }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub async fn handle(&self, requester: UserId, text: &str) -> Reply {
        match commands::recognize(text) {
            Some(invocation) => self.dispatch(requester, invocation).await,
            None => self.lookup(text).await,
        }
    }

    async fn dispatch(&self, requester: UserId, invocation: Invocation<'_>) -> Reply {
        let Invocation { kind, body } = invocation;

        if kind.requires_auth() && !self.gate.is_authorized(requester) {
            info!(%requester, command = %kind, "unauthorized command rejected");
            return Reply::text(format::denied(kind));
        }

        match kind {
            CommandKind::Start => Reply::text(format::GREETING),
            CommandKind::Add => self.add(body).await,
            CommandKind::Update => self.update(body).await,
            CommandKind::Delete => self.delete(body).await,
            CommandKind::Clear => self.clear().await,
            CommandKind::List => self.list().await,
        }
    }

    /// Plain-text catalog lookup; needs no authorization
    pub async fn lookup(&self, query: &str) -> Reply {
        let query = query.trim();
        if query.is_empty() {
            return Reply::text(format::GREETING);
        }

        match self.store.find_by_substring(query).await {
            Ok(records) if records.is_empty() => Reply::without_preview(format::not_found(&self.contacts)),
            Ok(records) => Reply::text(format::lookup_results(&records)),
            Err(_) => Reply::text(format::LOOKUP_FAILED),
        }
    }

    async fn add(&self, body: Option<&str>) -> Reply {
        let entries = match commands::parse_add(body) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(error = %e, "add rejected");
                return Reply::text(format::usage(CommandKind::Add));
            }
        };

        let mut lines = Vec::with_capacity(entries.len());
        for entry in entries {
            let line = match entry {
                AddEntry::Valid(record) => {
                    match self.store.upsert(&record.model, &record.price, &record.storage).await {
                        Ok(()) => format::added(&record),
                        Err(_) => format::add_failed(&record.model),
                    }
                }
                AddEntry::Malformed { raw } => {
                    debug!(entry = %raw, "malformed add entry");
                    format::ADD_MALFORMED_ENTRY.to_string()
                }
            };
            lines.push(line);
        }
        Reply::text(lines.join("\n"))
    }

    async fn update(&self, body: Option<&str>) -> Reply {
        let request = match commands::parse_update(body) {
            Ok(request) => request,
            Err(_) => return Reply::text(format::usage(CommandKind::Update)),
        };

        match self.store.update_price(&request.model, &request.price).await {
            Ok(true) => Reply::text(format::updated(&request.model, &request.price)),
            Ok(false) => Reply::text(format::update_not_found(&request.model)),
            Err(_) => Reply::text(format::update_failed(&request.model)),
        }
    }

    async fn delete(&self, body: Option<&str>) -> Reply {
        let model = match commands::parse_delete(body) {
            Ok(model) => model,
            Err(_) => return Reply::text(format::usage(CommandKind::Delete)),
        };

        match self.store.delete_exact(&model).await {
            Ok(true) => Reply::text(format::deleted(&model)),
            Ok(false) => Reply::text(format::delete_not_found(&model)),
            Err(_) => Reply::text(format::delete_failed(&model)),
        }
    }

    async fn clear(&self) -> Reply {
        match self.store.clear_all().await {
            Ok(_) => Reply::text(format::CLEARED),
            Err(_) => Reply::text(format::CLEAR_FAILED),
        }
    }

    async fn list(&self) -> Reply {
        match self.store.list_all().await {
            Ok(phones) => Reply::text(format::listing(&phones)),
            Err(_) => Reply::text(format::LIST_FAILED),
        }
    }
}
