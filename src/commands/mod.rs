//! Operator command grammar
//!
//! ```text
//! /add     entry (";" entry)*      entry = model "," price "," storage
//! /update  model "," price
//! /delete  model
//! /clear
//! /list
//! /start
//! ```
//!
//! Fields are trimmed. An add entry is split at most twice, so the storage
//! field keeps any further commas. A bad add entry is reported on its own
//! line and the rest of the batch still runs; a bad `/update` or `/delete`
//! body rejects the whole command.

use std::fmt;

use thiserror::Error;

use crate::catalog::PhoneRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Start,
    Add,
    Update,
    Delete,
    Clear,
    List,
}

impl CommandKind {
    /// Match a leading token such as `/add` or `/add@PriceBot`
    pub fn from_token(token: &str) -> Option<Self> {
        let name = token.strip_prefix('/')?;
        let name = name.split_once('@').map_or(name, |(name, _bot)| name);
        match name {
            "start" => Some(Self::Start),
            "add" => Some(Self::Add),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            "clear" => Some(Self::Clear),
            "list" => Some(Self::List),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Clear => "clear",
            Self::List => "list",
        }
    }

    /// Mutating commands are reserved for the privileged identity
    pub fn requires_auth(self) -> bool {
        matches!(self, Self::Add | Self::Update | Self::Delete | Self::Clear)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("malformed {command} command")]
    Malformed { command: CommandKind },
}

/// A recognized command token plus whatever text follows it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub kind: CommandKind,
    /// Argument body; `None` when absent or blank
    pub body: Option<&'a str>,
}

/// Split a message into a command invocation, if it starts with a known command token.
///
/// Only the single whitespace character after the token is consumed; the
/// body is otherwise left as typed.
pub fn recognize(text: &str) -> Option<Invocation<'_>> {
    let text = text.trim_start();
    let (token, rest) = match text.find(char::is_whitespace) {
        Some(idx) => {
            let sep_len = text[idx..].chars().next().map_or(1, char::len_utf8);
            (&text[..idx], &text[idx + sep_len..])
        }
        None => (text, ""),
    };

    let kind = CommandKind::from_token(token)?;
    let body = Some(rest).filter(|b| !b.trim().is_empty());
    Some(Invocation { kind, body })
}

/// One `/add` entry, parsed independently of its neighbours
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddEntry {
    Valid(PhoneRecord),
    Malformed { raw: String },
}

pub fn parse_add_entry(raw: &str) -> AddEntry {
    let fields: Vec<&str> = raw.splitn(3, ',').map(str::trim).collect();
    match fields.as_slice() {
        [model, price, storage] if !model.is_empty() => {
            AddEntry::Valid(PhoneRecord::new(*model, *price, *storage))
        }
        _ => AddEntry::Malformed {
            raw: raw.trim().to_string(),
        },
    }
}

/// Parse `/add` arguments. Only a missing body fails as a whole.
pub fn parse_add(body: Option<&str>) -> Result<Vec<AddEntry>, CommandError> {
    let body = body.ok_or(CommandError::Malformed {
        command: CommandKind::Add,
    })?;
    Ok(body.split(';').map(parse_add_entry).collect())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub model: String,
    pub price: String,
}

/// Parse `/update model, price`. Everything after the first comma is the price.
pub fn parse_update(body: Option<&str>) -> Result<UpdateRequest, CommandError> {
    let malformed = CommandError::Malformed {
        command: CommandKind::Update,
    };
    let (model, price) = body.and_then(|b| b.split_once(',')).ok_or(malformed.clone())?;
    let (model, price) = (model.trim(), price.trim());
    if model.is_empty() || price.is_empty() {
        return Err(malformed);
    }

    Ok(UpdateRequest {
        model: model.to_string(),
        price: price.to_string(),
    })
}

/// Parse `/delete model`. The model is taken verbatim after trimming.
pub fn parse_delete(body: Option<&str>) -> Result<String, CommandError> {
    body.map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .ok_or(CommandError::Malformed {
            command: CommandKind::Delete,
        })
}
