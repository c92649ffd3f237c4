// src/conversation/format.rs
// Reply texts

use crate::catalog::{PhoneListing, PhoneRecord};
use crate::commands::CommandKind;
use crate::config::ContactChannels;

pub const GREETING: &str = "📱Send Your SAMSUNG / HUAWEI / IPHONE / REDMI phone Model to get the PRICE.";
pub const NO_PHONES: &str = "No phones available.";
pub const LIST_FAILED: &str = "❌ Could not load the phone list.";
pub const LOOKUP_FAILED: &str = "❌ Something went wrong while looking that up. Please try again.";
pub const ADD_MALFORMED_ENTRY: &str = "⚠️ Incorrect format. Use: model, price, storage";
pub const CLEARED: &str = "✅ All phone models and prices have been cleared from the database.";
pub const CLEAR_FAILED: &str = "❌ Failed to clear the database.";

/// Capitalize the first letter of each alphabetic run and lower-case the rest.
///
/// `"iPhone 15"` becomes `"Iphone 15"`, `"128gb"` becomes `"128Gb"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// One line per match, in match order
pub fn lookup_results(records: &[PhoneRecord]) -> String {
    records
        .iter()
        .map(|r| format!("{} ({}) - {}", title_case(&r.model), r.storage, r.price))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn not_found(contacts: &ContactChannels) -> String {
    format!(
        "❌ Sorry, I couldn't find that model.\n\n\
         Feel free to contact us directly for more information.\n\
         📞 On Telegram: {}\n\
         📲 Or on WhatsApp: {}",
        contacts.telegram, contacts.whatsapp
    )
}

pub fn listing(phones: &[PhoneListing]) -> String {
    if phones.is_empty() {
        return NO_PHONES.to_string();
    }
    let lines: Vec<String> = phones
        .iter()
        .map(|p| format!("{}: {}", title_case(&p.model), p.price))
        .collect();
    format!("📋 Available Phones:\n{}", lines.join("\n"))
}

pub fn denied(command: CommandKind) -> String {
    format!("🚫 You're not authorized to {} phones.", command.name())
}

pub fn usage(command: CommandKind) -> String {
    match command {
        CommandKind::Add => "❗ Usage: /add model, price, storage\n\
             Example: /add iPhone 15, $899, 128GB; Galaxy S22, $799, 256GB"
            .to_string(),
        CommandKind::Update => "❗ Usage: /update model, price\nExample: /update iPhone 15, $849".to_string(),
        CommandKind::Delete => "❗ Usage: /delete model\nExample: /delete iPhone 15".to_string(),
        other => format!("❗ Usage: {other}"),
    }
}

pub fn added(record: &PhoneRecord) -> String {
    format!("✅ Added {} ({}) - {}", record.model, record.storage, record.price)
}

pub fn add_failed(model: &str) -> String {
    format!("❌ Failed to add {model}")
}

pub fn updated(model: &str, price: &str) -> String {
    format!("🔄 Updated {} to new price {}", title_case(model), price)
}

pub fn update_not_found(model: &str) -> String {
    format!("❌ Couldn't find model '{}' to update.", title_case(model))
}

pub fn update_failed(model: &str) -> String {
    format!("❌ Failed to update {}.", title_case(model))
}

pub fn deleted(model: &str) -> String {
    format!("✅ {} has been deleted from the database.", title_case(model))
}

pub fn delete_not_found(model: &str) -> String {
    format!("❌ Could not find {} to delete.", title_case(model))
}

pub fn delete_failed(model: &str) -> String {
    format!("❌ Failed to delete {}.", title_case(model))
}
