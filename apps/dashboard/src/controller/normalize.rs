//! Boundary adapter from the backend's several response envelopes to the
//! canonical `Contact` / `ContactStats` shapes.

use serde_json::Value;
use shared::domain::{Contact, ContactId, ContactStats, Source, Stage, Temperature};

use crate::ui::messages::UNKNOWN_NAME;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactPage {
    pub contacts: Vec<Contact>,
    pub total_count: u64,
}

/// Envelopes probed in order: `contacts`, `data`, `data.contacts`, bare array.
/// The first array found wins.
pub fn contact_records(body: &Value) -> &[Value] {
    let data = body.get("data");
    [
        body.get("contacts"),
        data,
        data.and_then(|d| d.get("contacts")),
        Some(body),
    ]
    .into_iter()
    .flatten()
    .find_map(Value::as_array)
    .map(Vec::as_slice)
    .unwrap_or(&[])
}

pub fn normalize_contact_page(body: &Value) -> ContactPage {
    let contacts: Vec<Contact> = contact_records(body)
        .iter()
        .enumerate()
        .map(|(index, raw)| normalize_contact(raw, index))
        .collect();

    let data = body.get("data");
    let total_count = [Some(body), data]
        .into_iter()
        .flatten()
        .find_map(|scope| count_field(scope, &["total", "totalCount"]))
        .unwrap_or(contacts.len() as u64);

    ContactPage {
        contacts,
        total_count,
    }
}

/// Single-record responses: `{contact}`, `{data}` or the bare object.
pub fn normalize_single_contact(body: &Value) -> Option<Contact> {
    [body.get("contact"), body.get("data"), Some(body)]
        .into_iter()
        .flatten()
        .find(|candidate| candidate.is_object())
        .map(|raw| normalize_contact(raw, 0))
}

pub fn normalize_contact(raw: &Value, index: usize) -> Contact {
    let id = text(raw, "_id")
        .or_else(|| text(raw, "id"))
        .map(ContactId::Server)
        .unwrap_or(ContactId::Positional(index + 1));

    let email = text(raw, "email");
    let name = text(raw, "name")
        .or_else(|| {
            text(raw, "firstName").map(|first| {
                let last = text(raw, "lastName").unwrap_or_default();
                format!("{first} {last}").trim().to_string()
            })
        })
        .or_else(|| email.clone())
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());

    let created_at = text(raw, "createdAt");
    let last_contact = text(raw, "lastContact")
        .or_else(|| text(raw, "updatedAt"))
        .or_else(|| created_at.clone())
        .unwrap_or_default();

    Contact {
        id,
        name,
        email: email.unwrap_or_default(),
        phone: text(raw, "phone").unwrap_or_default(),
        avatar: text(raw, "avatar"),
        source: text(raw, "source")
            .map(|s| Source::from_label(&s))
            .unwrap_or(Source::Email),
        temperature: text(raw, "temperature")
            .or_else(|| text(raw, "temp"))
            .map(|t| Temperature::from_label(&t))
            .unwrap_or(Temperature::Cold),
        stage: text(raw, "stage")
            .map(|s| Stage::from_label(&s))
            .unwrap_or(Stage::Contact),
        group: text(raw, "group"),
        last_contact,
        tags: raw
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        created_at: created_at.unwrap_or_default(),
    }
}

/// Each counter takes the first non-zero alias, on the body and then on `data`.
pub fn normalize_stats(body: &Value) -> ContactStats {
    let scopes: Vec<&Value> = [Some(body), body.get("data")].into_iter().flatten().collect();
    let pick = |keys: &[&str]| {
        scopes
            .iter()
            .find_map(|scope| count_field(scope, keys))
            .unwrap_or(0)
    };

    ContactStats {
        total: pick(&["total", "totalContacts"]),
        hot: pick(&["hot", "hotLeads"]),
        ghl_transfers: pick(&["ghlTransfers"]),
        frozen: pick(&["frozen", "frozenContacts"]),
    }
}

fn count_field(scope: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter()
        .find_map(|key| scope.get(key).and_then(as_count).filter(|n| *n > 0))
}

fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Non-empty string field; numbers are accepted and stringified.
fn text(raw: &Value, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../tests/normalize_tests.rs"]
mod tests;
