use super::*;
use crate::protocol::{ContactDraft, ExportQuery, ListQuery};

#[test]
fn temperature_labels_are_lenient_for_server_data() {
    assert_eq!(Temperature::from_label("HOT"), Temperature::Hot);
    assert_eq!(Temperature::from_label(" warm "), Temperature::Warm);
    assert_eq!(Temperature::from_label("boiling"), Temperature::Unspecified);
    assert_eq!(Temperature::from_label(""), Temperature::Unspecified);
}

#[test]
fn temperature_filter_rejects_unknown_values() {
    assert_eq!(Temperature::parse_filter("cold"), Ok(Temperature::Cold));
    assert!(matches!(
        Temperature::parse_filter("unspecified"),
        Err(ValidationError::UnknownTemperature(_))
    ));
}

#[test]
fn stage_keeps_raw_label_for_unknown_values() {
    assert_eq!(Stage::from_label("MQL"), Stage::Mql);
    let other = Stage::from_label("Negotiation");
    assert_eq!(other, Stage::Other("Negotiation".to_string()));
    assert_eq!(other.as_str(), "Negotiation");
    assert!(Stage::parse_filter("negotiation").is_err());
}

#[test]
fn source_round_trips_through_wire_strings() {
    let json = serde_json::to_string(&Source::Instagram).expect("serialize");
    assert_eq!(json, "\"Instagram\"");
    let parsed: Source = serde_json::from_str("\"TikTok\"").expect("deserialize");
    assert_eq!(parsed, Source::Other("TikTok".to_string()));
    assert_eq!(Source::default(), Source::Manual);
}

#[test]
fn positional_ids_have_no_server_identifier() {
    let id = ContactId::Positional(3);
    assert_eq!(id.server_id(), None);
    assert_eq!(id.to_string(), "#3");
    assert!(matches!(
        id.require_server_id(),
        Err(ValidationError::PositionalId(ContactId::Positional(3)))
    ));
    assert_eq!(ContactId::server("abc").require_server_id(), Ok("abc"));
}

#[test]
fn contact_timestamps_parse_rfc3339_and_plain_dates() {
    let contact = Contact {
        id: ContactId::server("1"),
        name: "Alice".to_string(),
        email: String::new(),
        phone: String::new(),
        avatar: None,
        source: Source::Email,
        temperature: Temperature::Cold,
        stage: Stage::Contact,
        group: None,
        last_contact: "2024-03-01T10:15:00Z".to_string(),
        tags: Vec::new(),
        created_at: "2024-02-01".to_string(),
    };
    assert_eq!(
        contact.last_contact_at().map(|ts| ts.to_rfc3339()),
        Some("2024-03-01T10:15:00+00:00".to_string())
    );
    assert!(contact.created_at().is_some());
}

#[test]
fn list_query_omits_unset_fields() {
    let mut query = ListQuery::new(2, 25);
    query.temperature = Some(Temperature::Hot);
    query.sort_by = Some("oldest".to_string());
    let value = serde_json::to_value(&query).expect("serialize");
    assert_eq!(
        value,
        serde_json::json!({ "page": 2, "limit": 25, "temperature": "hot", "sortBy": "oldest" })
    );

    let export = serde_json::to_value(ExportQuery::default()).expect("serialize");
    assert_eq!(export, serde_json::json!({}));
}

#[test]
fn draft_validation_requires_non_blank_name() {
    let draft = ContactDraft {
        name: "   ".to_string(),
        ..ContactDraft::default()
    };
    assert_eq!(draft.validate(), Err(ValidationError::EmptyName));

    let draft = ContactDraft {
        name: "  Sara ".to_string(),
        email: Some(" ".to_string()),
        phone: Some("+966500000000".to_string()),
        source: Source::Manual,
    };
    assert!(draft.validate().is_ok());
    let normalized = draft.normalized();
    assert_eq!(normalized.name, "Sara");
    assert_eq!(normalized.email, None);
    assert_eq!(
        serde_json::to_value(&normalized).expect("serialize"),
        serde_json::json!({ "name": "Sara", "phone": "+966500000000", "source": "Manual" })
    );
}
