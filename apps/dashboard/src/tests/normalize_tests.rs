use super::*;

use serde_json::json;

fn records() -> Value {
    json!([
        { "_id": "c1", "name": "Layla Hassan", "email": "layla@example.com", "temperature": "hot" },
        { "id": 42, "firstName": "Omar", "lastName": "Said", "source": "Instagram" }
    ])
}

#[test]
fn all_envelopes_yield_the_same_contacts() {
    let expected = normalize_contact_page(&records()).contacts;
    assert_eq!(expected.len(), 2);

    let envelopes = [
        json!({ "contacts": records() }),
        json!({ "data": records() }),
        json!({ "data": { "contacts": records() } }),
    ];
    for body in envelopes {
        assert_eq!(normalize_contact_page(&body).contacts, expected, "{body}");
    }
}

#[test]
fn unknown_shapes_normalize_to_an_empty_page() {
    let page = normalize_contact_page(&json!({ "message": "ok" }));
    assert!(page.contacts.is_empty());
    assert_eq!(page.total_count, 0);
    assert!(normalize_contact_page(&Value::Null).contacts.is_empty());
}

#[test]
fn total_prefers_reported_count_then_falls_back_to_length() {
    let body = json!({ "contacts": records(), "total": 240 });
    assert_eq!(normalize_contact_page(&body).total_count, 240);

    let nested = json!({ "data": { "contacts": records(), "totalCount": "77" } });
    assert_eq!(normalize_contact_page(&nested).total_count, 77);

    let zero = json!({ "contacts": records(), "total": 0 });
    assert_eq!(normalize_contact_page(&zero).total_count, 2);
}

#[test]
fn name_falls_back_to_email_then_placeholder() {
    let from_email = normalize_contact(&json!({ "email": "a@b.com" }), 0);
    assert_eq!(from_email.name, "a@b.com");

    let from_parts = normalize_contact(&json!({ "firstName": "Omar", "lastName": "Said" }), 0);
    assert_eq!(from_parts.name, "Omar Said");

    let first_only = normalize_contact(&json!({ "firstName": "Omar" }), 0);
    assert_eq!(first_only.name, "Omar");

    let blank = normalize_contact(&json!({ "name": "  " }), 0);
    assert_eq!(blank.name, UNKNOWN_NAME);
}

#[test]
fn missing_ids_become_one_based_positions() {
    let page = normalize_contact_page(&json!([{ "name": "x" }, { "name": "y" }]));
    assert_eq!(page.contacts[0].id, ContactId::Positional(1));
    assert_eq!(page.contacts[1].id, ContactId::Positional(2));

    let numeric = normalize_contact(&json!({ "id": 42 }), 5);
    assert_eq!(numeric.id, ContactId::server("42"));
    let underscore_wins = normalize_contact(&json!({ "_id": "m1", "id": "x" }), 0);
    assert_eq!(underscore_wins.id, ContactId::server("m1"));
}

#[test]
fn field_defaults_apply_when_absent() {
    let contact = normalize_contact(&json!({ "name": "Sara" }), 0);
    assert_eq!(contact.source, Source::Email);
    assert_eq!(contact.temperature, Temperature::Cold);
    assert_eq!(contact.stage, Stage::Contact);
    assert_eq!(contact.group, None);
    assert!(contact.tags.is_empty());
    assert_eq!(contact.last_contact, "");
}

#[test]
fn temperature_and_last_contact_aliases() {
    let contact = normalize_contact(
        &json!({
            "name": "Sara",
            "temp": "frozen",
            "updatedAt": "2024-03-01T10:00:00Z",
            "createdAt": "2024-01-01T00:00:00Z",
            "tags": ["vip", "", "ramadan"]
        }),
        0,
    );
    assert_eq!(contact.temperature, Temperature::Frozen);
    assert_eq!(contact.last_contact, "2024-03-01T10:00:00Z");
    assert_eq!(contact.tags, vec!["vip".to_string(), "ramadan".to_string()]);

    let created_only = normalize_contact(&json!({ "createdAt": "2024-01-01" }), 0);
    assert_eq!(created_only.last_contact, "2024-01-01");
}

#[test]
fn single_contact_envelopes() {
    let raw = json!({ "_id": "c9", "name": "Nour" });
    for body in [json!({ "contact": raw }), json!({ "data": raw }), raw.clone()] {
        let contact = normalize_single_contact(&body).expect("contact");
        assert_eq!(contact.id, ContactId::server("c9"));
        assert_eq!(contact.name, "Nour");
    }
    assert_eq!(normalize_single_contact(&json!("nope")), None);
}

#[test]
fn stats_accept_aliases_on_body_or_data() {
    let flat = normalize_stats(&json!({
        "totalContacts": 120, "hotLeads": 14, "ghlTransfers": 3, "frozenContacts": 9
    }));
    assert_eq!(
        flat,
        ContactStats {
            total: 120,
            hot: 14,
            ghl_transfers: 3,
            frozen: 9
        }
    );

    let nested = normalize_stats(&json!({ "data": { "total": 5, "hot": 1 } }));
    assert_eq!(nested.total, 5);
    assert_eq!(nested.hot, 1);
    assert_eq!(nested.frozen, 0);

    assert_eq!(normalize_stats(&json!({})), ContactStats::default());
}
