//! Plain-text rendering of the dashboard for terminal output.

use std::fmt::Write as _;

use shared::{
    domain::{Contact, ContactStats},
    protocol::ContactDraft,
};

use crate::{controller::reducer::ContactsDashboard, ui::messages};

const MAX_INLINE_TAGS: usize = 3;

/// Up to two initials taken from the first two words of a name.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|part| part.chars().next())
        .collect()
}

pub fn format_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        return "-".to_string();
    }
    let mut out = tags
        .iter()
        .take(MAX_INLINE_TAGS)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if tags.len() > MAX_INLINE_TAGS {
        let _ = write!(out, " +{}", tags.len() - MAX_INLINE_TAGS);
    }
    out
}

pub fn format_last_contact(contact: &Contact) -> String {
    match contact.last_contact_at() {
        Some(ts) => ts.format("%Y-%m-%d").to_string(),
        None if contact.last_contact.is_empty() => "-".to_string(),
        None => contact.last_contact.clone(),
    }
}

pub fn render_stats(stats: &ContactStats) -> String {
    format!(
        "Total: {}  |  Hot: {}  |  GHL: {}  |  Frozen: {}",
        stats.total, stats.hot, stats.ghl_transfers, stats.frozen
    )
}

pub fn render_contact_row(contact: &Contact, selected: bool) -> String {
    let temperature = contact.temperature;
    format!(
        "[{}] {:<4} {:<24} {:<28} {:<16} {:<10} {} {:<8} {:<11} {:<12} {:<10} {}",
        if selected { "x" } else { " " },
        initials(&contact.name),
        contact.name,
        if contact.email.is_empty() { "-" } else { &contact.email },
        if contact.phone.is_empty() { "-" } else { &contact.phone },
        messages::source_label(&contact.source),
        messages::temperature_icon(temperature),
        messages::temperature_label(temperature),
        messages::stage_label(&contact.stage),
        contact.group.as_deref().unwrap_or("-"),
        format_last_contact(contact),
        format_tags(&contact.tags),
    )
}

pub fn render_contact_detail(contact: &Contact) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", contact.name, contact.id);
    let _ = writeln!(out, "  email:        {}", contact.email);
    let _ = writeln!(out, "  phone:        {}", contact.phone);
    let _ = writeln!(out, "  source:       {}", messages::source_label(&contact.source));
    let _ = writeln!(
        out,
        "  temperature:  {}",
        messages::temperature_label(contact.temperature)
    );
    let _ = writeln!(out, "  stage:        {}", messages::stage_label(&contact.stage));
    let _ = writeln!(out, "  group:        {}", contact.group.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "  last contact: {}", format_last_contact(contact));
    let _ = writeln!(out, "  tags:         {}", format_tags(&contact.tags));
    out
}

/// Whole page: banner, stats, bulk bar, table and pagination footer.
pub fn render_dashboard(state: &ContactsDashboard) -> String {
    let mut out = String::new();

    if let Some(banner) = state.banner() {
        let _ = writeln!(out, "! {}  [{}]", banner.message(), messages::RETRY);
    }
    if state.is_loading() {
        let _ = writeln!(out, "{}", messages::LOADING);
        return out;
    }

    let pagination = state.pagination();
    if state.stats_loading() {
        let _ = writeln!(out, "{}", messages::LOADING);
    } else {
        let _ = writeln!(out, "{}", render_stats(&state.stats()));
    }
    if !state.search_text().trim().is_empty() {
        let _ = writeln!(out, "{}: {}", messages::SEARCH_LABEL, state.search_text().trim());
    }

    if state.bulk_actions_available() {
        let _ = writeln!(
            out,
            "{}",
            messages::selection_summary(state.selection().len(), pagination.total_count)
        );
    }

    if state.contacts().is_empty() {
        let _ = writeln!(out, "{}", messages::NO_CONTACTS);
    } else {
        for contact in state.contacts() {
            let selected = state.selection().contains(&contact.id);
            let _ = writeln!(out, "{}", render_contact_row(contact, selected));
            if state.row_menu().is_open_for(&contact.id) {
                let _ = writeln!(out, "    > {}", messages::ROW_ACTIONS);
            }
        }
    }

    let (start, end) = pagination.visible_range(state.contacts().len());
    let _ = writeln!(
        out,
        "{}  (page {}/{}, {} per page)",
        messages::pagination_summary(start, end, pagination.total_count),
        pagination.current_page,
        pagination.total_pages().max(1),
        pagination.rows_per_page.get()
    );
    if let Some(notice) = state.notice() {
        let _ = writeln!(out, "{notice}");
    }
    let form = state.create_form();
    if form.open {
        out.push_str(&render_create_form(&form.draft));
    }
    out
}

pub fn render_create_form(draft: &ContactDraft) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", messages::NEW_CONTACT);
    let _ = writeln!(out, "  name:   {}", draft.name);
    let _ = writeln!(out, "  email:  {}", draft.email.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "  phone:  {}", draft.phone.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "  source: {}", messages::source_label(&draft.source));
    out
}

#[cfg(test)]
#[path = "../tests/table_tests.rs"]
mod tests;
