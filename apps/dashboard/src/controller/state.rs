//! Plain state pieces owned by the list controller.

use std::collections::BTreeSet;

use shared::{
    domain::{ContactId, Source, Stage, Temperature},
    error::ValidationError,
    protocol::ContactDraft,
};

/// Filter value meaning "no constraint" for every filter except sorting.
pub const ALL_SENTINEL: &str = "all";
/// Default sort order; also "no constraint".
pub const NEWEST_SENTINEL: &str = "newest";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Source,
    Temperature,
    Stage,
    Group,
    Tags,
    DateRange,
    SortBy,
}

impl FilterKey {
    pub const ALL: [FilterKey; 7] = [
        Self::Source,
        Self::Temperature,
        Self::Stage,
        Self::Group,
        Self::Tags,
        Self::DateRange,
        Self::SortBy,
    ];

    pub fn sentinel(self) -> &'static str {
        match self {
            Self::SortBy => NEWEST_SENTINEL,
            _ => ALL_SENTINEL,
        }
    }
}

/// Active list filters. `None` is the sentinel: the filter is not applied and
/// is never sent to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub source: Option<Source>,
    pub temperature: Option<Temperature>,
    pub stage: Option<Stage>,
    pub group: Option<String>,
    pub tags: Option<String>,
    pub date_range: Option<String>,
    pub sort_by: Option<String>,
}

impl FilterState {
    /// Sets one filter from its UI string. Blank or sentinel values clear it.
    pub fn set(&mut self, key: FilterKey, value: &str) -> Result<(), ValidationError> {
        let value = value.trim();
        let unconstrained = value.is_empty() || value.eq_ignore_ascii_case(key.sentinel());
        let text = (!unconstrained).then(|| value.to_string());

        match key {
            FilterKey::Source => self.source = text.map(|v| Source::from_label(&v)),
            FilterKey::Temperature => {
                self.temperature = text.map(|v| Temperature::parse_filter(&v)).transpose()?
            }
            FilterKey::Stage => self.stage = text.map(|v| Stage::parse_filter(&v)).transpose()?,
            FilterKey::Group => self.group = text,
            FilterKey::Tags => self.tags = text,
            FilterKey::DateRange => self.date_range = text,
            FilterKey::SortBy => self.sort_by = text,
        }
        Ok(())
    }

    /// Current UI string for a filter, the sentinel when unset.
    pub fn value(&self, key: FilterKey) -> String {
        let value = match key {
            FilterKey::Source => self.source.as_ref().map(|s| s.as_str().to_string()),
            FilterKey::Temperature => self.temperature.map(|t| t.as_str().to_string()),
            FilterKey::Stage => self.stage.as_ref().map(|s| s.as_str().to_string()),
            FilterKey::Group => self.group.clone(),
            FilterKey::Tags => self.tags.clone(),
            FilterKey::DateRange => self.date_range.clone(),
            FilterKey::SortBy => self.sort_by.clone(),
        };
        value.unwrap_or_else(|| key.sentinel().to_string())
    }

    pub fn is_unconstrained(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowsPerPage {
    TwentyFive,
    #[default]
    Fifty,
    Hundred,
}

impl RowsPerPage {
    pub const CHOICES: [RowsPerPage; 3] = [Self::TwentyFive, Self::Fifty, Self::Hundred];

    pub fn get(self) -> u32 {
        match self {
            Self::TwentyFive => 25,
            Self::Fifty => 50,
            Self::Hundred => 100,
        }
    }
}

impl TryFrom<u32> for RowsPerPage {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            25 => Ok(Self::TwentyFive),
            50 => Ok(Self::Fifty),
            100 => Ok(Self::Hundred),
            other => Err(ValidationError::RowsPerPage(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub rows_per_page: RowsPerPage,
    pub total_count: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            rows_per_page: RowsPerPage::default(),
            total_count: 0,
        }
    }
}

impl Pagination {
    pub fn total_pages(&self) -> u32 {
        let rows = u64::from(self.rows_per_page.get());
        u32::try_from(self.total_count.div_ceil(rows)).unwrap_or(u32::MAX)
    }

    /// Clamps into `[1, total_pages]`; an empty result set still has page 1.
    pub fn clamp_page(&self, page: u32) -> u32 {
        page.clamp(1, self.total_pages().max(1))
    }

    /// 1-based inclusive range of rows shown, `(0, 0)` when nothing is loaded.
    pub fn visible_range(&self, loaded_rows: usize) -> (u64, u64) {
        let rows = u64::from(self.rows_per_page.get());
        let start = u64::from(self.current_page.saturating_sub(1)) * rows + 1;
        if loaded_rows == 0 || start > self.total_count {
            return (0, 0);
        }
        let end = (u64::from(self.current_page) * rows).min(self.total_count);
        (start, end.max(start))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<ContactId>,
}

impl Selection {
    pub fn contains(&self, id: &ContactId) -> bool {
        self.ids.contains(id)
    }

    pub fn insert(&mut self, id: ContactId) {
        self.ids.insert(id);
    }

    pub fn toggle(&mut self, id: ContactId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    pub fn replace_with<I: IntoIterator<Item = ContactId>>(&mut self, ids: I) {
        self.ids = ids.into_iter().collect();
    }

    pub fn remove(&mut self, id: &ContactId) {
        self.ids.remove(id);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ContactId> {
        self.ids.iter()
    }
}

/// Per-row action menu. At most one row's menu is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RowMenu {
    #[default]
    Closed,
    OpenFor(ContactId),
}

impl RowMenu {
    pub fn toggle(&mut self, id: ContactId) {
        *self = match &*self {
            Self::OpenFor(open) if *open == id => Self::Closed,
            _ => Self::OpenFor(id),
        };
    }

    pub fn is_open_for(&self, id: &ContactId) -> bool {
        matches!(self, Self::OpenFor(open) if open == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
    pub open: bool,
    pub draft: ContactDraft,
}

impl CreateForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

/// Hands out request ids and remembers the latest one per fetch kind so that
/// late responses to superseded fetches can be dropped.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    next: u64,
    latest_list: Option<RequestId>,
    latest_stats: Option<RequestId>,
    list_in_flight: bool,
    stats_in_flight: bool,
}

impl RequestTracker {
    fn issue(&mut self) -> RequestId {
        self.next += 1;
        RequestId(self.next)
    }

    pub fn begin_list(&mut self) -> RequestId {
        let id = self.issue();
        self.latest_list = Some(id);
        self.list_in_flight = true;
        id
    }

    pub fn begin_stats(&mut self) -> RequestId {
        let id = self.issue();
        self.latest_stats = Some(id);
        self.stats_in_flight = true;
        id
    }

    /// Returns false for a stale list response.
    pub fn finish_list(&mut self, id: RequestId) -> bool {
        if self.latest_list != Some(id) {
            return false;
        }
        self.list_in_flight = false;
        true
    }

    /// Returns false for a stale stats response.
    pub fn finish_stats(&mut self, id: RequestId) -> bool {
        if self.latest_stats != Some(id) {
            return false;
        }
        self.stats_in_flight = false;
        true
    }

    pub fn list_in_flight(&self) -> bool {
        self.list_in_flight
    }

    pub fn stats_in_flight(&self) -> bool {
        self.stats_in_flight
    }
}

#[cfg(test)]
#[path = "../tests/state_tests.rs"]
mod tests;
