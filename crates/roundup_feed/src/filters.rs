use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Named time ranges offered by the filter bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    Today,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Today => "today",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaywallMode {
    #[default]
    All,
    FreeOnly,
    PaywalledOnly,
}

impl PaywallMode {
    /// Wire value for the `paywall` parameter; `All` emits nothing.
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            PaywallMode::All => None,
            PaywallMode::FreeOnly => Some("free"),
            PaywallMode::PaywalledOnly => Some("paywalled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Grouped,
    Flat,
}

/// The user's current selection criteria. Mutated only through whole-object
/// updates on the feed store; the date fields go through setters so the
/// named range and the explicit range stay mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    /// Selected topics, OR semantics. Empty means all.
    pub topics: Vec<String>,
    /// Selected sources, OR semantics. Empty means all.
    pub sources: Vec<String>,
    time_range: Option<TimeRange>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    pub search: String,
    pub paywall: PaywallMode,
}

impl FilterState {
    pub fn time_range(&self) -> Option<TimeRange> {
        self.time_range
    }

    pub fn date_from(&self) -> Option<NaiveDate> {
        self.date_from
    }

    pub fn date_to(&self) -> Option<NaiveDate> {
        self.date_to
    }

    /// Selecting a named range clears any explicit bounds.
    pub fn set_time_range(&mut self, range: Option<TimeRange>) {
        self.time_range = range;
        if range.is_some() {
            self.date_from = None;
            self.date_to = None;
        }
    }

    /// Setting an explicit bound clears the named range.
    pub fn set_date_from(&mut self, from: Option<NaiveDate>) {
        self.date_from = from;
        self.time_range = None;
    }

    pub fn set_date_to(&mut self, to: Option<NaiveDate>) {
        self.date_to = to;
        self.time_range = None;
    }

    pub fn clear_dates(&mut self) {
        self.date_from = None;
        self.date_to = None;
    }

    /// True iff any field differs from its default. Drives the
    /// clear-filters affordance and the zero-results messaging.
    pub fn is_filtered(&self) -> bool {
        *self != Self::default()
    }

    /// Grouped when no content-narrowing filter is active. A date range is
    /// a temporal scope, not a content filter, so it does not disqualify
    /// grouping.
    pub fn view_mode(&self) -> ViewMode {
        let content_default = self.topics.is_empty()
            && self.sources.is_empty()
            && self.search.is_empty()
            && self.paywall == PaywallMode::All;
        if content_default {
            ViewMode::Grouped
        } else {
            ViewMode::Flat
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unfiltered_and_grouped() {
        let filters = FilterState::default();
        assert!(!filters.is_filtered());
        assert_eq!(filters.view_mode(), ViewMode::Grouped);
    }

    #[test]
    fn any_content_field_flips_to_flat() {
        let mut f = FilterState::default();
        f.topics = vec!["Sports".to_string()];
        assert!(f.is_filtered());
        assert_eq!(f.view_mode(), ViewMode::Flat);

        let mut f = FilterState::default();
        f.sources = vec!["Wire".to_string()];
        assert_eq!(f.view_mode(), ViewMode::Flat);

        let mut f = FilterState::default();
        f.search = "pay gap".to_string();
        assert_eq!(f.view_mode(), ViewMode::Flat);

        let mut f = FilterState::default();
        f.paywall = PaywallMode::FreeOnly;
        assert_eq!(f.view_mode(), ViewMode::Flat);
    }

    #[test]
    fn date_bounds_alone_keep_grouped_view() {
        let mut f = FilterState::default();
        f.set_date_from(NaiveDate::from_ymd_opt(2024, 5, 1));
        assert!(f.is_filtered());
        assert_eq!(f.view_mode(), ViewMode::Grouped);

        let mut f = FilterState::default();
        f.set_time_range(Some(TimeRange::Today));
        assert!(f.is_filtered());
        assert_eq!(f.view_mode(), ViewMode::Grouped);
    }

    #[test]
    fn named_and_explicit_ranges_are_mutually_exclusive() {
        let mut f = FilterState::default();
        f.set_date_from(NaiveDate::from_ymd_opt(2024, 5, 1));
        f.set_date_to(NaiveDate::from_ymd_opt(2024, 5, 7));
        f.set_time_range(Some(TimeRange::Today));
        assert_eq!(f.time_range(), Some(TimeRange::Today));
        assert_eq!(f.date_from(), None);
        assert_eq!(f.date_to(), None);

        f.set_date_from(NaiveDate::from_ymd_opt(2024, 5, 2));
        assert_eq!(f.time_range(), None);
        assert_eq!(f.date_from(), NaiveDate::from_ymd_opt(2024, 5, 2));
    }
}
