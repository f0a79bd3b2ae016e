use roundup_core::{Locale, RequestParams};

use crate::filters::{FilterState, ViewMode};
use crate::pager::Pager;

/// Grouped view fetches one large page so every topic section can be
/// populated at once.
pub const GROUPED_LIMIT: usize = 120;

/// Translate the current filter state into catalog request parameters.
/// Total over all valid filter states; a default state emits only
/// `locale`, `limit` and `offset`.
pub fn compile(
    filters: &FilterState,
    locale: Locale,
    pager: &Pager,
    mode: ViewMode,
) -> RequestParams {
    let mut params = RequestParams::new();
    params.push("locale", locale.as_str());

    match mode {
        ViewMode::Grouped => {
            params.push("limit", GROUPED_LIMIT.to_string());
            params.push("offset", "0");
        }
        ViewMode::Flat => {
            params.push("limit", pager.page_size().to_string());
            params.push("offset", pager.offset().to_string());
        }
    }

    if !filters.topics.is_empty() {
        params.push("topics", filters.topics.join(","));
    }
    if !filters.sources.is_empty() {
        params.push("sources", filters.sources.join(","));
    }
    if !filters.search.is_empty() {
        params.push("search", filters.search.clone());
    }
    if let Some(range) = filters.time_range() {
        params.push("time", range.as_str());
    }
    if let Some(from) = filters.date_from() {
        params.push("date_from", from.format("%Y-%m-%d").to_string());
    }
    if let Some(to) = filters.date_to() {
        params.push("date_to", to.format("%Y-%m-%d").to_string());
    }
    if let Some(paywall) = filters.paywall.as_param() {
        params.push("paywall", paywall);
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{PaywallMode, TimeRange};
    use chrono::NaiveDate;

    #[test]
    fn default_request_stays_minimal() {
        let filters = FilterState::default();
        let pager = Pager::default();
        let params = compile(&filters, Locale::En, &pager, filters.view_mode());
        assert_eq!(
            params.pairs(),
            &[
                ("locale".to_string(), "en".to_string()),
                ("limit".to_string(), GROUPED_LIMIT.to_string()),
                ("offset".to_string(), "0".to_string()),
            ]
        );
    }

    #[test]
    fn flat_mode_pages_with_offset() {
        let mut filters = FilterState::default();
        filters.topics = vec!["Sports".to_string()];
        let mut pager = Pager::new(12);
        pager.set_total(60);
        pager.set_page(3);
        let params = compile(&filters, Locale::De, &pager, filters.view_mode());
        assert_eq!(params.get("locale"), Some("de"));
        assert_eq!(params.get("limit"), Some("12"));
        assert_eq!(params.get("offset"), Some("24"));
        assert_eq!(params.get("topics"), Some("Sports"));
    }

    #[test]
    fn non_default_fields_each_emit_one_param() {
        let mut filters = FilterState::default();
        filters.topics = vec!["Sports".to_string(), "Human Rights".to_string()];
        filters.sources = vec!["Wire".to_string()];
        filters.search = "court ruling".to_string();
        filters.paywall = PaywallMode::FreeOnly;
        filters.set_date_from(NaiveDate::from_ymd_opt(2024, 5, 1));
        filters.set_date_to(NaiveDate::from_ymd_opt(2024, 5, 7));

        let params = compile(&filters, Locale::En, &Pager::default(), filters.view_mode());
        assert_eq!(params.get("topics"), Some("Sports,Human Rights"));
        assert_eq!(params.get("sources"), Some("Wire"));
        assert_eq!(params.get("search"), Some("court ruling"));
        assert_eq!(params.get("date_from"), Some("2024-05-01"));
        assert_eq!(params.get("date_to"), Some("2024-05-07"));
        assert_eq!(params.get("paywall"), Some("free"));
        assert!(!params.contains("time"));
    }

    #[test]
    fn named_range_emits_time_not_dates() {
        let mut filters = FilterState::default();
        filters.set_time_range(Some(TimeRange::Today));
        let params = compile(&filters, Locale::En, &Pager::default(), filters.view_mode());
        assert_eq!(params.get("time"), Some("today"));
        assert!(!params.contains("date_from"));
        assert!(!params.contains("date_to"));
        // a date range alone keeps the grouped fetch shape
        assert_eq!(params.get("limit"), Some(&GROUPED_LIMIT.to_string()[..]));
    }

    #[test]
    fn paywalled_only_emits_paywalled() {
        let mut filters = FilterState::default();
        filters.paywall = PaywallMode::PaywalledOnly;
        let params = compile(&filters, Locale::En, &Pager::default(), filters.view_mode());
        assert_eq!(params.get("paywall"), Some("paywalled"));
    }
}
