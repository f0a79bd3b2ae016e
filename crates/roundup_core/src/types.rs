use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Canonical ordered category list. Grouped-view sections are emitted in
/// this order; the "All Topics" pseudo-entry of the UI is not part of it.
pub const TOPICS: &[&str] = &[
    "Reproductive Rights",
    "Gender Pay Gap",
    "LGBTQIA+",
    "Immigration",
    "Human Rights",
    "Health & Medicine",
    "Law & Policy",
    "Politics & Government",
    "Culture & Media",
    "Sports",
    "Violence & Safety",
    "Workplace & Economics",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    /// Globally unique; the join key for the image cache and bookmarks.
    pub link: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub source: String,
    /// Comma-joined topic labels, first entry is the primary topic.
    #[serde(default)]
    pub topics: String,
    pub scraped_at: DateTime<Utc>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_paywalled: bool,
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_locale() -> String {
    "en".to_string()
}

impl Article {
    /// First entry of the topic list, or `None` for a topicless article.
    pub fn primary_topic(&self) -> Option<&str> {
        self.topics
            .split(',')
            .next()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Publication timestamp, falling back to the ingestion timestamp.
    pub fn effective_date(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(self.scraped_at)
    }
}

/// Aggregate catalog counts from `GET /api/stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub total: i64,
    #[serde(default)]
    pub last_scraped: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    De,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::De => "de",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Locale::En),
            "de" => Ok(Locale::De),
            other => Err(Error::UnknownLocale(other.to_string())),
        }
    }
}
