use roundup_core::{Article, TOPICS};
use serde::Serialize;

use crate::filters::ViewMode;

/// Per-section preview cap in the grouped view.
pub const SECTION_PREVIEW: usize = 6;

/// One topic section of the grouped view, capped to [`SECTION_PREVIEW`]
/// articles. `overflow` drives the "more" control that switches to the
/// flat view pre-filtered to this topic.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub topic: String,
    pub articles: Vec<Article>,
    pub total_matches: usize,
    pub overflow: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedView {
    Grouped(Vec<Section>),
    Flat(Vec<Article>),
}

/// Split a fetched page into the shape the view layer renders. Flat keeps
/// the catalog's order untouched. Grouped buckets by primary topic in
/// taxonomy order; topicless articles land in no section and empty
/// sections are omitted.
pub fn partition(articles: &[Article], mode: ViewMode) -> FeedView {
    match mode {
        ViewMode::Flat => FeedView::Flat(articles.to_vec()),
        ViewMode::Grouped => {
            let mut sections = Vec::new();
            for &topic in TOPICS {
                let mut matches: Vec<Article> = articles
                    .iter()
                    .filter(|a| a.primary_topic() == Some(topic))
                    .cloned()
                    .collect();
                if matches.is_empty() {
                    continue;
                }
                let total_matches = matches.len();
                let overflow = total_matches > SECTION_PREVIEW;
                matches.truncate(SECTION_PREVIEW);
                sections.push(Section {
                    topic: topic.to_string(),
                    articles: matches,
                    total_matches,
                    overflow,
                });
            }
            FeedView::Grouped(sections)
        }
    }
}
