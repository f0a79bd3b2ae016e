use scraper::{Html, Selector};

/// Scan article-page markup for a preview image: the `og:image` meta tag
/// first, `twitter:image` as fallback.
pub fn extract_preview_image(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    meta_content(&document, r#"meta[property="og:image"]"#)
        .or_else(|| meta_content(&document, r#"meta[name="twitter:image"]"#))
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .find(|content| !content.is_empty())
        .map(str::to_string)
}
