//! Shared HTML field-extraction helpers for the target extractors

use scraper::{ElementRef, Selector};
use url::Url;

/// Text content of the first element matching `selector`, trimmed
pub(crate) fn select_text(element: &ElementRef<'_>, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    element
        .select(&sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parses a price like "£51.77" or "$1139.54" by stripping the leading
/// currency marker; anything unparseable is 0.0
pub(crate) fn parse_price(text: &str) -> f64 {
    text.trim_start_matches(|c: char| !c.is_ascii_digit())
        .parse()
        .unwrap_or(0.0)
}

/// Resolves an href against the page it appeared on
pub(crate) fn resolve_url(source_url: &str, href: &str) -> Option<String> {
    let base = Url::parse(source_url).ok()?;
    base.join(href).ok().map(|url| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_select_text() {
        let html = Html::parse_fragment(r#"<div><p class="price_color">  £51.77 </p></div>"#);
        let root = html.root_element();
        assert_eq!(
            select_text(&root, "p.price_color"),
            Some("£51.77".to_string())
        );
        assert_eq!(select_text(&root, "p.missing"), None);
    }

    #[test]
    fn test_select_text_empty_is_none() {
        let html = Html::parse_fragment(r#"<div><p class="note">   </p></div>"#);
        let root = html.root_element();
        assert_eq!(select_text(&root, "p.note"), None);
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("£51.77"), 51.77);
        assert_eq!(parse_price("$1139.54"), 1139.54);
        assert_eq!(parse_price("109.99"), 109.99);
    }

    #[test]
    fn test_parse_price_garbage_defaults_to_zero() {
        assert_eq!(parse_price("free"), 0.0);
        assert_eq!(parse_price(""), 0.0);
    }

    #[test]
    fn test_resolve_url() {
        assert_eq!(
            resolve_url("https://example.com/catalogue/page-1.html", "a-book_1/index.html"),
            Some("https://example.com/catalogue/a-book_1/index.html".to_string())
        );
        assert_eq!(
            resolve_url("https://example.com/catalogue/page-1.html", "../other.html"),
            Some("https://example.com/other.html".to_string())
        );
    }

    #[test]
    fn test_resolve_url_bad_base() {
        assert_eq!(resolve_url("not a url", "page.html"), None);
    }
}
