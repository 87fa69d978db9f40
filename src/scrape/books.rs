//! Book extractor and scrape loop
//!
//! Catalogue pages carry repeated `article.product_pod` blocks. The title is
//! required for an item; every other field falls back to a default so one
//! missing field never invalidates the whole item. Each item's description
//! comes from a secondary detail-page fetch and degrades to an empty string
//! on any failure.

use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use url::Url;

use crate::records::BookRecord;
use crate::scrape::fetcher::{DetailFetcher, Fetcher};
use crate::scrape::html::{parse_price, resolve_url, select_text};

/// A book parsed from the listing page, before the detail fetch
struct ParsedBook {
    record: BookRecord,
    detail_url: Option<String>,
}

/// Scrapes every configured book URL in order
///
/// A URL whose fetch fails is skipped with a log; the politeness delay
/// applies between consecutive URLs and is skipped after the final one.
pub(crate) async fn scrape(fetcher: &Fetcher, urls: &[String], delay: Duration) -> Vec<BookRecord> {
    let mut all_books = Vec::new();

    for (i, url) in urls.iter().enumerate() {
        tracing::info!("scraping books from {}", url);

        if let Some(html) = fetcher.fetch(url).await {
            let records = extract_books(&html, url, fetcher).await;
            tracing::debug!("extracted {} books from {}", records.len(), url);
            all_books.extend(records);
        } else {
            tracing::warn!("skipping {}: fetch failed", url);
        }

        if i + 1 < urls.len() {
            tokio::time::sleep(delay).await;
        }
    }

    all_books
}

/// Extracts book records from a catalogue page, in document order
///
/// An item that cannot be parsed is dropped with a logged warning; the loop
/// continues with the next item. Never fails as a whole.
pub async fn extract_books(
    html: &str,
    source_url: &str,
    details: &impl DetailFetcher,
) -> Vec<BookRecord> {
    // Parse the full listing before any detail fetch so the document does
    // not live across an await point.
    let mut parsed = parse_listing(html, source_url);

    for book in &mut parsed {
        if let Some(detail_url) = &book.detail_url {
            book.record.description = fetch_description(details, detail_url).await;
        }
    }

    parsed.into_iter().map(|book| book.record).collect()
}

fn parse_listing(html: &str, source_url: &str) -> Vec<ParsedBook> {
    let document = Html::parse_document(html);

    let Ok(item_selector) = Selector::parse("article.product_pod") else {
        return Vec::new();
    };

    let category = category_from_url(source_url);
    let mut books = Vec::new();

    for element in document.select(&item_selector) {
        match parse_book(element, source_url, &category) {
            Ok(book) => books.push(book),
            Err(reason) => tracing::warn!("skipping book item: {}", reason),
        }
    }

    books
}

/// Parses one `article.product_pod` block
fn parse_book(
    element: ElementRef<'_>,
    source_url: &str,
    category: &str,
) -> Result<ParsedBook, String> {
    let anchor = Selector::parse("h3 a")
        .ok()
        .and_then(|sel| element.select(&sel).next())
        .ok_or_else(|| "missing title anchor".to_string())?;

    let title = anchor
        .value()
        .attr("title")
        .map(str::to_string)
        .ok_or_else(|| "missing title attribute".to_string())?;

    let price = select_text(&element, "p.price_color")
        .map(|text| parse_price(&text))
        .unwrap_or(0.0);

    let rating = rating_word(&element).unwrap_or_else(|| "N/A".to_string());

    let availability = select_text(&element, "p.instock.availability").unwrap_or_default();

    let detail_url = anchor
        .value()
        .attr("href")
        .and_then(|href| resolve_url(source_url, href));

    let record = BookRecord {
        title,
        price,
        rating,
        availability,
        category: category.to_string(),
        url: detail_url.clone().unwrap_or_else(|| source_url.to_string()),
        description: String::new(),
    };

    Ok(ParsedBook { record, detail_url })
}

/// Rating word from the second class of `p.star-rating`
/// ("star-rating Three" -> "Three")
fn rating_word(element: &ElementRef<'_>) -> Option<String> {
    let sel = Selector::parse("p.star-rating").ok()?;
    element
        .select(&sel)
        .next()?
        .value()
        .classes()
        .find(|class| *class != "star-rating")
        .map(str::to_string)
}

/// Category is the second-to-last path segment of the source URL
/// (".../category/books/travel_2/index.html" -> "travel_2")
fn category_from_url(source_url: &str) -> String {
    Url::parse(source_url)
        .ok()
        .and_then(|url| {
            url.path_segments().and_then(|segments| {
                let segments: Vec<_> = segments.filter(|s| !s.is_empty()).collect();
                (segments.len() >= 2).then(|| segments[segments.len() - 2].to_string())
            })
        })
        .unwrap_or_else(|| "unknown".to_string())
}

async fn fetch_description(details: &impl DetailFetcher, url: &str) -> String {
    match details.fetch_detail(url).await {
        Some(html) => extract_description(&html),
        None => String::new(),
    }
}

/// Pulls `meta[name=description]` content from a detail page
fn extract_description(html: &str) -> String {
    let document = Html::parse_document(html);

    Selector::parse("meta[name='description']")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .and_then(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Detail fetcher that always fails
    struct NoDetails;

    impl DetailFetcher for NoDetails {
        async fn fetch_detail(&self, _url: &str) -> Option<String> {
            None
        }
    }

    /// Detail fetcher that returns the same page for every URL
    struct CannedDetails(&'static str);

    impl DetailFetcher for CannedDetails {
        async fn fetch_detail(&self, _url: &str) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    const SOURCE_URL: &str = "https://example.com/catalogue/category/travel_2/index.html";

    fn book_block(title: &str, price: &str) -> String {
        format!(
            r#"<article class="product_pod">
                <h3><a href="book_1/index.html" title="{}">{}</a></h3>
                <p class="star-rating Three"></p>
                <p class="price_color">{}</p>
                <p class="instock availability">In stock</p>
            </article>"#,
            title, title, price
        )
    }

    #[tokio::test]
    async fn test_extract_books_in_document_order() {
        let html = format!(
            "<html><body>{}{}</body></html>",
            book_block("First", "£10.00"),
            book_block("Second", "£20.00")
        );

        let books = extract_books(&html, SOURCE_URL, &NoDetails).await;
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].title, "First");
        assert_eq!(books[1].title, "Second");
        assert_eq!(books[0].price, 10.0);
        assert_eq!(books[0].rating, "Three");
        assert_eq!(books[0].availability, "In stock");
        assert_eq!(books[0].category, "travel_2");
        assert_eq!(
            books[0].url,
            "https://example.com/catalogue/category/travel_2/book_1/index.html"
        );
    }

    #[tokio::test]
    async fn test_malformed_item_is_skipped() {
        // The middle block has no title anchor
        let html = format!(
            r#"<html><body>
                {}
                <article class="product_pod"><p class="price_color">£5.00</p></article>
                {}
            </body></html>"#,
            book_block("First", "£10.00"),
            book_block("Third", "£30.00")
        );

        let books = extract_books(&html, SOURCE_URL, &NoDetails).await;
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].title, "First");
        assert_eq!(books[1].title, "Third");
    }

    #[tokio::test]
    async fn test_missing_price_defaults_to_zero() {
        let html = r#"<html><body>
            <article class="product_pod">
                <h3><a href="book_1/index.html" title="No Price">No Price</a></h3>
            </article>
        </body></html>"#;

        let books = extract_books(html, SOURCE_URL, &NoDetails).await;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].price, 0.0);
        assert_eq!(books[0].rating, "N/A");
        assert_eq!(books[0].availability, "");
    }

    #[tokio::test]
    async fn test_description_from_detail_page() {
        let detail =
            r#"<html><head><meta name="description" content="A fine travel book."></head></html>"#;
        let html = format!("<html><body>{}</body></html>", book_block("First", "£10.00"));

        let books = extract_books(&html, SOURCE_URL, &CannedDetails(detail)).await;
        assert_eq!(books[0].description, "A fine travel book.");
    }

    #[tokio::test]
    async fn test_detail_fetch_failure_degrades_to_empty() {
        let html = format!("<html><body>{}</body></html>", book_block("First", "£10.00"));

        let books = extract_books(&html, SOURCE_URL, &NoDetails).await;
        assert_eq!(books[0].description, "");
    }

    #[tokio::test]
    async fn test_empty_page_yields_no_books() {
        let books = extract_books("<html><body></body></html>", SOURCE_URL, &NoDetails).await;
        assert!(books.is_empty());
    }

    #[test]
    fn test_category_from_url() {
        assert_eq!(category_from_url(SOURCE_URL), "travel_2");
        assert_eq!(category_from_url("https://example.com/"), "unknown");
        assert_eq!(category_from_url("not a url"), "unknown");
    }

    #[test]
    fn test_extract_description_missing_meta() {
        assert_eq!(extract_description("<html><head></head></html>"), "");
    }
}
