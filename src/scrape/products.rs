//! Product extractor and scrape loop
//!
//! Listing pages carry repeated `div.thumbnail` blocks. Every product field
//! has a default, so a sparse block still yields a record.

use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use url::Url;

use crate::records::ProductRecord;
use crate::scrape::fetcher::Fetcher;
use crate::scrape::html::{parse_price, resolve_url, select_text};

/// Scrapes every configured product URL in order
///
/// A URL whose fetch fails is skipped with a log; the politeness delay
/// applies between consecutive URLs and is skipped after the final one.
pub(crate) async fn scrape(
    fetcher: &Fetcher,
    urls: &[String],
    delay: Duration,
) -> Vec<ProductRecord> {
    let mut all_products = Vec::new();

    for (i, url) in urls.iter().enumerate() {
        tracing::info!("scraping products from {}", url);

        if let Some(html) = fetcher.fetch(url).await {
            let records = extract_products(&html, url);
            tracing::debug!("extracted {} products from {}", records.len(), url);
            all_products.extend(records);
        } else {
            tracing::warn!("skipping {}: fetch failed", url);
        }

        if i + 1 < urls.len() {
            tokio::time::sleep(delay).await;
        }
    }

    all_products
}

/// Extracts product records from a listing page, in document order
pub fn extract_products(html: &str, source_url: &str) -> Vec<ProductRecord> {
    let document = Html::parse_document(html);

    let Ok(item_selector) = Selector::parse("div.thumbnail") else {
        return Vec::new();
    };

    let category = category_from_url(source_url);

    document
        .select(&item_selector)
        .map(|element| parse_product(element, source_url, &category))
        .collect()
}

/// Parses one `div.thumbnail` block; every field has a default
fn parse_product(element: ElementRef<'_>, source_url: &str, category: &str) -> ProductRecord {
    let title_anchor = Selector::parse("a.title")
        .ok()
        .and_then(|sel| element.select(&sel).next());

    let name = title_anchor
        .map(|anchor| anchor.text().collect::<String>().trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "N/A".to_string());

    let price = select_text(&element, "h4.price")
        .map(|text| parse_price(&text))
        .unwrap_or(0.0);

    let description = select_text(&element, "p.description").unwrap_or_default();

    let rating = data_rating(&element).unwrap_or(0.0);

    // Review counts read "14 reviews"; take the leading integer
    let reviews = select_text(&element, "p.review-count")
        .and_then(|text| {
            text.split_whitespace()
                .next()
                .and_then(|count| count.parse().ok())
        })
        .unwrap_or(0);

    let url = title_anchor
        .and_then(|anchor| anchor.value().attr("href"))
        .and_then(|href| resolve_url(source_url, href))
        .unwrap_or_else(|| source_url.to_string());

    ProductRecord {
        name,
        price,
        description,
        rating,
        reviews,
        category: category.to_string(),
        url,
    }
}

/// Numeric rating from the `data-rating` attribute
fn data_rating(element: &ElementRef<'_>) -> Option<f64> {
    let sel = Selector::parse("p[data-rating]").ok()?;
    element
        .select(&sel)
        .next()?
        .value()
        .attr("data-rating")?
        .parse()
        .ok()
}

/// Category is the last path segment of the source URL
/// (".../e-commerce/allinone/computers" -> "computers")
fn category_from_url(source_url: &str) -> String {
    Url::parse(source_url)
        .ok()
        .and_then(|url| {
            url.path_segments().and_then(|segments| {
                segments
                    .filter(|s| !s.is_empty())
                    .last()
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| "unknown".to_string())
}
