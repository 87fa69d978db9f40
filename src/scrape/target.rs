//! Target dispatch for the scrape engine

use std::time::Duration;

use crate::records::{ScrapedBatch, Target};
use crate::scrape::fetcher::Fetcher;
use crate::scrape::{books, products};

/// Drives one target's full crawl over its configured URL list
///
/// URLs are visited in order; a failed fetch skips that URL without
/// aborting the target's run, and the politeness delay applies between
/// consecutive URLs. The returned batch may be empty; that is a valid
/// result, not an error.
pub async fn scrape_target(
    fetcher: &Fetcher,
    target: Target,
    urls: &[String],
    delay: Duration,
) -> ScrapedBatch {
    match target {
        Target::Books => ScrapedBatch::Books(books::scrape(fetcher, urls, delay).await),
        Target::Products => ScrapedBatch::Products(products::scrape(fetcher, urls, delay).await),
    }
}
