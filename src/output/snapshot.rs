//! CSV snapshots of in-memory record batches

use std::path::Path;

use crate::records::ScrapedBatch;
use crate::SiftError;

const BOOK_HEADER: [&str; 7] = [
    "title",
    "price",
    "rating",
    "availability",
    "category",
    "url",
    "description",
];

const PRODUCT_HEADER: [&str; 7] = [
    "name",
    "price",
    "description",
    "rating",
    "reviews",
    "category",
    "url",
];

/// Writes a batch's in-memory records to a CSV file
///
/// The header row is always written, so an empty batch produces a
/// header-only file. Any existing file at `path` is overwritten.
pub fn write_snapshot_csv(batch: &ScrapedBatch, path: &Path) -> Result<(), SiftError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    match batch {
        ScrapedBatch::Books(books) => {
            writer.write_record(BOOK_HEADER)?;
            for book in books {
                writer.serialize(book)?;
            }
        }
        ScrapedBatch::Products(products) => {
            writer.write_record(PRODUCT_HEADER)?;
            for product in products {
                writer.serialize(product)?;
            }
        }
    }

    writer.flush()?;
    tracing::info!("saved {} records to {}", batch.len(), path.display());

    Ok(())
}
