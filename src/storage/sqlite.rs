//! SQLite store implementation
//!
//! This module provides a SQLite-based implementation of the Store trait.

use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

use crate::records::{ScrapedBatch, Target};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Store, StoreResult};
use crate::storage::{JobResult, JobStatus, RunStats, TargetStats};
use crate::SiftError;

/// SQLite store backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates the store database at the given path
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(SiftError)` - Failed to open database
    pub fn open(path: &Path) -> Result<Self, SiftError> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        // Initialize schema
        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, SiftError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl Store for SqliteStore {
    fn append_records(&mut self, batch: &ScrapedBatch) -> StoreResult<u64> {
        if batch.is_empty() {
            return Ok(0);
        }

        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        {
            match batch {
                ScrapedBatch::Books(books) => {
                    let mut stmt = tx.prepare(
                        "INSERT INTO books (title, price, rating, availability, category, url, description, scraped_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    )?;
                    for book in books {
                        stmt.execute(params![
                            book.title,
                            book.price,
                            book.rating,
                            book.availability,
                            book.category,
                            book.url,
                            book.description,
                            now
                        ])?;
                    }
                }
                ScrapedBatch::Products(products) => {
                    let mut stmt = tx.prepare(
                        "INSERT INTO products (name, price, description, rating, reviews, category, url, scraped_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    )?;
                    for product in products {
                        stmt.execute(params![
                            product.name,
                            product.price,
                            product.description,
                            product.rating,
                            product.reviews,
                            product.category,
                            product.url,
                            now
                        ])?;
                    }
                }
            }
        }
        tx.commit()?;

        Ok(batch.len() as u64)
    }

    fn append_log_entry(&mut self, entry: &JobResult) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO scrape_log (target, status, records_scraped, error_message, started_at, finished_at, duration_seconds)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.target,
                entry.status.to_db_string(),
                entry.records_scraped as i64,
                entry.error_message,
                entry.started_at,
                entry.finished_at,
                entry.duration_seconds
            ],
        )?;
        Ok(())
    }

    fn export_table(&self, target: Target, path: &Path) -> StoreResult<PathBuf> {
        let mut writer = csv::Writer::from_path(path)?;

        match target {
            Target::Books => {
                writer.write_record([
                    "id",
                    "title",
                    "price",
                    "rating",
                    "availability",
                    "category",
                    "url",
                    "description",
                    "scraped_at",
                ])?;

                let mut stmt = self.conn.prepare(
                    "SELECT id, title, price, rating, availability, category, url, description, scraped_at
                     FROM books ORDER BY id",
                )?;
                let rows = stmt.query_map([], |row| {
                    Ok([
                        row.get::<_, i64>(0)?.to_string(),
                        row.get::<_, String>(1)?,
                        row.get::<_, f64>(2)?.to_string(),
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                        row.get::<_, String>(7)?,
                        row.get::<_, String>(8)?,
                    ])
                })?;

                for row in rows {
                    writer.write_record(&row?)?;
                }
            }
            Target::Products => {
                writer.write_record([
                    "id",
                    "name",
                    "price",
                    "description",
                    "rating",
                    "reviews",
                    "category",
                    "url",
                    "scraped_at",
                ])?;

                let mut stmt = self.conn.prepare(
                    "SELECT id, name, price, description, rating, reviews, category, url, scraped_at
                     FROM products ORDER BY id",
                )?;
                let rows = stmt.query_map([], |row| {
                    Ok([
                        row.get::<_, i64>(0)?.to_string(),
                        row.get::<_, String>(1)?,
                        row.get::<_, f64>(2)?.to_string(),
                        row.get::<_, String>(3)?,
                        row.get::<_, f64>(4)?.to_string(),
                        row.get::<_, i64>(5)?.to_string(),
                        row.get::<_, String>(6)?,
                        row.get::<_, String>(7)?,
                        row.get::<_, String>(8)?,
                    ])
                })?;

                for row in rows {
                    writer.write_record(&row?)?;
                }
            }
        }

        writer.flush()?;
        tracing::info!("exported {} table to {}", target, path.display());

        Ok(path.to_path_buf())
    }

    fn get_stats(&self) -> StoreResult<RunStats> {
        let mut stats = RunStats::default();

        for target in Target::ALL {
            stats.per_target.insert(
                target,
                TargetStats {
                    total_records: self.count_records(target)?,
                    last_scraped_at: self.last_scraped_at(target)?,
                },
            );
        }

        let (successes, total): (i64, i64) = self.conn.query_row(
            "SELECT COUNT(CASE WHEN status = 'success' THEN 1 END), COUNT(*) FROM scrape_log",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        stats.total_runs = total as u64;
        stats.success_rate = if total > 0 {
            let rate = successes as f64 / total as f64 * 100.0;
            (rate * 100.0).round() / 100.0
        } else {
            0.0
        };

        Ok(stats)
    }

    fn count_records(&self, target: Target) -> StoreResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", target.as_str()),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn last_scraped_at(&self, target: Target) -> StoreResult<Option<String>> {
        let last: Option<String> = self.conn.query_row(
            &format!("SELECT MAX(scraped_at) FROM {}", target.as_str()),
            [],
            |row| row.get(0),
        )?;
        Ok(last)
    }

    fn recent_jobs(&self, limit: u32) -> StoreResult<Vec<JobResult>> {
        let mut stmt = self.conn.prepare(
            "SELECT target, status, records_scraped, error_message, started_at, finished_at, duration_seconds
             FROM scrape_log ORDER BY id DESC LIMIT ?1",
        )?;

        let jobs = stmt
            .query_map(params![limit], |row| {
                Ok(JobResult {
                    target: row.get(0)?,
                    status: JobStatus::from_db_string(&row.get::<_, String>(1)?)
                        .unwrap_or(JobStatus::Failed),
                    records_scraped: row.get::<_, i64>(2)? as u64,
                    error_message: row.get(3)?,
                    started_at: row.get(4)?,
                    finished_at: row.get(5)?,
                    duration_seconds: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(jobs)
    }

    fn count_log_entries(&self) -> StoreResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM scrape_log", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{BookRecord, ProductRecord};
    use chrono::Duration;

    fn sample_books(n: usize) -> ScrapedBatch {
        let books = (0..n)
            .map(|i| BookRecord {
                title: format!("Book {}", i),
                price: 10.0 + i as f64,
                rating: "Three".to_string(),
                availability: "In stock".to_string(),
                category: "fiction".to_string(),
                url: format!("https://example.com/book-{}", i),
                description: String::new(),
            })
            .collect();
        ScrapedBatch::Books(books)
    }

    fn sample_products(n: usize) -> ScrapedBatch {
        let products = (0..n)
            .map(|i| ProductRecord {
                name: format!("Product {}", i),
                price: 99.99,
                description: "A thing".to_string(),
                rating: 4.0,
                reviews: 3,
                category: "laptops".to_string(),
                url: format!("https://example.com/product-{}", i),
            })
            .collect();
        ScrapedBatch::Products(products)
    }

    fn sample_log_entry(target: &str, status: JobStatus, records: u64) -> JobResult {
        let started = Utc::now();
        JobResult::new(
            target,
            status,
            records,
            match status {
                JobStatus::Failed => Some("boom".to_string()),
                JobStatus::Success => None,
            },
            started,
            started + Duration::seconds(1),
        )
    }

    #[test]
    fn test_append_books_returns_count() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        let count = store.append_records(&sample_books(3)).unwrap();
        assert_eq!(count, 3);
        assert_eq!(store.count_records(Target::Books).unwrap(), 3);
        assert_eq!(store.count_records(Target::Products).unwrap(), 0);
    }

    #[test]
    fn test_append_empty_batch_is_not_an_error() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        let count = store
            .append_records(&ScrapedBatch::empty(Target::Products))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_append_sets_scraped_at() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        assert_eq!(store.last_scraped_at(Target::Books).unwrap(), None);

        store.append_records(&sample_books(1)).unwrap();
        assert!(store.last_scraped_at(Target::Books).unwrap().is_some());
    }

    #[test]
    fn test_log_entry_roundtrip() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        let entry = sample_log_entry("books", JobStatus::Failed, 0);
        store.append_log_entry(&entry).unwrap();

        let jobs = store.recent_jobs(10).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0], entry);
        assert_eq!(store.count_log_entries().unwrap(), 1);
    }

    #[test]
    fn test_recent_jobs_newest_first() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        store
            .append_log_entry(&sample_log_entry("books", JobStatus::Success, 5))
            .unwrap();
        store
            .append_log_entry(&sample_log_entry("products", JobStatus::Failed, 0))
            .unwrap();

        let jobs = store.recent_jobs(10).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].target, "products");
        assert_eq!(jobs[1].target, "books");
    }

    #[test]
    fn test_stats_success_rate() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        store
            .append_log_entry(&sample_log_entry("books", JobStatus::Success, 5))
            .unwrap();
        store
            .append_log_entry(&sample_log_entry("products", JobStatus::Success, 2))
            .unwrap();
        store
            .append_log_entry(&sample_log_entry("books", JobStatus::Failed, 0))
            .unwrap();

        let stats = store.get_stats().unwrap();
        assert_eq!(stats.total_runs, 3);
        assert_eq!(stats.success_rate, 66.67);
    }

    #[test]
    fn test_stats_empty_store() {
        let store = SqliteStore::new_in_memory().unwrap();
        let stats = store.get_stats().unwrap();

        assert_eq!(stats.total_runs, 0);
        assert_eq!(stats.success_rate, 0.0);
        let books = &stats.per_target[&Target::Books];
        assert_eq!(books.total_records, 0);
        assert_eq!(books.last_scraped_at, None);
    }

    #[test]
    fn test_stats_counts_per_target() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        store.append_records(&sample_books(2)).unwrap();
        store.append_records(&sample_products(4)).unwrap();

        let stats = store.get_stats().unwrap();
        assert_eq!(stats.per_target[&Target::Books].total_records, 2);
        assert_eq!(stats.per_target[&Target::Products].total_records, 4);
    }

    #[test]
    fn test_export_table_row_count_matches_persisted() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        let persisted = store.append_records(&sample_books(3)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books_latest.csv");
        let written = store.export_table(Target::Books, &path).unwrap();
        assert_eq!(written, path);

        let content = std::fs::read_to_string(&path).unwrap();
        let data_rows = content.lines().count() - 1; // minus header
        assert_eq!(data_rows as u64, persisted);
    }

    #[test]
    fn test_export_empty_table_writes_header_only() {
        let store = SqliteStore::new_in_memory().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products_latest.csv");
        store.export_table(Target::Products, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.starts_with("id,name,price"));
    }
}
