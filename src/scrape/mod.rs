//! Scrape engine: fetching, extraction, jobs, and run orchestration
//!
//! This module contains the core pipeline logic, including:
//! - HTTP fetching with bounded retries and exponential backoff
//! - Per-target extractors with per-item fault isolation
//! - The job lifecycle (fetch -> extract -> persist -> export -> log)
//! - Run-level orchestration and reporting

mod books;
mod fetcher;
mod html;
mod orchestrator;
mod products;
mod runner;
mod target;

pub use books::extract_books;
pub use fetcher::{build_http_client, DetailFetcher, FetchConfig, Fetcher};
pub use products::extract_products;
pub use runner::Pipeline;
pub use target::scrape_target;
