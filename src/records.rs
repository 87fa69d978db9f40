//! Domain records produced by the extractors
//!
//! A record is one structured item extracted from a page. Each target has its
//! own record schema; a batch binds a record vector to the target it came
//! from so persistence and export can dispatch on it.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::SiftError;

/// A named category of content to scrape
///
/// The string form doubles as the store table name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    Books,
    Products,
}

impl Target {
    /// All known targets, in the fixed run order
    pub const ALL: [Target; 2] = [Target::Books, Target::Products];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Books => "books",
            Self::Products => "products",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "books" => Ok(Self::Books),
            "products" => Ok(Self::Products),
            other => Err(SiftError::UnknownTarget(other.to_string())),
        }
    }
}

/// One book extracted from a catalogue page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookRecord {
    pub title: String,
    pub price: f64,
    pub rating: String,
    pub availability: String,
    pub category: String,
    pub url: String,
    pub description: String,
}

/// One product extracted from a listing page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub rating: f64,
    pub reviews: i64,
    pub category: String,
    pub url: String,
}

/// The records accumulated by one target's scrape
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapedBatch {
    Books(Vec<BookRecord>),
    Products(Vec<ProductRecord>),
}

impl ScrapedBatch {
    /// An empty batch for the given target
    pub fn empty(target: Target) -> Self {
        match target {
            Target::Books => Self::Books(Vec::new()),
            Target::Products => Self::Products(Vec::new()),
        }
    }

    /// The target this batch belongs to
    pub fn target(&self) -> Target {
        match self {
            Self::Books(_) => Target::Books,
            Self::Products(_) => Target::Products,
        }
    }

    /// Number of records in the batch
    pub fn len(&self) -> usize {
        match self {
            Self::Books(records) => records.len(),
            Self::Products(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
