//! Error type shared by the containers, the configuration layer and the loader.

use thiserror::Error;

/// Everything that can go wrong while configuring, loading or filling an index.
///
/// A missing bid is never an error: lookups return `None` and removing an
/// unknown id is a no-op.
#[derive(Error, Debug)]
pub enum IndexError {
    /// The id could not be turned into a numeric hash key.
    #[error("bid id `{0}` is not a numeric key")]
    InvalidKey(String),
    /// A hash table needs at least one bucket.
    #[error("table size must be greater than zero")]
    ZeroTableSize,
    /// The amount column did not hold a number once the currency symbol was stripped.
    #[error("amount `{0}` is not a number")]
    InvalidAmount(String),
    /// A data row is missing one of the columns the layout asks for.
    #[error("row {line} has {found} columns, expected at least {expected}")]
    MalformedRow {
        /// 1-based line number in the source.
        line: usize,
        /// Number of columns found on the line.
        found: usize,
        /// Number of columns the layout needs.
        expected: usize,
    },
    /// A configuration value was not recognised.
    #[error("unknown value `{value}` for {setting}")]
    UnknownSetting {
        /// Name of the setting being parsed.
        setting: &'static str,
        /// The rejected value.
        value: String,
    },
    /// A computed bucket fell outside the table.
    #[error("bucket {index} is outside a table of {table_size} buckets")]
    BucketOutOfRange {
        /// The computed bucket index.
        index: usize,
        /// Number of buckets in the table.
        table_size: usize,
    },
    /// Reading the bid source failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
