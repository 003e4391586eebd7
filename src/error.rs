//! Error handling for the aggregation pipeline
//!
//! One error enum shared by every component, so callers can match on the
//! failure class without caring which stage raised it.

use std::fmt;

/// Failure classes of the encode → encrypt → aggregate → decode pipeline.
#[derive(Debug)]
pub enum GenomicsError {
    /// Empty contributor set, or more contributors than the plaintext field
    /// can normalize
    InvalidAggregationInput(String),
    /// Vector length vs. catalog length, or mixed catalogs/contexts
    SchemaMismatch(String),
    /// Zero contributors reached decode
    EmptyAggregate,
    /// Non-positive or non-finite odds ratio, or otherwise unusable entry
    InvalidCatalogEntry(String),
    /// Malformed variant lookup key
    InvalidVariantSpecification(String),
    /// Encryption parameters rejected by validation
    InvalidParameters(String),
    /// Decrypted slots fall outside the range any honest round can produce
    CorruptCiphertext(String),
    /// Byte or JSON (de)serialization failure
    Serialization(String),
}

impl fmt::Display for GenomicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAggregationInput(msg) => write!(f, "invalid aggregation input: {}", msg),
            Self::SchemaMismatch(msg) => write!(f, "schema mismatch: {}", msg),
            Self::EmptyAggregate => write!(f, "aggregate has zero contributors"),
            Self::InvalidCatalogEntry(msg) => write!(f, "invalid catalog entry: {}", msg),
            Self::InvalidVariantSpecification(msg) => {
                write!(f, "invalid variant specification: {}", msg)
            }
            Self::InvalidParameters(msg) => write!(f, "invalid parameters: {}", msg),
            Self::CorruptCiphertext(msg) => write!(f, "corrupt ciphertext: {}", msg),
            Self::Serialization(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

impl std::error::Error for GenomicsError {}

impl From<std::io::Error> for GenomicsError {
    fn from(err: std::io::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for GenomicsError {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for GenomicsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for all library operations
pub type Result<T> = std::result::Result<T, GenomicsError>;

/// Build a `SchemaMismatch` with format string support
macro_rules! schema_err {
    ($($arg:tt)*) => {
        $crate::error::GenomicsError::SchemaMismatch(format!($($arg)*))
    };
}

pub(crate) use schema_err;
