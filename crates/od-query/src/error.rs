//! Error types for od-query.
//!
//! All variants are construction-time failures: a malformed lookup can never
//! make it into a `Q` tree, which is what keeps rendering infallible.

/// Result type alias for od-query operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for filter-expression construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Neither sub-expressions nor lookup conditions were provided.
    #[error("no conditions provided")]
    NoConditions,

    /// The lookup names an operator outside the supported set.
    #[error("unsupported operator '{operator}' in lookup '{lookup}'")]
    UnsupportedOperator { operator: String, lookup: String },

    /// The lookup names an annotation outside the supported set.
    #[error("unsupported annotation '{annotation}' in lookup '{lookup}'")]
    UnsupportedAnnotation { annotation: String, lookup: String },

    /// The lookup is structurally malformed.
    #[error("invalid lookup '{lookup}': {reason}")]
    InvalidLookup { lookup: String, reason: String },
}
