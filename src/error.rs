//! Error types for the Pilum library.
//!
//! All failures raised while declaring a schema or composing a predicate are
//! represented by the [`PilumError`] enum. Errors are returned at the exact
//! call that violates an invariant; nothing is logged and swallowed.
//!
//! # Examples
//!
//! ```
//! use pilum::error::{PilumError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(PilumError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Pilum operations.
#[derive(Error, Debug)]
pub enum PilumError {
    /// I/O errors (reading schema or query files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Schema-related errors (invalid field declarations, duplicate fields).
    #[error("Schema error: {0}")]
    Schema(String),

    /// The field path does not exist in the schema.
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    /// The field exists but cannot be used with the requested predicate kind.
    #[error("Cannot use '{predicate}' predicate on field '{field}': the field does not support it")]
    UnsupportedPredicate {
        /// Absolute path of the field.
        field: String,
        /// Name of the predicate kind that was attempted.
        predicate: String,
    },

    /// A per-field boost was combined with constant score.
    #[error(
        "Invalid use of per-field boost: the predicate score is constant. \
         Cannot assign a different boost to each field when the predicate score is constant \
         (field boost: {boost})"
    )]
    ContradictoryBoost {
        /// The offending per-field boost.
        boost: f32,
    },

    /// Fuzzy-match parameters outside their legal range.
    #[error(
        "Invalid fuzzy parameters: maximum edit distance must be between 0 and 2 \
         and exact prefix length must be positive or zero (got max edit distance {max_edit_distance}, \
         exact prefix length {exact_prefix_length})"
    )]
    InvalidFuzzy {
        /// Requested maximum edit distance.
        max_edit_distance: i32,
        /// Requested exact prefix length.
        exact_prefix_length: i32,
    },

    /// Negative phrase slop.
    #[error("Invalid slop: {0}. The slop must be positive or zero")]
    InvalidSlop(i32),

    /// Range predicate with both bounds unbounded.
    #[error("Invalid range: cannot match null value. Both bounds are null for field(s) [{}]", .fields.join(", "))]
    NullRange {
        /// Every field targeted by the affected field sets.
        fields: Vec<String>,
    },

    /// Resolved minimum-should-match outside `[1, total]`.
    #[error(
        "Computed minimum for minimumShouldMatch constraint is out of bounds: \
         expected a number between 1 and {total}, got {minimum}"
    )]
    MinimumShouldMatchOutOfBounds {
        /// The computed minimum.
        minimum: i64,
        /// The number of optional clauses.
        total: i32,
    },

    /// A rewrite method was used with a mismatched parameter.
    #[error("Invalid rewrite method '{method}': {reason}")]
    RewriteMethodMismatch {
        /// The rewrite method name.
        method: String,
        /// Description of the mismatch.
        reason: String,
    },

    /// A value cannot be converted to the type of the target field.
    #[error("Unable to convert value '{value}' for field '{field}' of type '{field_type}'")]
    ValueConversion {
        /// The absolute field path.
        field: String,
        /// The field type name.
        field_type: String,
        /// The rejected value, as text.
        value: String,
    },

    /// A boolean predicate has more clauses than allowed.
    #[error("Too many clauses in boolean predicate: {count} > {max}")]
    TooManyClauses {
        /// Number of clauses.
        count: usize,
        /// Configured limit.
        max: usize,
    },

    /// A multi-field predicate was finalized without any field.
    #[error("Invalid predicate: no field was declared before finalizing the predicate")]
    NoFieldSet,

    /// No named predicate registered under this path.
    #[error("Unknown named predicate '{0}'")]
    UnknownNamedPredicate(String),

    /// JSON query DSL parse errors.
    #[error("Query parse error: {0}")]
    QueryParse(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic anyhow error.
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with PilumError.
pub type Result<T> = std::result::Result<T, PilumError>;

impl PilumError {
    /// Create a new schema error.
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        PilumError::Schema(msg.into())
    }

    /// Create a new unknown field error.
    pub fn unknown_field<S: Into<String>>(field: S) -> Self {
        PilumError::UnknownField(field.into())
    }

    /// Create a new unsupported predicate error.
    pub fn unsupported_predicate<F: Into<String>, P: Into<String>>(field: F, predicate: P) -> Self {
        PilumError::UnsupportedPredicate {
            field: field.into(),
            predicate: predicate.into(),
        }
    }

    /// Create a new query parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        PilumError::QueryParse(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        PilumError::InvalidArgument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = PilumError::schema("Test schema error");
        assert_eq!(error.to_string(), "Schema error: Test schema error");

        let error = PilumError::unsupported_predicate("title", "range");
        assert_eq!(
            error.to_string(),
            "Cannot use 'range' predicate on field 'title': the field does not support it"
        );
    }

    #[test]
    fn test_minimum_should_match_message() {
        let error = PilumError::MinimumShouldMatchOutOfBounds {
            minimum: 3,
            total: 1,
        };
        assert!(
            error
                .to_string()
                .contains("expected a number between 1 and 1, got 3")
        );
    }

    #[test]
    fn test_null_range_names_every_field() {
        let error = PilumError::NullRange {
            fields: vec!["price".to_string(), "discount".to_string()],
        };
        assert!(error.to_string().contains("[price, discount]"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let pilum_error = PilumError::from(io_error);

        match pilum_error {
            PilumError::Io(_) => {}
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_provider_errors_convert_from_anyhow() {
        fn provider() -> Result<()> {
            let since: i64 = "last year"
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid 'since' parameter: {e}"))?;
            assert!(since > 0);
            Ok(())
        }

        match provider() {
            Err(err @ PilumError::Anyhow(_)) => {
                assert!(err.to_string().contains("invalid 'since' parameter"))
            }
            other => panic!("Expected anyhow error, got {other:?}"),
        }
    }
}
