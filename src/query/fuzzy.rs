//! Fuzzy matching parameters.

use serde::{Deserialize, Serialize};

use crate::error::{PilumError, Result};

/// Largest edit distance a fuzzy match may allow.
pub const MAX_EDIT_DISTANCE: i32 = 2;

/// Approximate matching settings of a match predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fuzziness {
    /// Maximum Levenshtein distance between the query term and indexed terms.
    max_edit_distance: u32,
    /// Number of leading characters that must match exactly.
    exact_prefix_length: u32,
}

impl Fuzziness {
    /// Create validated fuzzy settings.
    ///
    /// `max_edit_distance` must be within `[0, 2]` and
    /// `exact_prefix_length` must be positive or zero.
    pub fn new(max_edit_distance: i32, exact_prefix_length: i32) -> Result<Self> {
        if !(0..=MAX_EDIT_DISTANCE).contains(&max_edit_distance) || exact_prefix_length < 0 {
            return Err(PilumError::InvalidFuzzy {
                max_edit_distance,
                exact_prefix_length,
            });
        }
        Ok(Fuzziness {
            max_edit_distance: max_edit_distance.unsigned_abs(),
            exact_prefix_length: exact_prefix_length.unsigned_abs(),
        })
    }

    /// Get the maximum edit distance.
    pub fn max_edit_distance(&self) -> u32 {
        self.max_edit_distance
    }

    /// Get the exact prefix length.
    pub fn exact_prefix_length(&self) -> u32 {
        self.exact_prefix_length
    }
}
