//! Configuration for predicate composition.

use serde::{Deserialize, Serialize};

/// Limits and defaults applied while composing predicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DslConfig {
    /// Maximum number of clauses a single boolean predicate may hold.
    pub max_clause_count: usize,

    /// Maximum edit distance used by `fuzzy()` without explicit parameters.
    pub default_fuzzy_max_edit_distance: i32,

    /// Exact prefix length used by `fuzzy()` without explicit parameters.
    pub default_fuzzy_exact_prefix_length: i32,
}

impl Default for DslConfig {
    fn default() -> Self {
        DslConfig {
            max_clause_count: 1024,
            default_fuzzy_max_edit_distance: 2,
            default_fuzzy_exact_prefix_length: 0,
        }
    }
}

impl DslConfig {
    /// Set the maximum clause count.
    pub fn with_max_clause_count(mut self, max_clause_count: usize) -> Self {
        self.max_clause_count = max_clause_count;
        self
    }
}
