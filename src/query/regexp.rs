//! Regular expression predicate builder.

use std::collections::BTreeSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PilumError, Result};
use crate::query::predicate::{PredicateKind, ScoreOptions, SearchPredicate};
use crate::query::query::SearchPredicateBuilder;
use crate::schema::field::FieldDescriptor;

/// Optional syntax enabled in a regexp pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegexpQueryFlag {
    /// `<1-10>` numeric intervals.
    Interval,
    /// `&` intersection of two expressions.
    Intersection,
    /// `@` matching any string.
    AnyString,
}

impl RegexpQueryFlag {
    /// Parse a flag name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "INTERVAL" => Some(RegexpQueryFlag::Interval),
            "INTERSECTION" => Some(RegexpQueryFlag::Intersection),
            "ANYSTRING" | "ANY_STRING" => Some(RegexpQueryFlag::AnyString),
            _ => None,
        }
    }
}

/// Builder for a regexp predicate on one field.
#[derive(Debug, Clone)]
pub struct RegexpPredicateBuilder {
    field: FieldDescriptor,
    pattern: Option<String>,
    flags: BTreeSet<RegexpQueryFlag>,
    score: ScoreOptions,
}

impl RegexpPredicateBuilder {
    /// Create a builder targeting the given field.
    pub fn new(field: FieldDescriptor) -> Self {
        RegexpPredicateBuilder {
            field,
            pattern: None,
            flags: BTreeSet::new(),
            score: ScoreOptions::default(),
        }
    }

    /// Set the pattern.
    pub fn pattern(&mut self, pattern: &str) {
        self.pattern = Some(pattern.to_string());
    }

    /// Enable optional syntax.
    pub fn flags(&mut self, flags: impl IntoIterator<Item = RegexpQueryFlag>) {
        self.flags.extend(flags);
    }
}

impl SearchPredicateBuilder for RegexpPredicateBuilder {
    fn boost(&mut self, boost: f32) {
        self.score.boost = Some(boost);
    }

    fn constant_score(&mut self) {
        self.score.constant_score = true;
    }

    fn build(self) -> Result<SearchPredicate> {
        let pattern = self.pattern.ok_or_else(|| {
            PilumError::invalid_argument(format!("no regexp for field '{}'", self.field.path()))
        })?;

        // Optional syntax is not understood by the validator.
        if self.flags.is_empty() {
            Regex::new(&pattern).map_err(|e| {
                PilumError::invalid_argument(format!(
                    "invalid regexp '{pattern}' for field '{}': {e}",
                    self.field.path()
                ))
            })?;
        }

        Ok(SearchPredicate::new(
            PredicateKind::Regexp {
                field: self.field.path().to_string(),
                pattern,
                flags: self.flags,
            },
            self.score,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::field::FieldKind;

    #[test]
    fn test_regexp() {
        let mut builder = RegexpPredicateBuilder::new(FieldDescriptor::new("code", FieldKind::Keyword));
        builder.pattern("ab[0-9]+");
        assert_eq!(builder.build().unwrap().to_string(), "code:/ab[0-9]+/");
    }

    #[test]
    fn test_invalid_pattern() {
        let mut builder = RegexpPredicateBuilder::new(FieldDescriptor::new("code", FieldKind::Keyword));
        builder.pattern("ab[");
        assert!(builder.build().is_err());
    }

    #[test]
    fn test_flags() {
        assert_eq!(
            RegexpQueryFlag::from_name("anystring"),
            Some(RegexpQueryFlag::AnyString)
        );
        let mut builder = RegexpPredicateBuilder::new(FieldDescriptor::new("code", FieldKind::Keyword));
        builder.flags([RegexpQueryFlag::Interval]);
        builder.pattern("<1-10>");
        assert!(builder.build().is_ok());
    }
}
