//! Wildcard predicate builder.
//!
//! `*` matches any character sequence and `?` matches one character.

use crate::error::{PilumError, Result};
use crate::query::predicate::{PredicateKind, ScoreOptions, SearchPredicate};
use crate::query::query::SearchPredicateBuilder;
use crate::schema::field::FieldDescriptor;

/// Builder for a wildcard predicate on one field.
#[derive(Debug, Clone)]
pub struct WildcardPredicateBuilder {
    field: FieldDescriptor,
    pattern: Option<String>,
    score: ScoreOptions,
}

impl WildcardPredicateBuilder {
    /// Create a builder targeting the given field.
    pub fn new(field: FieldDescriptor) -> Self {
        WildcardPredicateBuilder {
            field,
            pattern: None,
            score: ScoreOptions::default(),
        }
    }

    /// Set the pattern.
    pub fn pattern(&mut self, pattern: &str) -> Result<()> {
        if pattern.is_empty() {
            return Err(PilumError::invalid_argument(format!(
                "empty wildcard pattern for field '{}'",
                self.field.path()
            )));
        }
        self.pattern = Some(pattern.to_string());
        Ok(())
    }
}

impl SearchPredicateBuilder for WildcardPredicateBuilder {
    fn boost(&mut self, boost: f32) {
        self.score.boost = Some(boost);
    }

    fn constant_score(&mut self) {
        self.score.constant_score = true;
    }

    fn build(self) -> Result<SearchPredicate> {
        let pattern = self.pattern.ok_or_else(|| {
            PilumError::invalid_argument(format!("no pattern for field '{}'", self.field.path()))
        })?;

        Ok(SearchPredicate::new(
            PredicateKind::Wildcard {
                field: self.field.path().to_string(),
                pattern,
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
    fn test_wildcard() {
        let mut builder =
            WildcardPredicateBuilder::new(FieldDescriptor::new("title", FieldKind::Keyword));
        builder.pattern("ru?t*").unwrap();
        assert_eq!(builder.build().unwrap().to_string(), "title:ru?t*");

        let mut empty =
            WildcardPredicateBuilder::new(FieldDescriptor::new("title", FieldKind::Keyword));
        assert!(empty.pattern("").is_err());
    }
}
