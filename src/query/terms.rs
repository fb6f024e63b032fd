//! Terms predicate builder.

use crate::error::{PilumError, Result};
use crate::query::predicate::{PredicateKind, ScoreOptions, SearchPredicate};
use crate::query::query::SearchPredicateBuilder;
use crate::schema::field::FieldDescriptor;
use crate::value::FieldValue;

/// Builder for a predicate matching any, or all, of a set of terms.
#[derive(Debug, Clone)]
pub struct TermsPredicateBuilder {
    field: FieldDescriptor,
    terms: Vec<FieldValue>,
    match_all: bool,
    score: ScoreOptions,
}

impl TermsPredicateBuilder {
    /// Create a builder targeting the given field.
    pub fn new(field: FieldDescriptor) -> Self {
        TermsPredicateBuilder {
            field,
            terms: Vec::new(),
            match_all: false,
            score: ScoreOptions::default(),
        }
    }

    /// Match documents containing any of the terms.
    pub fn matching_any(&mut self, terms: Vec<FieldValue>) -> Result<()> {
        self.set_terms(terms, false)
    }

    /// Match documents containing all of the terms.
    pub fn matching_all(&mut self, terms: Vec<FieldValue>) -> Result<()> {
        self.set_terms(terms, true)
    }

    fn set_terms(&mut self, terms: Vec<FieldValue>, match_all: bool) -> Result<()> {
        if terms.is_empty() {
            return Err(PilumError::invalid_argument(format!(
                "at least one term is required for field '{}'",
                self.field.path()
            )));
        }
        self.terms = terms
            .into_iter()
            .map(|term| self.field.convert(term))
            .collect::<Result<Vec<_>>>()?;
        self.match_all = match_all;
        Ok(())
    }
}

impl SearchPredicateBuilder for TermsPredicateBuilder {
    fn boost(&mut self, boost: f32) {
        self.score.boost = Some(boost);
    }

    fn constant_score(&mut self) {
        self.score.constant_score = true;
    }

    fn build(self) -> Result<SearchPredicate> {
        if self.terms.is_empty() {
            return Err(PilumError::invalid_argument(format!(
                "no terms for field '{}'",
                self.field.path()
            )));
        }

        Ok(SearchPredicate::new(
            PredicateKind::Terms {
                field: self.field.path().to_string(),
                terms: self.terms,
                match_all: self.match_all,
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
    fn test_terms_rendering() {
        let field = FieldDescriptor::new("tags", FieldKind::Keyword);

        let mut any = TermsPredicateBuilder::new(field.clone());
        any.matching_any(vec!["a".into(), "b".into()]).unwrap();
        assert_eq!(any.build().unwrap().to_string(), "tags:(a b)");

        let mut all = TermsPredicateBuilder::new(field);
        all.matching_all(vec!["a".into(), "b".into()]).unwrap();
        assert_eq!(all.build().unwrap().to_string(), "tags:(+a +b)");
    }

    #[test]
    fn test_empty_terms() {
        let mut builder = TermsPredicateBuilder::new(FieldDescriptor::new("tags", FieldKind::Keyword));
        assert!(builder.matching_any(Vec::new()).is_err());
    }
}
