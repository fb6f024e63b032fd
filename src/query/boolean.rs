//! Boolean predicate for combining multiple predicates.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{PilumError, Result};
use crate::query::minimum_should_match::{
    MinimumShouldMatchBuilder, MinimumShouldMatchConstraints, MinimumShouldMatchRequirement,
};
use crate::query::predicate::{PredicateKind, ScoreOptions, SearchPredicate};
use crate::query::query::SearchPredicateBuilder;

/// Occurrence requirements for boolean clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Occur {
    /// The clause must match and contributes to the score.
    Must,
    /// The clause should match.
    Should,
    /// The clause must not match.
    MustNot,
    /// The clause must match and does not contribute to the score.
    Filter,
}

impl Occur {
    fn prefix(&self) -> &'static str {
        match self {
            Occur::Must => "+",
            Occur::Should => "",
            Occur::MustNot => "-",
            Occur::Filter => "#",
        }
    }
}

/// A built boolean predicate.
///
/// Clauses are kept grouped by occurrence and render in the order must,
/// should, must-not, filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BooleanPredicate {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    must: Vec<SearchPredicate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    should: Vec<SearchPredicate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    must_not: Vec<SearchPredicate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    filter: Vec<SearchPredicate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minimum_should_match: Option<i32>,
}

impl BooleanPredicate {
    /// The `must` clauses.
    pub fn must(&self) -> &[SearchPredicate] {
        &self.must
    }

    /// The `should` clauses.
    pub fn should(&self) -> &[SearchPredicate] {
        &self.should
    }

    /// The `must_not` clauses.
    pub fn must_not(&self) -> &[SearchPredicate] {
        &self.must_not
    }

    /// The `filter` clauses.
    pub fn filter(&self) -> &[SearchPredicate] {
        &self.filter
    }

    /// The resolved minimum number of `should` clauses that must match.
    pub fn minimum_should_match(&self) -> Option<i32> {
        self.minimum_should_match
    }

    /// Every clause with its occurrence, in rendering order.
    pub fn occurrences(&self) -> impl Iterator<Item = (Occur, &SearchPredicate)> {
        self.must
            .iter()
            .map(|p| (Occur::Must, p))
            .chain(self.should.iter().map(|p| (Occur::Should, p)))
            .chain(self.must_not.iter().map(|p| (Occur::MustNot, p)))
            .chain(self.filter.iter().map(|p| (Occur::Filter, p)))
    }

    /// Every clause, in rendering order.
    pub fn clauses(&self) -> impl Iterator<Item = &SearchPredicate> {
        self.occurrences().map(|(_, p)| p)
    }

    /// Whether the predicate only excludes documents.
    pub fn is_pure_negation(&self) -> bool {
        !self.must_not.is_empty()
            && self.must.is_empty()
            && self.should.is_empty()
            && self.filter.is_empty()
            && self.minimum_should_match.is_none()
    }

    pub(crate) fn into_must_not(self) -> Vec<SearchPredicate> {
        self.must_not
    }

    pub(crate) fn render(&self, f: &mut fmt::Formatter<'_>, nested: bool) -> fmt::Result {
        let wrap = nested || self.minimum_should_match.is_some();
        if wrap {
            f.write_str("(")?;
        }

        for (i, (occur, clause)) in self.occurrences().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(occur.prefix())?;
            clause.render(f, true)?;
        }

        // A pure negation matches everything except its clauses.
        if self.is_pure_negation() {
            f.write_str(" #*:*")?;
        }

        if wrap {
            f.write_str(")")?;
        }
        if let Some(minimum) = self.minimum_should_match {
            write!(f, "~{minimum}")?;
        }
        Ok(())
    }
}

/// Builder for boolean predicates.
#[derive(Debug, Clone)]
pub struct BooleanPredicateBuilder {
    max_clause_count: usize,
    must: Vec<SearchPredicate>,
    should: Vec<SearchPredicate>,
    must_not: Vec<SearchPredicate>,
    filter: Vec<SearchPredicate>,
    minimum_should_match: MinimumShouldMatchConstraints,
    score: ScoreOptions,
}

impl BooleanPredicateBuilder {
    /// Create a new empty boolean builder.
    pub fn new(max_clause_count: usize) -> Self {
        BooleanPredicateBuilder {
            max_clause_count,
            must: Vec::new(),
            should: Vec::new(),
            must_not: Vec::new(),
            filter: Vec::new(),
            minimum_should_match: MinimumShouldMatchConstraints::new(),
            score: ScoreOptions::default(),
        }
    }

    /// Add a MUST clause.
    pub fn must(&mut self, predicate: SearchPredicate) {
        self.must.push(predicate);
    }

    /// Add a SHOULD clause.
    pub fn should(&mut self, predicate: SearchPredicate) {
        self.should.push(predicate);
    }

    /// Add a MUST_NOT clause.
    pub fn must_not(&mut self, predicate: SearchPredicate) {
        self.must_not.push(predicate);
    }

    /// Add a FILTER clause.
    pub fn filter(&mut self, predicate: SearchPredicate) {
        self.filter.push(predicate);
    }

    /// Whether any clause has been added.
    pub fn has_clause(&self) -> bool {
        self.clause_count() > 0
    }

    /// Total number of clauses.
    pub fn clause_count(&self) -> usize {
        self.must.len() + self.should.len() + self.must_not.len() + self.filter.len()
    }

    /// Number of SHOULD clauses.
    pub fn should_count(&self) -> usize {
        self.should.len()
    }

    /// Collapse negations among the clauses.
    ///
    /// The negated clauses of a pure negation added as MUST or FILTER become
    /// MUST_NOT clauses, and a single-clause negation added as MUST_NOT
    /// becomes a MUST clause. Both rewrites change whether SHOULD clauses are
    /// required, so they only apply when the SHOULD clauses are already
    /// optional (a positive MUST or FILTER clause remains), absent, or
    /// governed by an explicit minimum.
    fn flatten_negations(&mut self, has_minimum_should_match: bool) {
        let has_required = self
            .must
            .iter()
            .chain(&self.filter)
            .any(|clause| clause.negated_clauses().is_none());
        if !(self.should.is_empty() || has_minimum_should_match || has_required) {
            debug!("keeping negated clauses, should clauses would become required");
            return;
        }

        let mut must = Vec::with_capacity(self.must.len());
        let mut must_not = Vec::with_capacity(self.must_not.len());
        let mut hoisted = Vec::new();

        for clause in std::mem::take(&mut self.must) {
            match clause.into_negated_clauses() {
                Ok(negated) => hoisted.extend(negated),
                Err(clause) => must.push(clause),
            }
        }

        let mut filter = Vec::with_capacity(self.filter.len());
        for clause in std::mem::take(&mut self.filter) {
            match clause.into_negated_clauses() {
                Ok(negated) => hoisted.extend(negated),
                Err(clause) => filter.push(clause),
            }
        }

        for clause in std::mem::take(&mut self.must_not) {
            if clause.negated_clauses().is_some_and(|negated| negated.len() == 1) {
                match clause.into_negated_clauses() {
                    Ok(negated) => must.extend(negated),
                    Err(clause) => must_not.push(clause),
                }
            } else {
                must_not.push(clause);
            }
        }

        if !hoisted.is_empty() {
            debug!(clauses = hoisted.len(), "flattening negation into must_not");
        }
        must_not.extend(hoisted);

        self.must = must;
        self.filter = filter;
        self.must_not = must_not;
    }
}

impl MinimumShouldMatchBuilder for BooleanPredicateBuilder {
    fn minimum_should_match(
        &mut self,
        ceiling: i32,
        requirement: MinimumShouldMatchRequirement,
    ) -> Result<()> {
        self.minimum_should_match.add(ceiling, requirement)
    }
}

impl SearchPredicateBuilder for BooleanPredicateBuilder {
    fn boost(&mut self, boost: f32) {
        self.score.boost = Some(boost);
    }

    fn constant_score(&mut self) {
        self.score.constant_score = true;
    }

    fn build(mut self) -> Result<SearchPredicate> {
        if !self.has_clause() {
            debug!("empty boolean predicate, building match-all");
            return Ok(SearchPredicate::new(PredicateKind::MatchAll, self.score));
        }

        let minimum_should_match = self.minimum_should_match.resolve(self.should.len())?;
        self.flatten_negations(minimum_should_match.is_some());

        let count = self.clause_count();
        if count > self.max_clause_count {
            return Err(PilumError::TooManyClauses {
                count,
                max: self.max_clause_count,
            });
        }

        if self.score.is_default() && minimum_should_match.is_none() && count == 1 {
            if self.must.len() == 1 {
                return Ok(self.must.remove(0));
            }
            if self.should.len() == 1 {
                return Ok(self.should.remove(0));
            }
        }

        debug!(clauses = count, ?minimum_should_match, "built boolean predicate");
        Ok(SearchPredicate::new(
            PredicateKind::Boolean(BooleanPredicate {
                must: self.must,
                should: self.should,
                must_not: self.must_not,
                filter: self.filter,
                minimum_should_match,
            }),
            self.score,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldValue;

    fn term(value: &str) -> SearchPredicate {
        SearchPredicate::new(
            PredicateKind::Match {
                field: "title".to_string(),
                value: FieldValue::from(value),
                fuzziness: None,
                analyzer: None,
                skip_analysis: false,
            },
            ScoreOptions::default(),
        )
    }

    fn not(predicate: SearchPredicate) -> SearchPredicate {
        let mut builder = BooleanPredicateBuilder::new(1024);
        builder.must_not(predicate);
        builder.build().unwrap()
    }

    #[test]
    fn test_clause_order_and_rendering() {
        let mut builder = BooleanPredicateBuilder::new(1024);
        builder.filter(term("d"));
        builder.must_not(term("c"));
        builder.should(term("b"));
        builder.must(term("a"));

        let predicate = builder.build().unwrap();
        assert_eq!(
            predicate.to_string(),
            "+title:a title:b -title:c #title:d"
        );
    }

    #[test]
    fn test_single_clause_unwrap() {
        let mut builder = BooleanPredicateBuilder::new(1024);
        builder.must(term("a"));
        assert_eq!(builder.build().unwrap(), term("a"));

        let mut builder = BooleanPredicateBuilder::new(1024);
        builder.should(term("a"));
        assert_eq!(builder.build().unwrap(), term("a"));

        let mut builder = BooleanPredicateBuilder::new(1024);
        builder.filter(term("a"));
        assert_eq!(builder.build().unwrap().to_string(), "#title:a");

        let mut builder = BooleanPredicateBuilder::new(1024);
        builder.must(term("a"));
        builder.boost(2.0);
        assert_eq!(builder.build().unwrap().to_string(), "(+title:a)^2.0");
    }

    #[test]
    fn test_negation_flattening() {
        let negation = not(term("a"));
        assert_eq!(negation.to_string(), "-title:a #*:*");

        let mut builder = BooleanPredicateBuilder::new(1024);
        builder.must(term("b"));
        builder.must(negation.clone());
        assert_eq!(builder.build().unwrap().to_string(), "+title:b -title:a");

        assert_eq!(not(negation), term("a"));
    }

    #[test]
    fn test_negation_beside_optional_clauses_is_kept() {
        let mut builder = BooleanPredicateBuilder::new(1024);
        builder.should(term("a"));
        builder.must(not(term("b")));
        let predicate = builder.build().unwrap();
        let boolean = predicate.as_boolean().unwrap();
        assert_eq!(boolean.must().len(), 1);
        assert!(boolean.must_not().is_empty());
        assert_eq!(predicate.to_string(), "+(-title:b #*:*) title:a");

        let mut builder = BooleanPredicateBuilder::new(1024);
        builder.should(term("a"));
        builder.filter(not(term("b")));
        let predicate = builder.build().unwrap();
        assert_eq!(predicate.as_boolean().unwrap().filter().len(), 1);
        assert_eq!(predicate.to_string(), "title:a #(-title:b #*:*)");

        let mut builder = BooleanPredicateBuilder::new(1024);
        builder.should(term("a"));
        builder.must_not(not(term("b")));
        let predicate = builder.build().unwrap();
        assert!(predicate.as_boolean().unwrap().must().is_empty());
        assert_eq!(predicate.to_string(), "title:a -(-title:b #*:*)");
    }

    #[test]
    fn test_negation_flattens_when_should_semantics_hold() {
        let mut builder = BooleanPredicateBuilder::new(1024);
        builder.should(term("a"));
        builder.filter(term("c"));
        builder.must(not(term("b")));
        assert_eq!(
            builder.build().unwrap().to_string(),
            "title:a -title:b #title:c"
        );

        let mut builder = BooleanPredicateBuilder::new(1024);
        builder.should(term("a"));
        builder.should(term("c"));
        builder.must(not(term("b")));
        builder
            .minimum_should_match(0, MinimumShouldMatchRequirement::Number(1))
            .unwrap();
        assert_eq!(
            builder.build().unwrap().to_string(),
            "(title:a title:c -title:b)~1"
        );
    }

    #[test]
    fn test_nested_boolean_rendering() {
        let mut inner = BooleanPredicateBuilder::new(1024);
        inner.should(term("a"));
        inner.should(term("b"));

        let mut outer = BooleanPredicateBuilder::new(1024);
        outer.must(inner.build().unwrap());
        outer.must_not(term("c"));
        assert_eq!(
            outer.build().unwrap().to_string(),
            "+(title:a title:b) -title:c"
        );
    }

    #[test]
    fn test_minimum_should_match() {
        let mut builder = BooleanPredicateBuilder::new(1024);
        builder.should(term("a"));
        builder.should(term("b"));
        builder.should(term("c"));
        builder
            .minimum_should_match(0, MinimumShouldMatchRequirement::Number(2))
            .unwrap();

        let predicate = builder.build().unwrap();
        assert_eq!(predicate.as_boolean().unwrap().minimum_should_match(), Some(2));
        assert_eq!(predicate.to_string(), "(title:a title:b title:c)~2");
    }

    #[test]
    fn test_empty_builds_match_all() {
        let builder = BooleanPredicateBuilder::new(1024);
        assert!(!builder.has_clause());
        assert_eq!(builder.build().unwrap(), SearchPredicate::match_all());
    }

    #[test]
    fn test_too_many_clauses() {
        let mut builder = BooleanPredicateBuilder::new(2);
        builder.should(term("a"));
        builder.should(term("b"));
        builder.should(term("c"));
        assert!(matches!(
            builder.build(),
            Err(PilumError::TooManyClauses { count: 3, max: 2 })
        ));
    }
}
