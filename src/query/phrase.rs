//! Phrase predicate builder.

use crate::error::{PilumError, Result};
use crate::query::predicate::{PredicateKind, ScoreOptions, SearchPredicate};
use crate::query::query::SearchPredicateBuilder;
use crate::schema::field::FieldDescriptor;

/// Builder for a predicate matching a sequence of terms on one field.
#[derive(Debug, Clone)]
pub struct PhrasePredicateBuilder {
    field: FieldDescriptor,
    phrase: Option<String>,
    slop: u32,
    analyzer: Option<String>,
    skip_analysis: bool,
    score: ScoreOptions,
}

impl PhrasePredicateBuilder {
    /// Create a builder targeting the given field.
    pub fn new(field: FieldDescriptor) -> Self {
        PhrasePredicateBuilder {
            field,
            phrase: None,
            slop: 0,
            analyzer: None,
            skip_analysis: false,
            score: ScoreOptions::default(),
        }
    }

    /// Set the phrase to match.
    pub fn phrase(&mut self, phrase: &str) {
        self.phrase = Some(phrase.to_string());
    }

    /// Set how many positions terms may move to still match.
    pub fn slop(&mut self, slop: i32) -> Result<()> {
        if slop < 0 {
            return Err(PilumError::InvalidSlop(slop));
        }
        self.slop = slop.unsigned_abs();
        Ok(())
    }

    /// Override the analyzer applied to the phrase.
    pub fn analyzer(&mut self, analyzer: &str) {
        self.analyzer = Some(analyzer.to_string());
    }

    /// Match the phrase as-is, without analysis.
    pub fn skip_analysis(&mut self) {
        self.skip_analysis = true;
    }
}

impl SearchPredicateBuilder for PhrasePredicateBuilder {
    fn boost(&mut self, boost: f32) {
        self.score.boost = Some(boost);
    }

    fn constant_score(&mut self) {
        self.score.constant_score = true;
    }

    fn build(self) -> Result<SearchPredicate> {
        let phrase = self.phrase.ok_or_else(|| {
            PilumError::invalid_argument(format!("no phrase for field '{}'", self.field.path()))
        })?;

        Ok(SearchPredicate::new(
            PredicateKind::Phrase {
                field: self.field.path().to_string(),
                phrase,
                slop: self.slop,
                analyzer: self.analyzer,
                skip_analysis: self.skip_analysis,
            },
            self.score,
        ))
    }
}
