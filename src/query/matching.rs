//! Match predicate builder.

use crate::error::{PilumError, Result};
use crate::query::fuzzy::Fuzziness;
use crate::query::predicate::{PredicateKind, ScoreOptions, SearchPredicate};
use crate::query::query::SearchPredicateBuilder;
use crate::schema::field::FieldDescriptor;
use crate::value::FieldValue;

/// Builder for a predicate matching one value on one field.
#[derive(Debug, Clone)]
pub struct MatchPredicateBuilder {
    field: FieldDescriptor,
    value: Option<FieldValue>,
    fuzziness: Option<Fuzziness>,
    analyzer: Option<String>,
    skip_analysis: bool,
    score: ScoreOptions,
}

impl MatchPredicateBuilder {
    /// Create a builder targeting the given field.
    pub fn new(field: FieldDescriptor) -> Self {
        MatchPredicateBuilder {
            field,
            value: None,
            fuzziness: None,
            analyzer: None,
            skip_analysis: false,
            score: ScoreOptions::default(),
        }
    }

    /// Set the value to match, converted to the field type.
    pub fn value(&mut self, value: FieldValue) -> Result<()> {
        self.value = Some(self.field.convert(value)?);
        Ok(())
    }

    /// Enable fuzzy matching.
    pub fn fuzzy(&mut self, max_edit_distance: i32, exact_prefix_length: i32) -> Result<()> {
        let fuzziness = Fuzziness::new(max_edit_distance, exact_prefix_length)?;
        self.require_text("fuzzy")?;
        self.fuzziness = Some(fuzziness);
        Ok(())
    }

    /// Override the analyzer applied to the value.
    pub fn analyzer(&mut self, analyzer: &str) -> Result<()> {
        self.require_text("analyzer")?;
        self.analyzer = Some(analyzer.to_string());
        Ok(())
    }

    /// Match the value as-is, without analysis.
    pub fn skip_analysis(&mut self) {
        self.skip_analysis = true;
    }

    fn require_text(&self, option: &str) -> Result<()> {
        if self.field.kind().is_textual() {
            return Ok(());
        }
        Err(PilumError::invalid_argument(format!(
            "'{option}' is only available on text fields, field '{}' is of type '{}'",
            self.field.path(),
            self.field.kind()
        )))
    }
}

impl SearchPredicateBuilder for MatchPredicateBuilder {
    fn boost(&mut self, boost: f32) {
        self.score.boost = Some(boost);
    }

    fn constant_score(&mut self) {
        self.score.constant_score = true;
    }

    fn build(self) -> Result<SearchPredicate> {
        let value = self.value.ok_or_else(|| {
            PilumError::invalid_argument(format!(
                "no value to match on field '{}'",
                self.field.path()
            ))
        })?;

        Ok(SearchPredicate::new(
            PredicateKind::Match {
                field: self.field.path().to_string(),
                value,
                fuzziness: self.fuzziness,
                analyzer: self.analyzer,
                skip_analysis: self.skip_analysis,
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
    fn test_match_build() {
        let mut builder = MatchPredicateBuilder::new(FieldDescriptor::new("title", FieldKind::Text));
        builder.value(FieldValue::from("rust")).unwrap();
        builder.fuzzy(1, 0).unwrap();
        builder.boost(2.0);

        let predicate = builder.build().unwrap();
        assert_eq!(predicate.to_string(), "(title:rust~1)^2.0");
    }

    #[test]
    fn test_text_only_options() {
        let mut builder =
            MatchPredicateBuilder::new(FieldDescriptor::new("year", FieldKind::Integer));
        builder.value(FieldValue::from(2024)).unwrap();

        assert!(matches!(
            builder.fuzzy(1, 0),
            Err(PilumError::InvalidArgument(_))
        ));
        assert!(matches!(
            builder.fuzzy(5, 0),
            Err(PilumError::InvalidFuzzy { .. })
        ));
        assert!(builder.analyzer("standard").is_err());
    }

    #[test]
    fn test_missing_value() {
        let builder = MatchPredicateBuilder::new(FieldDescriptor::new("title", FieldKind::Text));
        assert!(builder.build().is_err());
    }
}
