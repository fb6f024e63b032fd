//! The immutable predicate tree produced by builders.
//!
//! A [`SearchPredicate`] is a kind-specific payload plus the scoring options
//! applied to it. Its `Display` output mirrors Lucene's `Query::toString`
//! closely enough to compare predicates in tests and logs:
//!
//! | Predicate | Rendering |
//! |---|---|
//! | match | `title:rust`, fuzzy `title:rust~2` |
//! | range | `year:[2000 TO 2010}` |
//! | phrase | `title:"quick fox"~2` |
//! | boolean | `+a b -c #d`, nested `(+a b)~1` |
//! | pure negation | `-a #*:*` |
//! | boost | `(title:rust)^2.0` |
//! | constant score | `ConstantScore(title:rust)` |

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::query::boolean::BooleanPredicate;
use crate::query::fuzzy::Fuzziness;
use crate::query::query_string::QueryStringPredicate;
use crate::query::range::Range;
use crate::query::regexp::RegexpQueryFlag;
use crate::spatial::GeoShape;
use crate::value::FieldValue;

/// Kind-specific payload of a predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PredicateKind {
    /// Matches every document.
    MatchAll,
    /// Matches no document.
    MatchNone,
    /// Matches documents whose field matches a value.
    Match {
        field: String,
        value: FieldValue,
        fuzziness: Option<Fuzziness>,
        analyzer: Option<String>,
        skip_analysis: bool,
    },
    /// Matches documents whose field is within a range.
    Range {
        field: String,
        range: Range<FieldValue>,
    },
    /// Matches documents containing a phrase.
    Phrase {
        field: String,
        phrase: String,
        slop: u32,
        analyzer: Option<String>,
        skip_analysis: bool,
    },
    /// Matches terms against a wildcard pattern.
    Wildcard { field: String, pattern: String },
    /// Matches terms starting with a prefix.
    Prefix { field: String, prefix: String },
    /// Matches terms against a regular expression.
    Regexp {
        field: String,
        pattern: String,
        flags: BTreeSet<RegexpQueryFlag>,
    },
    /// Matches any (or all) of a set of terms.
    Terms {
        field: String,
        terms: Vec<FieldValue>,
        match_all: bool,
    },
    /// Matches documents with a value for the field.
    Exists { field: String },
    /// Matches points within a shape.
    Spatial { field: String, shape: GeoShape },
    /// K nearest neighbors of a vector.
    Knn {
        field: String,
        k: usize,
        vector: Vec<f32>,
        filter: Option<Box<SearchPredicate>>,
        required_minimum_similarity: Option<f32>,
    },
    /// A simple query string over several fields.
    SimpleQueryString(QueryStringPredicate),
    /// A full query string over several fields.
    QueryString(QueryStringPredicate),
    /// Matches parent documents whose nested documents match.
    Nested {
        path: String,
        inner: Box<SearchPredicate>,
    },
    /// A boolean combination of clauses.
    Boolean(BooleanPredicate),
    /// Matches documents by identifier.
    Id { values: Vec<String> },
}

/// An immutable, built predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPredicate {
    kind: PredicateKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    boost: Option<f32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    constant_score: bool,
}

impl SearchPredicate {
    /// Create a predicate from its payload and scoring options.
    pub fn new(kind: PredicateKind, score: ScoreOptions) -> Self {
        SearchPredicate {
            kind,
            boost: score.boost,
            constant_score: score.constant_score,
        }
    }

    /// A predicate matching every document.
    pub fn match_all() -> Self {
        Self::new(PredicateKind::MatchAll, ScoreOptions::default())
    }

    /// A predicate matching no document.
    pub fn match_none() -> Self {
        Self::new(PredicateKind::MatchNone, ScoreOptions::default())
    }

    /// The kind-specific payload.
    pub fn kind(&self) -> &PredicateKind {
        &self.kind
    }

    /// The applied boost, if any.
    pub fn boost(&self) -> Option<f32> {
        self.boost
    }

    /// Whether the predicate scores with a constant score.
    pub fn is_constant_score(&self) -> bool {
        self.constant_score
    }

    /// Get the boolean payload, if this is a boolean predicate.
    pub fn as_boolean(&self) -> Option<&BooleanPredicate> {
        match &self.kind {
            PredicateKind::Boolean(boolean) => Some(boolean),
            _ => None,
        }
    }

    /// The negated clauses when this predicate is a pure negation: a
    /// boolean holding only `must_not` clauses and no scoring options.
    pub fn negated_clauses(&self) -> Option<&[SearchPredicate]> {
        if self.boost.is_some() || self.constant_score {
            return None;
        }
        self.as_boolean()
            .filter(|boolean| boolean.is_pure_negation())
            .map(|boolean| boolean.must_not())
    }

    /// Take the negated clauses out of a pure negation, or give the
    /// predicate back unchanged.
    pub fn into_negated_clauses(self) -> Result<Vec<SearchPredicate>, SearchPredicate> {
        if self.negated_clauses().is_none() {
            return Err(self);
        }
        match self.kind {
            PredicateKind::Boolean(boolean) => Ok(boolean.into_must_not()),
            kind => Err(SearchPredicate {
                kind,
                boost: self.boost,
                constant_score: self.constant_score,
            }),
        }
    }

    /// Every field path this predicate targets, in tree order.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match &self.kind {
            PredicateKind::MatchAll | PredicateKind::MatchNone | PredicateKind::Id { .. } => {}
            PredicateKind::Match { field, .. }
            | PredicateKind::Range { field, .. }
            | PredicateKind::Phrase { field, .. }
            | PredicateKind::Wildcard { field, .. }
            | PredicateKind::Prefix { field, .. }
            | PredicateKind::Regexp { field, .. }
            | PredicateKind::Terms { field, .. }
            | PredicateKind::Exists { field }
            | PredicateKind::Spatial { field, .. } => out.push(field),
            PredicateKind::Knn { field, filter, .. } => {
                out.push(field);
                if let Some(filter) = filter {
                    filter.collect_fields(out);
                }
            }
            PredicateKind::SimpleQueryString(qs) | PredicateKind::QueryString(qs) => {
                out.extend(qs.fields().iter().map(|f| f.path.as_str()));
            }
            PredicateKind::Nested { path, inner } => {
                out.push(path);
                inner.collect_fields(out);
            }
            PredicateKind::Boolean(boolean) => {
                for clause in boolean.clauses() {
                    clause.collect_fields(out);
                }
            }
        }
    }

    /// Render this predicate; `nested` is true when it appears as a clause.
    pub(crate) fn render(&self, f: &mut fmt::Formatter<'_>, nested: bool) -> fmt::Result {
        match (self.boost, self.constant_score) {
            (None, false) => self.render_kind(f, nested),
            (None, true) => {
                f.write_str("ConstantScore(")?;
                self.render_kind(f, false)?;
                f.write_str(")")
            }
            (Some(boost), constant_score) => {
                f.write_str("(")?;
                if constant_score {
                    f.write_str("ConstantScore(")?;
                    self.render_kind(f, false)?;
                    f.write_str(")")?;
                } else {
                    self.render_kind(f, false)?;
                }
                write!(f, ")^{boost:?}")
            }
        }
    }

    fn render_kind(&self, f: &mut fmt::Formatter<'_>, nested: bool) -> fmt::Result {
        match &self.kind {
            PredicateKind::MatchAll => f.write_str("*:*"),
            PredicateKind::MatchNone => f.write_str("MatchNoDocs"),
            PredicateKind::Match {
                field,
                value,
                fuzziness,
                ..
            } => {
                write!(f, "{field}:{value}")?;
                if let Some(fuzziness) = fuzziness {
                    write!(f, "~{}", fuzziness.max_edit_distance())?;
                }
                Ok(())
            }
            PredicateKind::Range { field, range } => write!(f, "{field}:{range}"),
            PredicateKind::Phrase {
                field,
                phrase,
                slop,
                ..
            } => {
                write!(f, "{field}:\"{phrase}\"")?;
                if *slop > 0 {
                    write!(f, "~{slop}")?;
                }
                Ok(())
            }
            PredicateKind::Wildcard { field, pattern } => write!(f, "{field}:{pattern}"),
            PredicateKind::Prefix { field, prefix } => write!(f, "{field}:{prefix}*"),
            PredicateKind::Regexp { field, pattern, .. } => write!(f, "{field}:/{pattern}/"),
            PredicateKind::Terms {
                field,
                terms,
                match_all,
            } => {
                let marker = if *match_all { "+" } else { "" };
                let terms: Vec<String> = terms.iter().map(|t| format!("{marker}{t}")).collect();
                write!(f, "{field}:({})", terms.join(" "))
            }
            PredicateKind::Exists { field } => write!(f, "_exists_:{field}"),
            PredicateKind::Spatial { field, shape } => write!(f, "{field}:{shape}"),
            PredicateKind::Knn {
                field,
                k,
                vector,
                filter,
                required_minimum_similarity,
            } => {
                write!(f, "Knn({field}, k={k}, vector={vector:?}")?;
                if let Some(similarity) = required_minimum_similarity {
                    write!(f, ", similarity>={similarity:?}")?;
                }
                if let Some(filter) = filter {
                    f.write_str(", filter=")?;
                    filter.render(f, true)?;
                }
                f.write_str(")")
            }
            PredicateKind::SimpleQueryString(qs) => write!(f, "SimpleQueryString({qs})"),
            PredicateKind::QueryString(qs) => write!(f, "QueryString({qs})"),
            PredicateKind::Nested { path, inner } => {
                write!(f, "Nested({path}: ")?;
                inner.render(f, false)?;
                f.write_str(")")
            }
            PredicateKind::Boolean(boolean) => boolean.render(f, nested),
            PredicateKind::Id { values } => write!(f, "_id:({})", values.join(" ")),
        }
    }
}

impl fmt::Display for SearchPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, false)
    }
}

/// Boost and constant-score settings shared by every builder.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreOptions {
    /// Boost, if one was set.
    pub boost: Option<f32>,
    /// Whether the predicate scores with a constant score.
    pub constant_score: bool,
}

impl ScoreOptions {
    /// Whether neither boost nor constant score is set.
    pub fn is_default(&self) -> bool {
        self.boost.is_none() && !self.constant_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matching(field: &str, value: &str) -> SearchPredicate {
        SearchPredicate::new(
            PredicateKind::Match {
                field: field.to_string(),
                value: FieldValue::from(value),
                fuzziness: None,
                analyzer: None,
                skip_analysis: false,
            },
            ScoreOptions::default(),
        )
    }

    #[test]
    fn test_render_scoring_wrappers() {
        let plain = matching("title", "rust");
        assert_eq!(plain.to_string(), "title:rust");

        let boosted = SearchPredicate::new(
            plain.kind().clone(),
            ScoreOptions {
                boost: Some(2.0),
                constant_score: false,
            },
        );
        assert_eq!(boosted.to_string(), "(title:rust)^2.0");

        let constant = SearchPredicate::new(
            plain.kind().clone(),
            ScoreOptions {
                boost: None,
                constant_score: true,
            },
        );
        assert_eq!(constant.to_string(), "ConstantScore(title:rust)");

        let both = SearchPredicate::new(
            plain.kind().clone(),
            ScoreOptions {
                boost: Some(3.0),
                constant_score: true,
            },
        );
        assert_eq!(both.to_string(), "(ConstantScore(title:rust))^3.0");
    }

    #[test]
    fn test_fields_of_leaf() {
        let predicate = matching("title", "rust");
        assert_eq!(predicate.fields(), vec!["title"]);
        assert!(predicate.negated_clauses().is_none());
        assert!(predicate.into_negated_clauses().is_err());
    }

    #[test]
    fn test_serialization_skips_default_scoring() {
        let json = serde_json::to_value(matching("title", "rust")).unwrap();
        assert_eq!(json["kind"]["type"], "match");
        assert_eq!(json["kind"]["field"], "title");
        assert!(json.get("boost").is_none());
        assert!(json.get("constant_score").is_none());
    }
}
