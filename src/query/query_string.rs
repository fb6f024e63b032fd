//! Simple and full query-string predicate builder.
//!
//! Both syntaxes share one builder; the syntax decides which options are
//! meaningful and which predicate kind is produced. The query string itself
//! is carried verbatim, so minimum-should-match brackets are kept unresolved
//! and applied once the string is parsed into clauses.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PilumError, Result};
use crate::query::minimum_should_match::{
    MinimumShouldMatchBuilder, MinimumShouldMatchConstraints, MinimumShouldMatchRequirement,
};
use crate::query::predicate::{PredicateKind, ScoreOptions, SearchPredicate};
use crate::query::query::SearchPredicateBuilder;
use crate::schema::field::FieldDescriptor;

/// Operator combining terms of a query string when none is explicit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanOperator {
    /// All terms must match.
    And,
    /// Any term may match.
    #[default]
    Or,
}

impl fmt::Display for BooleanOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BooleanOperator::And => f.write_str("AND"),
            BooleanOperator::Or => f.write_str("OR"),
        }
    }
}

/// Operators enabled in a simple query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimpleQueryFlag {
    And,
    Not,
    Or,
    Prefix,
    Phrase,
    Precedence,
    Escape,
    Whitespace,
    Fuzzy,
    Near,
}

impl SimpleQueryFlag {
    /// Every flag; the default set.
    pub const ALL: [SimpleQueryFlag; 10] = [
        SimpleQueryFlag::And,
        SimpleQueryFlag::Not,
        SimpleQueryFlag::Or,
        SimpleQueryFlag::Prefix,
        SimpleQueryFlag::Phrase,
        SimpleQueryFlag::Precedence,
        SimpleQueryFlag::Escape,
        SimpleQueryFlag::Whitespace,
        SimpleQueryFlag::Fuzzy,
        SimpleQueryFlag::Near,
    ];

    /// Parse a flag name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|flag| format!("{flag:?}").to_ascii_uppercase() == name)
    }
}

/// How multi-term parts of a query string are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteMethod {
    ConstantScore,
    ConstantScoreBoolean,
    ScoringBoolean,
    TopTermsBlendedFreqsN,
    TopTermsBoostN,
    TopTermsN,
}

impl RewriteMethod {
    /// Whether the method takes a term count.
    pub fn is_parameterized(&self) -> bool {
        matches!(
            self,
            RewriteMethod::TopTermsBlendedFreqsN
                | RewriteMethod::TopTermsBoostN
                | RewriteMethod::TopTermsN
        )
    }

    /// Parse an Elasticsearch-style name such as `top_terms_boost_N`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "constant_score" => Some(RewriteMethod::ConstantScore),
            "constant_score_boolean" => Some(RewriteMethod::ConstantScoreBoolean),
            "scoring_boolean" => Some(RewriteMethod::ScoringBoolean),
            "top_terms_blended_freqs_n" => Some(RewriteMethod::TopTermsBlendedFreqsN),
            "top_terms_boost_n" => Some(RewriteMethod::TopTermsBoostN),
            "top_terms_n" => Some(RewriteMethod::TopTermsN),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            RewriteMethod::ConstantScore => "CONSTANT_SCORE",
            RewriteMethod::ConstantScoreBoolean => "CONSTANT_SCORE_BOOLEAN",
            RewriteMethod::ScoringBoolean => "SCORING_BOOLEAN",
            RewriteMethod::TopTermsBlendedFreqsN => "TOP_TERMS_BLENDED_FREQS_N",
            RewriteMethod::TopTermsBoostN => "TOP_TERMS_BOOST_N",
            RewriteMethod::TopTermsN => "TOP_TERMS_N",
        }
    }
}

/// A rewrite method with its term count, when it has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewrite {
    pub method: RewriteMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

/// Which query-string syntax a builder parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStringSyntax {
    Simple,
    Full,
}

/// A field targeted by a query string, with its own boost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryStringField {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
}

impl QueryStringField {
    pub fn new(field: FieldDescriptor) -> Self {
        QueryStringField {
            path: field.path().to_string(),
            boost: None,
        }
    }
}

impl fmt::Display for QueryStringField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.boost {
            Some(boost) => write!(f, "{}^{boost:?}", self.path),
            None => f.write_str(&self.path),
        }
    }
}

/// The payload of a built query-string predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryStringPredicate {
    fields: Vec<QueryStringField>,
    query: String,
    default_operator: BooleanOperator,
    #[serde(skip_serializing_if = "Option::is_none")]
    analyzer: Option<String>,
    skip_analysis: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    flags: Option<BTreeSet<SimpleQueryFlag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phrase_slop: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allow_leading_wildcard: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    enable_position_increments: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rewrite: Option<Rewrite>,
    #[serde(skip_serializing_if = "MinimumShouldMatchConstraints::is_empty")]
    minimum_should_match: MinimumShouldMatchConstraints,
}

impl QueryStringPredicate {
    /// The targeted fields, in declaration order.
    pub fn fields(&self) -> &[QueryStringField] {
        &self.fields
    }

    /// The query string.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The default operator.
    pub fn default_operator(&self) -> BooleanOperator {
        self.default_operator
    }

    /// Enabled simple-syntax operators, when restricted.
    pub fn flags(&self) -> Option<&BTreeSet<SimpleQueryFlag>> {
        self.flags.as_ref()
    }

    /// Phrase slop of the full syntax.
    pub fn phrase_slop(&self) -> Option<u32> {
        self.phrase_slop
    }

    /// Rewrite method of the full syntax.
    pub fn rewrite(&self) -> Option<Rewrite> {
        self.rewrite
    }

    /// Unresolved minimum-should-match brackets.
    pub fn minimum_should_match(&self) -> &MinimumShouldMatchConstraints {
        &self.minimum_should_match
    }
}

impl fmt::Display for QueryStringPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self.fields.iter().map(ToString::to_string).collect();
        write!(f, "[{}] '{}'", fields.join(", "), self.query)?;
        if self.default_operator == BooleanOperator::And {
            write!(f, " {}", self.default_operator)?;
        }
        if !self.minimum_should_match.is_empty() {
            write!(f, " mm={}", self.minimum_should_match)?;
        }
        Ok(())
    }
}

/// Builder shared by simple and full query-string predicates.
#[derive(Debug, Clone)]
pub struct QueryStringPredicateBuilder {
    syntax: QueryStringSyntax,
    fields: Vec<QueryStringField>,
    query: Option<String>,
    default_operator: BooleanOperator,
    analyzer: Option<String>,
    skip_analysis: bool,
    flags: Option<BTreeSet<SimpleQueryFlag>>,
    phrase_slop: Option<u32>,
    allow_leading_wildcard: Option<bool>,
    enable_position_increments: Option<bool>,
    rewrite: Option<Rewrite>,
    minimum_should_match: MinimumShouldMatchConstraints,
    score: ScoreOptions,
}

impl QueryStringPredicateBuilder {
    /// Create a builder for the given syntax and fields.
    pub fn new(syntax: QueryStringSyntax, fields: Vec<QueryStringField>) -> Self {
        QueryStringPredicateBuilder {
            syntax,
            fields,
            query: None,
            default_operator: BooleanOperator::default(),
            analyzer: None,
            skip_analysis: false,
            flags: None,
            phrase_slop: None,
            allow_leading_wildcard: None,
            enable_position_increments: None,
            rewrite: None,
            minimum_should_match: MinimumShouldMatchConstraints::new(),
            score: ScoreOptions::default(),
        }
    }

    /// Set the query string.
    pub fn query(&mut self, query: &str) {
        self.query = Some(query.to_string());
    }

    /// The first per-field boost, if any targeted field carries one.
    pub fn field_boost(&self) -> Option<f32> {
        self.fields.iter().find_map(|field| field.boost)
    }

    pub fn default_operator(&mut self, operator: BooleanOperator) {
        self.default_operator = operator;
    }

    pub fn analyzer(&mut self, analyzer: &str) {
        self.analyzer = Some(analyzer.to_string());
    }

    pub fn skip_analysis(&mut self) {
        self.skip_analysis = true;
    }

    /// Restrict the simple syntax to the given operators.
    pub fn flags(&mut self, flags: impl IntoIterator<Item = SimpleQueryFlag>) {
        self.flags = Some(flags.into_iter().collect());
    }

    /// Set the slop of phrases without an explicit one.
    pub fn phrase_slop(&mut self, slop: i32) -> Result<()> {
        if slop < 0 {
            return Err(PilumError::InvalidSlop(slop));
        }
        self.phrase_slop = Some(slop.unsigned_abs());
        Ok(())
    }

    pub fn allow_leading_wildcard(&mut self, allow: bool) {
        self.allow_leading_wildcard = Some(allow);
    }

    pub fn enable_position_increments(&mut self, enable: bool) {
        self.enable_position_increments = Some(enable);
    }

    /// Set the rewrite method. Parameterized methods require `size`,
    /// the others reject it.
    pub fn rewrite_method(&mut self, method: RewriteMethod, size: Option<i32>) -> Result<()> {
        let size = match (method.is_parameterized(), size) {
            (true, None) => {
                return Err(PilumError::RewriteMethodMismatch {
                    method: method.name().to_string(),
                    reason: "this rewrite method requires a parameter".to_string(),
                });
            }
            (false, Some(n)) => {
                return Err(PilumError::RewriteMethodMismatch {
                    method: method.name().to_string(),
                    reason: format!("this rewrite method does not accept a parameter, got {n}"),
                });
            }
            (true, Some(n)) if n <= 0 => {
                return Err(PilumError::invalid_argument(format!(
                    "rewrite method parameter must be strictly positive, got {n}"
                )));
            }
            (_, size) => size.map(i32::unsigned_abs),
        };
        self.rewrite = Some(Rewrite { method, size });
        Ok(())
    }
}

impl MinimumShouldMatchBuilder for QueryStringPredicateBuilder {
    fn minimum_should_match(
        &mut self,
        ceiling: i32,
        requirement: MinimumShouldMatchRequirement,
    ) -> Result<()> {
        self.minimum_should_match.add(ceiling, requirement)
    }
}

impl SearchPredicateBuilder for QueryStringPredicateBuilder {
    fn boost(&mut self, boost: f32) {
        self.score.boost = Some(boost);
    }

    fn constant_score(&mut self) {
        self.score.constant_score = true;
    }

    fn build(self) -> Result<SearchPredicate> {
        if self.fields.is_empty() {
            return Err(PilumError::NoFieldSet);
        }
        if self.score.constant_score {
            if let Some(boost) = self.field_boost() {
                return Err(PilumError::ContradictoryBoost { boost });
            }
        }
        let query = self
            .query
            .ok_or_else(|| PilumError::invalid_argument("no query string"))?;

        let payload = QueryStringPredicate {
            fields: self.fields,
            query,
            default_operator: self.default_operator,
            analyzer: self.analyzer,
            skip_analysis: self.skip_analysis,
            flags: self.flags,
            phrase_slop: self.phrase_slop,
            allow_leading_wildcard: self.allow_leading_wildcard,
            enable_position_increments: self.enable_position_increments,
            rewrite: self.rewrite,
            minimum_should_match: self.minimum_should_match,
        };
        let kind = match self.syntax {
            QueryStringSyntax::Simple => PredicateKind::SimpleQueryString(payload),
            QueryStringSyntax::Full => PredicateKind::QueryString(payload),
        };
        Ok(SearchPredicate::new(kind, self.score))
    }
}
