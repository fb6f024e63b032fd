//! Multi-field fan-out shared by every field-level predicate kind.
//!
//! One logical predicate such as `match().fields(["title", "body"])` is
//! composed of field sets, each holding one builder per field. Field sets
//! live in an arena owned by [`MultiFieldCommonState`]; option calls iterate
//! over it by index. At build time every builder is contributed in
//! insertion order and the results are combined into a disjunction.

use tracing::{debug, trace};

use crate::dsl::PredicateFinalStep;
use crate::error::{PilumError, Result};
use crate::query::predicate::SearchPredicate;
use crate::query::query::SearchPredicateBuilder;
use crate::scope::{PredicateTypeKey, ResolutionTiming, SearchIndexScope};

/// Apply scoring options to a builder, last thing before it is built.
///
/// | field-set boost | predicate boost | constant score | effect |
/// |---|---|---|---|
/// | `Some(f)` | any | `true` | [`PilumError::ContradictoryBoost`] |
/// | `Some(f)` | `Some(p)` | `false` | boost `p * f` |
/// | `Some(b)` / `None` | `None` / `Some(b)` | any | boost `b` |
/// | `None` | `None` | any | no boost |
///
/// Constant score is applied independently of the boost.
pub fn apply_boost_and_constant_score<B: SearchPredicateBuilder>(
    field_set_boost: Option<f32>,
    predicate_boost: Option<f32>,
    constant_score: bool,
    builder: &mut B,
) -> Result<()> {
    if let (Some(boost), true) = (field_set_boost, constant_score) {
        return Err(PilumError::ContradictoryBoost { boost });
    }

    match (predicate_boost, field_set_boost) {
        (Some(predicate), Some(field_set)) => builder.boost(predicate * field_set),
        (Some(boost), None) | (None, Some(boost)) => builder.boost(boost),
        (None, None) => {}
    }

    if constant_score {
        builder.constant_score();
    }
    Ok(())
}

/// A group of fields declared by one `field(...)`/`fields(...)` call.
#[derive(Debug, Clone)]
pub struct FieldSetState<B> {
    paths: Vec<String>,
    builders: Vec<B>,
    boost: Option<f32>,
}

impl<B> FieldSetState<B> {
    /// Create a field set; builders are resolved separately.
    pub fn new(paths: Vec<String>) -> Self {
        FieldSetState {
            paths,
            builders: Vec::new(),
            boost: None,
        }
    }

    /// Absolute paths, in declaration order.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// The per-field boost.
    pub fn boost(&self) -> Option<f32> {
        self.boost
    }

    /// Set the per-field boost.
    pub fn set_boost(&mut self, boost: f32) {
        self.boost = Some(boost);
    }

    /// Whether every path has its builder.
    pub fn is_resolved(&self) -> bool {
        self.builders.len() == self.paths.len()
    }

    /// Resolve one builder per path through the scope.
    pub fn resolve(&mut self, scope: &dyn SearchIndexScope, key: PredicateTypeKey<B>) -> Result<()> {
        if self.is_resolved() {
            return Ok(());
        }
        self.builders = self
            .paths
            .iter()
            .map(|path| scope.field_query_element(path, key))
            .collect::<Result<Vec<_>>>()?;
        Ok(())
    }

    /// Resolved builders.
    pub fn builders_mut(&mut self) -> &mut [B] {
        &mut self.builders
    }

    /// Consume the field set into its resolved builders.
    pub fn into_builders(self) -> Vec<B> {
        self.builders
    }
}

impl<B: SearchPredicateBuilder> FieldSetState<B> {
    /// Apply scoring options to each builder, build it and append the result.
    pub fn contribute_predicates(
        self,
        predicate_boost: Option<f32>,
        constant_score: bool,
        out: &mut Vec<SearchPredicate>,
    ) -> Result<()> {
        let field_set_boost = self.boost;
        for mut builder in self.builders {
            apply_boost_and_constant_score(
                field_set_boost,
                predicate_boost,
                constant_score,
                &mut builder,
            )?;
            out.push(builder.build()?);
        }
        Ok(())
    }
}

/// State shared by every step of one multi-field predicate chain.
pub struct MultiFieldCommonState<'s, B> {
    scope: &'s dyn SearchIndexScope,
    key: PredicateTypeKey<B>,
    field_sets: Vec<FieldSetState<B>>,
    predicate_boost: Option<f32>,
    constant_score: bool,
}

impl<'s, B: SearchPredicateBuilder> MultiFieldCommonState<'s, B> {
    /// Create an empty state for the given predicate kind.
    pub fn new(scope: &'s dyn SearchIndexScope, key: PredicateTypeKey<B>) -> Self {
        MultiFieldCommonState {
            scope,
            key,
            field_sets: Vec::new(),
            predicate_boost: None,
            constant_score: false,
        }
    }

    /// The scope fields are resolved against.
    pub fn scope(&self) -> &'s dyn SearchIndexScope {
        self.scope
    }

    /// Register a field set. Eager kinds resolve its builders now.
    pub fn add_field_set(&mut self, paths: Vec<String>) -> Result<()> {
        if paths.is_empty() {
            return Err(PilumError::invalid_argument(format!(
                "a field set of a {} predicate needs at least one field",
                self.key.name()
            )));
        }
        let mut field_set = FieldSetState::new(paths);
        if self.key.timing() == ResolutionTiming::Eager {
            field_set.resolve(self.scope, self.key)?;
        }
        trace!(
            predicate = self.key.name(),
            fields = ?field_set.paths(),
            "registered field set"
        );
        self.field_sets.push(field_set);
        Ok(())
    }

    /// Set the boost of the most recently added field set.
    ///
    /// Field steps only expose `boost` once a field set exists.
    pub fn set_field_set_boost(&mut self, boost: f32) {
        debug_assert!(!self.field_sets.is_empty(), "boost without a field set");
        if let Some(field_set) = self.field_sets.last_mut() {
            field_set.set_boost(boost);
        }
    }

    /// Resolve builders of field sets registered so far and not resolved yet.
    pub fn resolve_pending(&mut self) -> Result<()> {
        for field_set in &mut self.field_sets {
            field_set.resolve(self.scope, self.key)?;
        }
        Ok(())
    }

    /// Apply a fallible option to every builder of every registered field set.
    pub fn try_for_each_builder<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&mut B) -> Result<()>,
    {
        for field_set in &mut self.field_sets {
            for builder in field_set.builders_mut() {
                f(builder)?;
            }
        }
        Ok(())
    }

    /// Apply an option to every builder of every registered field set.
    pub fn for_each_builder<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut B),
    {
        for field_set in &mut self.field_sets {
            field_set.builders_mut().iter_mut().for_each(&mut f);
        }
    }

    /// Set the predicate-level boost.
    pub fn boost(&mut self, boost: f32) {
        self.predicate_boost = Some(boost);
    }

    /// Make every contributed predicate score with a constant score.
    pub fn constant_score(&mut self) -> Result<()> {
        if let Some(boost) = self.field_sets.iter().find_map(FieldSetState::boost) {
            return Err(PilumError::ContradictoryBoost { boost });
        }
        self.constant_score = true;
        Ok(())
    }

    /// Every absolute path of every field set, in declaration order.
    pub fn field_paths(&self) -> Vec<String> {
        self.field_sets
            .iter()
            .flat_map(|field_set| field_set.paths().iter().cloned())
            .collect()
    }

    /// Build the predicate: a single contribution is returned as-is, several
    /// are combined as `should` clauses of a boolean predicate.
    pub fn build(self) -> Result<SearchPredicate> {
        let mut predicates = Vec::new();
        for field_set in self.field_sets {
            field_set.contribute_predicates(self.predicate_boost, self.constant_score, &mut predicates)?;
        }

        debug!(
            predicate = self.key.name(),
            contributions = predicates.len(),
            "building multi-field predicate"
        );

        match predicates.len() {
            0 => Err(PilumError::NoFieldSet),
            1 => predicates.pop().ok_or(PilumError::NoFieldSet),
            _ => {
                let mut boolean = self.scope.new_boolean_builder();
                for predicate in predicates {
                    boolean.should(predicate);
                }
                boolean.build()
            }
        }
    }
}

/// First step of a field-level predicate: declare the targeted fields.
pub struct MultiFieldStep<'s, B> {
    state: MultiFieldCommonState<'s, B>,
    root: Option<String>,
}

impl<'s, B: SearchPredicateBuilder> MultiFieldStep<'s, B> {
    pub(crate) fn new(
        scope: &'s dyn SearchIndexScope,
        key: PredicateTypeKey<B>,
        root: Option<String>,
    ) -> Self {
        MultiFieldStep {
            state: MultiFieldCommonState::new(scope, key),
            root,
        }
    }

    /// Target one field.
    pub fn field(self, path: &str) -> Result<MultiFieldMoreStep<'s, B>> {
        self.fields([path])
    }

    /// Target several fields sharing the same options.
    pub fn fields<'p, I>(self, paths: I) -> Result<MultiFieldMoreStep<'s, B>>
    where
        I: IntoIterator<Item = &'p str>,
    {
        MultiFieldMoreStep {
            state: self.state,
            root: self.root,
        }
        .fields(paths)
    }
}

/// Field step after at least one field was declared.
pub struct MultiFieldMoreStep<'s, B> {
    state: MultiFieldCommonState<'s, B>,
    root: Option<String>,
}

impl<'s, B: SearchPredicateBuilder> MultiFieldMoreStep<'s, B> {
    /// Target one more field.
    pub fn field(self, path: &str) -> Result<Self> {
        self.fields([path])
    }

    /// Target more fields, as a new field set.
    pub fn fields<'p, I>(mut self, paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'p str>,
    {
        let paths = paths
            .into_iter()
            .map(|path| absolute_path(self.root.as_deref(), path))
            .collect();
        self.state.add_field_set(paths)?;
        Ok(self)
    }

    /// Boost the fields of the last `field(...)`/`fields(...)` call.
    pub fn boost(mut self, boost: f32) -> Self {
        self.state.set_field_set_boost(boost);
        self
    }

    pub(crate) fn state_mut(&mut self) -> &mut MultiFieldCommonState<'s, B> {
        &mut self.state
    }

    pub(crate) fn into_options(self) -> MultiFieldOptionsStep<'s, B> {
        MultiFieldOptionsStep { state: self.state }
    }
}

/// Options step after the value of a field-level predicate was supplied.
pub struct MultiFieldOptionsStep<'s, B> {
    state: MultiFieldCommonState<'s, B>,
}

impl<'s, B: SearchPredicateBuilder> MultiFieldOptionsStep<'s, B> {
    /// Boost the whole predicate.
    pub fn boost(mut self, boost: f32) -> Self {
        self.state.boost(boost);
        self
    }

    /// Score the whole predicate with a constant score.
    pub fn constant_score(mut self) -> Result<Self> {
        self.state.constant_score()?;
        Ok(self)
    }

    pub(crate) fn state_mut(&mut self) -> &mut MultiFieldCommonState<'s, B> {
        &mut self.state
    }
}

impl<B: SearchPredicateBuilder> PredicateFinalStep for MultiFieldOptionsStep<'_, B> {
    fn to_predicate(self) -> Result<SearchPredicate> {
        self.state.build()
    }
}

pub(crate) fn absolute_path(root: Option<&str>, path: &str) -> String {
    match root {
        Some(root) if !root.is_empty() => format!("{root}.{path}"),
        _ => path.to_string(),
    }
}
