//! `range()` steps.

use crate::dsl::common::{MultiFieldMoreStep, MultiFieldOptionsStep, MultiFieldStep};
use crate::error::{PilumError, Result};
use crate::query::range::{Range, RangePredicateBuilder};
use crate::value::FieldValue;

pub type RangePredicateFieldStep<'s> = MultiFieldStep<'s, RangePredicateBuilder>;
pub type RangePredicateFieldMoreStep<'s> = MultiFieldMoreStep<'s, RangePredicateBuilder>;
pub type RangePredicateOptionsStep<'s> = MultiFieldOptionsStep<'s, RangePredicateBuilder>;

impl<'s> MultiFieldMoreStep<'s, RangePredicateBuilder> {
    /// Match documents whose fields fall within the range.
    ///
    /// A range without any bound is rejected, naming every targeted field.
    pub fn within<T: Into<FieldValue>>(mut self, range: Range<T>) -> Result<RangePredicateOptionsStep<'s>> {
        let range = range.into_values();
        let state = self.state_mut();
        if range.is_unbounded() {
            return Err(PilumError::NullRange {
                fields: state.field_paths(),
            });
        }
        state.try_for_each_builder(|builder| builder.range(range.clone()))?;
        Ok(self.into_options())
    }

    /// `lower <= value <= upper`.
    pub fn between<T: Into<FieldValue>>(self, lower: T, upper: T) -> Result<RangePredicateOptionsStep<'s>> {
        self.within(Range::between(lower, upper))
    }

    /// `value >= lower`.
    pub fn at_least<T: Into<FieldValue>>(self, lower: T) -> Result<RangePredicateOptionsStep<'s>> {
        self.within(Range::at_least(lower))
    }

    /// `value > lower`.
    pub fn greater_than<T: Into<FieldValue>>(self, lower: T) -> Result<RangePredicateOptionsStep<'s>> {
        self.within(Range::greater_than(lower))
    }

    /// `value <= upper`.
    pub fn at_most<T: Into<FieldValue>>(self, upper: T) -> Result<RangePredicateOptionsStep<'s>> {
        self.within(Range::at_most(upper))
    }

    /// `value < upper`.
    pub fn less_than<T: Into<FieldValue>>(self, upper: T) -> Result<RangePredicateOptionsStep<'s>> {
        self.within(Range::less_than(upper))
    }
}
