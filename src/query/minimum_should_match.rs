//! Minimum-should-match constraints.
//!
//! Constraints are accumulated as `(ceiling, requirement)` brackets while the
//! predicate is composed and resolved once the number of optional clauses is
//! known, at build time. The bracket with the greatest ceiling strictly below
//! the clause count applies; without one, no minimum applies.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PilumError, Result};

/// How many optional clauses must match once a ceiling is exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinimumShouldMatchRequirement {
    /// An absolute number; negative means "all but n".
    Number(i32),
    /// A percentage, floored; negative means "all but p%".
    Percent(i32),
}

impl MinimumShouldMatchRequirement {
    /// Compute the minimum for the given number of optional clauses.
    ///
    /// Computed in `i64` so that any `i32` requirement over any `i32` total
    /// is exact; the caller bounds-checks the result.
    pub fn apply(&self, total: i32) -> i64 {
        let total = i64::from(total);
        match *self {
            MinimumShouldMatchRequirement::Number(n) if n >= 0 => i64::from(n),
            MinimumShouldMatchRequirement::Number(n) => total + i64::from(n),
            MinimumShouldMatchRequirement::Percent(p) if p >= 0 => total * i64::from(p) / 100,
            MinimumShouldMatchRequirement::Percent(p) => total + total * i64::from(p) / 100,
        }
    }
}

impl fmt::Display for MinimumShouldMatchRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinimumShouldMatchRequirement::Number(n) => write!(f, "{n}"),
            MinimumShouldMatchRequirement::Percent(p) => write!(f, "{p}%"),
        }
    }
}

/// Ordered set of `(ceiling, requirement)` brackets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimumShouldMatchConstraints {
    brackets: BTreeMap<i32, MinimumShouldMatchRequirement>,
}

impl MinimumShouldMatchConstraints {
    /// Create an empty constraint set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bracket. Ceilings must be non-negative and distinct.
    pub fn add(&mut self, ceiling: i32, requirement: MinimumShouldMatchRequirement) -> Result<()> {
        if ceiling < 0 {
            return Err(PilumError::invalid_argument(format!(
                "minimumShouldMatch ceiling must be positive or zero, got {ceiling}"
            )));
        }
        if self.brackets.contains_key(&ceiling) {
            return Err(PilumError::invalid_argument(format!(
                "multiple minimumShouldMatch constraints for the same ceiling {ceiling}"
            )));
        }
        self.brackets.insert(ceiling, requirement);
        Ok(())
    }

    /// Whether no bracket was added.
    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// Iterate over brackets in ceiling order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, MinimumShouldMatchRequirement)> + '_ {
        self.brackets.iter().map(|(ceiling, req)| (*ceiling, *req))
    }

    /// Resolve the minimum for `total` optional clauses.
    ///
    /// Returns `Ok(None)` when no bracket applies and an error when the
    /// computed minimum falls outside `[1, total]`.
    pub fn resolve(&self, total: usize) -> Result<Option<i32>> {
        let total = i32::try_from(total).unwrap_or(i32::MAX);
        let Some((_, requirement)) = self.brackets.range(..total).next_back() else {
            return Ok(None);
        };

        let minimum = requirement.apply(total);
        match i32::try_from(minimum) {
            Ok(minimum) if (1..=total).contains(&minimum) => Ok(Some(minimum)),
            _ => Err(PilumError::MinimumShouldMatchOutOfBounds { minimum, total }),
        }
    }
}

impl fmt::Display for MinimumShouldMatchConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .brackets
            .iter()
            .map(|(ceiling, req)| {
                if *ceiling == 0 {
                    req.to_string()
                } else {
                    format!("{ceiling}<{req}")
                }
            })
            .collect();
        f.write_str(&parts.join(" "))
    }
}

/// A builder accepting minimum-should-match brackets.
pub trait MinimumShouldMatchBuilder {
    /// Add a `(ceiling, requirement)` bracket.
    fn minimum_should_match(
        &mut self,
        ceiling: i32,
        requirement: MinimumShouldMatchRequirement,
    ) -> Result<()>;
}

impl MinimumShouldMatchBuilder for MinimumShouldMatchConstraints {
    fn minimum_should_match(
        &mut self,
        ceiling: i32,
        requirement: MinimumShouldMatchRequirement,
    ) -> Result<()> {
        self.add(ceiling, requirement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use MinimumShouldMatchRequirement::{Number, Percent};

    #[test]
    fn test_requirement_arithmetic() {
        assert_eq!(Number(2).apply(5), 2);
        assert_eq!(Number(-1).apply(5), 4);
        assert_eq!(Percent(50).apply(5), 2);
        assert_eq!(Percent(-25).apply(4), 3);
    }

    #[test]
    fn test_greatest_ceiling_below_total_applies() {
        let mut constraints = MinimumShouldMatchConstraints::new();
        constraints.add(0, Number(1)).unwrap();
        constraints.add(3, Number(-1)).unwrap();
        constraints.add(6, Percent(50)).unwrap();

        assert_eq!(constraints.resolve(2).unwrap(), Some(1));
        assert_eq!(constraints.resolve(3).unwrap(), Some(1));
        assert_eq!(constraints.resolve(4).unwrap(), Some(3));
        assert_eq!(constraints.resolve(10).unwrap(), Some(5));
        assert_eq!(constraints.to_string(), "1 3<-1 6<50%");
    }

    #[test]
    fn test_no_applicable_bracket() {
        let mut constraints = MinimumShouldMatchConstraints::new();
        constraints.add(2, Number(2)).unwrap();
        assert_eq!(constraints.resolve(2).unwrap(), None);
        assert_eq!(MinimumShouldMatchConstraints::new().resolve(3).unwrap(), None);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut constraints = MinimumShouldMatchConstraints::new();
        constraints.add(0, Number(3)).unwrap();

        let err = constraints.resolve(1).unwrap_err();
        assert!(
            err.to_string()
                .contains("expected a number between 1 and 1, got 3")
        );

        let mut zero = MinimumShouldMatchConstraints::new();
        zero.add(0, Percent(10)).unwrap();
        assert!(matches!(
            zero.resolve(3),
            Err(PilumError::MinimumShouldMatchOutOfBounds { minimum: 0, total: 3 })
        ));
    }

    #[test]
    fn test_extreme_percentages_are_out_of_bounds() {
        let mut huge = MinimumShouldMatchConstraints::new();
        huge.add(0, Percent(i32::MAX)).unwrap();
        match huge.resolve(2) {
            Err(PilumError::MinimumShouldMatchOutOfBounds { minimum, total }) => {
                assert_eq!(minimum, 2 * i64::from(i32::MAX) / 100);
                assert_eq!(total, 2);
            }
            other => panic!("Expected out of bounds error, got {other:?}"),
        }

        let mut tiny = MinimumShouldMatchConstraints::new();
        tiny.add(0, Percent(i32::MIN)).unwrap();
        match tiny.resolve(2) {
            Err(PilumError::MinimumShouldMatchOutOfBounds { minimum, total }) => {
                assert_eq!(minimum, 2 + 2 * i64::from(i32::MIN) / 100);
                assert_eq!(total, 2);
            }
            other => panic!("Expected out of bounds error, got {other:?}"),
        }

        let mut all_but = MinimumShouldMatchConstraints::new();
        all_but.add(0, Number(i32::MIN)).unwrap();
        assert!(all_but.resolve(3).is_err());
    }

    #[test]
    fn test_invalid_ceilings() {
        let mut constraints = MinimumShouldMatchConstraints::new();
        assert!(constraints.add(-1, Number(1)).is_err());
        constraints.add(2, Number(1)).unwrap();
        assert!(constraints.add(2, Percent(50)).is_err());
    }
}
