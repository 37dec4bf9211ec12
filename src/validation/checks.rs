//! Builder for accumulating checks.

use crate::validation::violation::Violation;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Type alias for validation check functions
pub type Check<T> = Box<dyn Fn(&T) -> Validation<(), NonEmptyVec<Violation>> + Send + Sync>;

/// A list of checks run together against one value.
pub struct Checks<T> {
    checks: Vec<Check<T>>,
}

impl<T> Checks<T> {
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Add a custom validation check
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&T) -> Validation<(), NonEmptyVec<Violation>> + Send + Sync + 'static,
    {
        self.checks.push(Box::new(check));
        self
    }

    /// Add a simple predicate check with error message
    pub fn require_pred<F>(
        mut self,
        predicate: F,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let field = field.into();
        let message = message.into();
        let check = move |value: &T| {
            if predicate(value) {
                Validation::success(())
            } else {
                Validation::fail(Violation::invalid(field.clone(), message.clone()))
            }
        };
        self.checks.push(Box::new(check));
        self
    }

    /// Run every check, accumulating ALL violations.
    pub fn check(&self, value: &T) -> Validation<(), NonEmptyVec<Violation>> {
        let results: Vec<_> = self.checks.iter().map(|check| check(value)).collect();
        Validation::all_vec(results).map(|_| ())
    }

    /// Run every check and collect violations into a plain `Result`.
    pub fn into_result(&self, value: &T) -> Result<(), Vec<Violation>> {
        match self.check(value) {
            Validation::Success(_) => Ok(()),
            Validation::Failure(errors) => Err(errors.iter().cloned().collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl<T> Default for Checks<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that `value` is a non-empty string of `0`/`1` digits.
pub(crate) fn binary(field: &str, value: &str) -> Validation<(), NonEmptyVec<Violation>> {
    if !value.is_empty() && value.chars().all(|c| c == '0' || c == '1') {
        Validation::success(())
    } else {
        Validation::fail(Violation::NotBinary {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

/// Check that `value` lies in `min..=max`.
pub(crate) fn in_range(
    field: &str,
    value: i64,
    min: i64,
    max: i64,
) -> Validation<(), NonEmptyVec<Violation>> {
    if (min..=max).contains(&value) {
        Validation::success(())
    } else {
        Validation::fail(Violation::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Window {
        low: i64,
        high: i64,
    }

    #[test]
    fn empty_checks_succeed() {
        let checks: Checks<Window> = Checks::new();

        assert!(checks.is_empty());
        assert!(checks.check(&Window { low: 0, high: 0 }).is_success());
    }

    #[test]
    fn checks_accumulate_all_violations() {
        let checks = Checks::new()
            .require_pred(|w: &Window| w.low >= 0, "low", "must not be negative")
            .require_pred(|w: &Window| w.high > w.low, "high", "must exceed low")
            .require(|w: &Window| in_range("high", w.high, 0, 15));

        let result = checks.check(&Window { low: -1, high: -5 });

        match result {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 3);
                let fields: Vec<_> = errors.iter().map(Violation::field).collect();
                assert_eq!(fields, vec!["low", "high", "high"]);
            }
            Validation::Success(_) => panic!("expected violations"),
        }
    }

    #[test]
    fn passing_value_is_success() {
        let checks = Checks::new()
            .require_pred(|w: &Window| w.low >= 0, "low", "must not be negative")
            .require(|w: &Window| in_range("high", w.high, 0, 15));

        assert_eq!(checks.into_result(&Window { low: 2, high: 9 }), Ok(()));
    }

    #[test]
    fn into_result_lists_violations() {
        let checks = Checks::new().require(|w: &Window| in_range("low", w.low, 0, 1));

        let errors = checks.into_result(&Window { low: 7, high: 0 }).unwrap_err();

        assert_eq!(
            errors,
            vec![Violation::OutOfRange {
                field: "low".to_string(),
                value: 7,
                min: 0,
                max: 1,
            }]
        );
        assert_eq!(errors[0].to_string(), "low: 7 is outside 0..=1");
    }

    #[test]
    fn binary_rejects_other_digits() {
        assert!(binary("tape", "1011").is_success());
        assert!(binary("tape", "10a1").is_failure());
        assert!(binary("tape", "").is_failure());
    }
}
