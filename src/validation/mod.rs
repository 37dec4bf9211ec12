//! Accumulating validation for configuration and user-entered values.
//!
//! Checks return Stillwater's `Validation` so that every problem is
//! reported in one pass: a config with a zero tick period *and* a tape
//! containing a `2` yields both violations, not just the first.
//!
//! # Example
//!
//! ```rust
//! use logic_dojo::validation::Checks;
//!
//! let checks: Checks<u32> = Checks::new()
//!     .require_pred(|n| *n > 0, "period", "must be greater than zero")
//!     .require_pred(|n| *n < 10_000, "period", "must be under ten seconds");
//!
//! assert!(checks.check(&500).is_success());
//! assert_eq!(checks.into_result(&0).unwrap_err().len(), 1);
//! ```

pub(crate) mod checks;
mod violation;

pub use checks::{Check, Checks};
pub use violation::Violation;

/// Join violations into one line for error messages.
pub(crate) fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
