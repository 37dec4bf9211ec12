//! Guard predicates for matching transition inputs.
//!
//! A guard is a pure boolean function. Transition rules use guards to decide
//! which inputs they react to, so a single rule can cover a whole family of
//! inputs (for example "any SR input with S=1 and R=0").

use std::fmt;
use std::sync::Arc;

/// Pure predicate over values of type `T`.
///
/// Guards are cheap to clone: the predicate lives behind an `Arc`.
///
/// # Example
///
/// ```rust
/// use logic_dojo::core::Guard;
///
/// let even = Guard::new(|n: &u8| n % 2 == 0);
///
/// assert!(even.check(&4));
/// assert!(!even.check(&3));
///
/// let exactly_five = Guard::equals(5u8);
/// assert!(exactly_five.check(&5));
/// assert!(!exactly_five.check(&6));
/// ```
pub struct Guard<T> {
    predicate: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> Guard<T> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and free of side effects.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Guard that accepts every value.
    pub fn always() -> Self {
        Guard::new(|_| true)
    }

    /// Check if the guard accepts this value.
    pub fn check(&self, value: &T) -> bool {
        (self.predicate)(value)
    }
}

impl<T> Guard<T>
where
    T: PartialEq + Send + Sync + 'static,
{
    /// Guard that accepts only values equal to `expected`.
    pub fn equals(expected: T) -> Self {
        Guard::new(move |value| *value == expected)
    }
}

impl<T> Clone for Guard<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<T> fmt::Debug for Guard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}
