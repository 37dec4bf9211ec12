//! State traits for widget state machines.
//!
//! Every widget's state set is small, fixed, and enumerated by hand.
//! The `State` trait gives the simulation engine a name to log and render,
//! while `Enumerable` exposes the whole set so transition tables can be
//! checked for completeness when they are built.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for the states of a widget's finite state machine.
///
/// All methods are pure. A state value is one node of the widget's fixed
/// state set; the simulation only ever moves its "current" pointer.
///
/// # Required Traits
///
/// - `Clone`: states are copied into step records
/// - `PartialEq`: tables match on the current state
/// - `Debug`: states appear in diagnostics and errors
/// - `Serialize` + `Deserialize`: snapshots and JSON frames carry states
///
/// # Example
///
/// ```rust
/// use logic_dojo::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum LatchState {
///     Reset,
///     Set,
///     Forbidden,
/// }
///
/// impl State for LatchState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Reset => "Reset",
///             Self::Set => "Set",
///             Self::Forbidden => "Forbidden",
///         }
///     }
///
///     fn is_error(&self) -> bool {
///         matches!(self, Self::Forbidden)
///     }
/// }
///
/// assert_eq!(LatchState::Set.name(), "Set");
/// assert!(LatchState::Forbidden.is_error());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Display name used by logs, renderers and error messages.
    fn name(&self) -> &str;

    /// Check if this is a terminal state.
    ///
    /// Most teaching widgets cycle forever, so the default is `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this state represents an invalid or forbidden condition,
    /// such as an SR latch driven with both inputs active.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}

/// A closed, hand-enumerated set of values.
///
/// Implemented for state sets (usually through [`state_enum!`](crate::state_enum))
/// and for input alphabets, so that a table builder can verify every
/// `(state, input)` pair is covered exactly once.
pub trait Enumerable: Sized + 'static {
    /// Every member of the set, in declaration order.
    fn all() -> &'static [Self];

    /// Position of this value within [`Enumerable::all`].
    fn index(&self) -> usize
    where
        Self: PartialEq,
    {
        Self::all().iter().position(|s| s == self).unwrap_or_default()
    }

    /// Member at `index`, wrapping around the set size.
    fn from_index(index: usize) -> Option<&'static Self> {
        let all = Self::all();
        if all.is_empty() {
            None
        } else {
            all.get(index % all.len())
        }
    }
}
