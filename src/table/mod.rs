//! Transition tables: the fixed `(state, input) -> (next state, outputs)`
//! mapping behind every widget.
//!
//! Tables are leaf data. Most widgets declare theirs with [`TableBuilder`]
//! and [`RuleBuilder`]; a widget whose inputs carry a payload (such as a
//! parallel-load value) implements [`TransitionTable`] by hand instead.
//!
//! # Example
//!
//! ```rust
//! use logic_dojo::table::{RuleBuilder, TableBuilder, TransitionTable};
//! use logic_dojo::core::Enumerable;
//! use logic_dojo::{state_enum, symbol_enum};
//!
//! state_enum! {
//!     enum Toggle { Low, High }
//! }
//!
//! symbol_enum! {
//!     enum Edge { Rise }
//! }
//!
//! let table = TableBuilder::<Toggle, Edge, ()>::new()
//!     .alphabet(Edge::all().iter().copied())
//!     .rule(RuleBuilder::new().from(Toggle::Low).on(Edge::Rise).to(Toggle::High))?
//!     .rule(RuleBuilder::new().from(Toggle::High).on(Edge::Rise).to(Toggle::Low))?
//!     .build()?;
//!
//! let outcome = table.next(&Toggle::Low, &Edge::Rise)?;
//! assert_eq!(outcome.next, Toggle::High);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod error;
pub mod macros;
pub mod rule;

pub use builder::TableBuilder;
pub use error::{BuildError, TableError};
pub use rule::{Rule, RuleBuilder};

use crate::core::State;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Pure result of one table lookup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outcome<S, O> {
    /// State the machine moves to (possibly the same state)
    pub next: S,
    /// Output signals raised by the transition, in rule order
    pub outputs: Vec<O>,
}

impl<S, O> Outcome<S, O> {
    /// Outcome with no output signals.
    pub fn to(next: S) -> Self {
        Self {
            next,
            outputs: Vec::new(),
        }
    }

    /// Outcome raising the given output signals.
    pub fn with(next: S, outputs: Vec<O>) -> Self {
        Self { next, outputs }
    }
}

/// A deterministic, side-effect-free transition function.
pub trait TransitionTable: Send + Sync {
    type State: State;
    type Input: Clone + Debug + Send + Sync;
    type Output: Clone + Debug + PartialEq + Serialize + Send + Sync;

    /// Look up the transition for `input` in `state`.
    ///
    /// Returns `TableError::NoTransition` when the pair is not covered.
    fn next(
        &self,
        state: &Self::State,
        input: &Self::Input,
    ) -> Result<Outcome<Self::State, Self::Output>, TableError>;
}

/// Table declared as a list of rules. The first matching rule wins; a
/// table built with an alphabet has exactly one match per covered pair.
#[derive(Clone, Debug)]
pub struct Table<S: State, I, O> {
    rules: Vec<Rule<S, I, O>>,
}

impl<S: State, I: Debug, O> Table<S, I, O> {
    pub fn builder() -> TableBuilder<S, I, O> {
        TableBuilder::new()
    }

    pub fn rules(&self) -> &[Rule<S, I, O>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<S, I, O> TransitionTable for Table<S, I, O>
where
    S: State,
    I: Clone + Debug + Send + Sync,
    O: Clone + Debug + PartialEq + Serialize + Send + Sync,
{
    type State = S;
    type Input = I;
    type Output = O;

    fn next(&self, state: &S, input: &I) -> Result<Outcome<S, O>, TableError> {
        self.rules
            .iter()
            .find(|r| r.matches(state, input))
            .map(Rule::outcome)
            .ok_or_else(|| TableError::NoTransition {
                from: state.name().to_string(),
                input: format!("{input:?}"),
            })
    }
}
