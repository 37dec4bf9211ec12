//! Errors for building and consulting transition tables.

use thiserror::Error;

/// Errors that can occur when building rules and tables.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Rule source state not specified. Call .from(state)")]
    MissingFromState,

    #[error("Rule target state not specified. Call .to(state)")]
    MissingToState,

    #[error("Rule input not specified. Call .on(input) or .when(predicate)")]
    MissingInputMatcher,

    #[error("No rules defined. Add at least one rule")]
    NoRules,

    #[error("No rule handles input {input} in state '{state}'")]
    Incomplete { state: String, input: String },

    #[error("More than one rule handles input {input} in state '{state}'")]
    Ambiguous { state: String, input: String },
}

/// Errors raised while looking up a transition.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TableError {
    #[error("No transition from state '{from}' on input {input}")]
    NoTransition { from: String, input: String },
}
