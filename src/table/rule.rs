//! Single transition rules and their builder.

use crate::core::{Guard, State};
use crate::table::error::BuildError;
use crate::table::Outcome;

/// One row of a transition table: in state `from`, an input accepted by
/// `input` moves the machine to `to` and emits `outputs`.
#[derive(Clone, Debug)]
pub struct Rule<S: State, I, O> {
    pub from: S,
    pub input: Guard<I>,
    pub to: S,
    pub outputs: Vec<O>,
}

impl<S: State, I, O: Clone> Rule<S, I, O> {
    /// Check if this rule fires for `input` in `state` (pure).
    pub fn matches(&self, state: &S, input: &I) -> bool {
        *state == self.from && self.input.check(input)
    }

    /// Outcome of firing this rule.
    pub fn outcome(&self) -> Outcome<S, O> {
        Outcome {
            next: self.to.clone(),
            outputs: self.outputs.clone(),
        }
    }
}

/// Builder for constructing rules with a fluent API.
///
/// # Example
///
/// ```
/// use logic_dojo::table::RuleBuilder;
/// use logic_dojo::{state_enum, symbol_enum};
///
/// state_enum! {
///     enum Door { Closed, Open }
/// }
///
/// symbol_enum! {
///     enum Push { Toggle }
/// }
///
/// let rule = RuleBuilder::<Door, Push, ()>::new()
///     .from(Door::Closed)
///     .on(Push::Toggle)
///     .to(Door::Open)
///     .build()
///     .unwrap();
///
/// assert!(rule.matches(&Door::Closed, &Push::Toggle));
/// assert!(!rule.matches(&Door::Open, &Push::Toggle));
/// ```
pub struct RuleBuilder<S: State, I, O> {
    from: Option<S>,
    to: Option<S>,
    input: Option<Guard<I>>,
    outputs: Vec<O>,
}

impl<S: State, I, O> RuleBuilder<S, I, O> {
    pub fn new() -> Self {
        Self {
            from: None,
            to: None,
            input: None,
            outputs: Vec::new(),
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: S) -> Self {
        self.from = Some(state);
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: S) -> Self {
        self.to = Some(state);
        self
    }

    /// Keep the machine in the source state.
    /// Must be called after `.from()`.
    pub fn stay(mut self) -> Self {
        self.to = self.from.clone();
        self
    }

    /// Match inputs with a guard predicate.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&I) -> bool + Send + Sync + 'static,
    {
        self.input = Some(Guard::new(predicate));
        self
    }

    /// Match inputs with a prepared guard.
    pub fn guard(mut self, guard: Guard<I>) -> Self {
        self.input = Some(guard);
        self
    }

    /// Emit an output signal when the rule fires. May be called repeatedly.
    pub fn emit(mut self, output: O) -> Self {
        self.outputs.push(output);
        self
    }

    /// Build the rule.
    pub fn build(self) -> Result<Rule<S, I, O>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;
        let input = self.input.ok_or(BuildError::MissingInputMatcher)?;

        Ok(Rule {
            from,
            input,
            to,
            outputs: self.outputs,
        })
    }
}

impl<S, I, O> RuleBuilder<S, I, O>
where
    S: State,
    I: PartialEq + Send + Sync + 'static,
{
    /// Match exactly one input symbol.
    pub fn on(self, input: I) -> Self {
        self.guard(Guard::equals(input))
    }
}

impl<S: State, I, O> Default for RuleBuilder<S, I, O> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state_enum, symbol_enum};

    state_enum! {
        enum TestState {
            Idle,
            Armed,
            Fired,
        }
    }

    symbol_enum! {
        enum TestInput {
            Arm,
            Trigger,
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    enum Signal {
        Bang,
    }

    #[test]
    fn builder_validates_required_fields() {
        let result = RuleBuilder::<TestState, TestInput, Signal>::new()
            .from(TestState::Idle)
            .on(TestInput::Arm)
            .build();

        assert!(matches!(result, Err(BuildError::MissingToState)));
    }

    #[test]
    fn builder_requires_source_state() {
        let result = RuleBuilder::<TestState, TestInput, Signal>::new()
            .to(TestState::Armed)
            .on(TestInput::Arm)
            .build();

        assert!(matches!(result, Err(BuildError::MissingFromState)));
    }

    #[test]
    fn builder_requires_input_matcher() {
        let result = RuleBuilder::<TestState, TestInput, Signal>::new()
            .from(TestState::Idle)
            .to(TestState::Armed)
            .build();

        assert!(matches!(result, Err(BuildError::MissingInputMatcher)));
    }

    #[test]
    fn stay_targets_source_state() {
        let rule = RuleBuilder::<TestState, TestInput, Signal>::new()
            .from(TestState::Armed)
            .stay()
            .on(TestInput::Arm)
            .build()
            .unwrap();

        assert_eq!(rule.to, TestState::Armed);
    }

    #[test]
    fn emitted_outputs_appear_in_outcome() {
        let rule = RuleBuilder::new()
            .from(TestState::Armed)
            .on(TestInput::Trigger)
            .to(TestState::Fired)
            .emit(Signal::Bang)
            .build()
            .unwrap();

        let outcome = rule.outcome();
        assert_eq!(outcome.next, TestState::Fired);
        assert_eq!(outcome.outputs, vec![Signal::Bang]);
    }

    #[test]
    fn predicate_rule_matches_input_family() {
        let rule = RuleBuilder::<TestState, u8, Signal>::new()
            .from(TestState::Idle)
            .when(|n| *n >= 10)
            .to(TestState::Armed)
            .build()
            .unwrap();

        assert!(rule.matches(&TestState::Idle, &10));
        assert!(rule.matches(&TestState::Idle, &15));
        assert!(!rule.matches(&TestState::Idle, &5));
        assert!(!rule.matches(&TestState::Armed, &15));
    }
}
