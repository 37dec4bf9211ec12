//! Builder for data-driven transition tables.

use crate::core::{Enumerable, State};
use crate::table::error::BuildError;
use crate::table::rule::{Rule, RuleBuilder};
use crate::table::Table;
use std::fmt::Debug;

/// Builder for constructing a [`Table`] with a fluent API.
///
/// When an input alphabet is supplied, `build()` also proves the table is
/// total and deterministic: every `(state, input)` pair must be handled by
/// exactly one rule.
pub struct TableBuilder<S: State, I, O> {
    rules: Vec<Rule<S, I, O>>,
    coverage: Option<(Vec<S>, Vec<I>)>,
}

impl<S: State, I: Debug, O> TableBuilder<S, I, O> {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            coverage: None,
        }
    }

    /// Add a rule using a builder.
    /// Returns an error if the rule fails validation.
    pub fn rule(mut self, builder: RuleBuilder<S, I, O>) -> Result<Self, BuildError> {
        self.rules.push(builder.build()?);
        Ok(self)
    }

    /// Add multiple rules at once.
    pub fn rules(mut self, rules: Vec<Rule<S, I, O>>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Require coverage of every state against `inputs`.
    pub fn alphabet<A>(mut self, inputs: A) -> Self
    where
        S: Enumerable,
        A: IntoIterator<Item = I>,
    {
        self.coverage = Some((S::all().to_vec(), inputs.into_iter().collect()));
        self
    }

    /// Build the table.
    pub fn build(self) -> Result<Table<S, I, O>, BuildError> {
        if self.rules.is_empty() {
            return Err(BuildError::NoRules);
        }

        if let Some((states, inputs)) = &self.coverage {
            for state in states {
                for input in inputs {
                    let hits = self
                        .rules
                        .iter()
                        .filter(|r| r.from == *state && r.input.check(input))
                        .count();
                    match hits {
                        0 => {
                            return Err(BuildError::Incomplete {
                                state: state.name().to_string(),
                                input: format!("{input:?}"),
                            })
                        }
                        1 => {}
                        _ => {
                            return Err(BuildError::Ambiguous {
                                state: state.name().to_string(),
                                input: format!("{input:?}"),
                            })
                        }
                    }
                }
            }
        }

        Ok(Table { rules: self.rules })
    }
}

impl<S: State, I: Debug, O> Default for TableBuilder<S, I, O> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state_enum, symbol_enum};

    state_enum! {
        enum Lamp {
            Off,
            On,
        }
    }

    symbol_enum! {
        enum Switch {
            Press,
            Hold,
        }
    }

    #[test]
    fn builder_requires_rules() {
        let result = TableBuilder::<Lamp, Switch, ()>::new().build();

        assert!(matches!(result, Err(BuildError::NoRules)));
    }

    #[test]
    fn rule_errors_propagate() {
        let result =
            TableBuilder::<Lamp, Switch, ()>::new().rule(RuleBuilder::new().from(Lamp::Off));

        assert!(matches!(result, Err(BuildError::MissingToState)));
    }

    #[test]
    fn alphabet_detects_missing_pairs() {
        let result = TableBuilder::<Lamp, Switch, ()>::new()
            .alphabet(Switch::all().iter().copied())
            .rule(RuleBuilder::new().from(Lamp::Off).on(Switch::Press).to(Lamp::On))
            .and_then(|b| {
                b.rule(RuleBuilder::new().from(Lamp::On).on(Switch::Press).to(Lamp::Off))
            })
            .and_then(|b| b.build());

        assert_eq!(
            result.err(),
            Some(BuildError::Incomplete {
                state: "Off".to_string(),
                input: "Hold".to_string(),
            })
        );
    }

    #[test]
    fn alphabet_detects_overlapping_rules() {
        let result = TableBuilder::<Lamp, Switch, ()>::new()
            .alphabet(Switch::all().iter().copied())
            .rule(RuleBuilder::new().from(Lamp::Off).when(|_| true).to(Lamp::On))
            .and_then(|b| b.rule(RuleBuilder::new().from(Lamp::Off).on(Switch::Hold).stay()))
            .and_then(|b| b.rule(RuleBuilder::new().from(Lamp::On).when(|_| true).stay()))
            .and_then(|b| b.build());

        assert_eq!(
            result.err(),
            Some(BuildError::Ambiguous {
                state: "Off".to_string(),
                input: "Hold".to_string(),
            })
        );
    }

    #[test]
    fn complete_table_builds() {
        let table = TableBuilder::<Lamp, Switch, ()>::new()
            .alphabet(Switch::all().iter().copied())
            .rule(RuleBuilder::new().from(Lamp::Off).on(Switch::Press).to(Lamp::On))
            .and_then(|b| b.rule(RuleBuilder::new().from(Lamp::On).on(Switch::Press).to(Lamp::Off)))
            .and_then(|b| b.rule(RuleBuilder::new().from(Lamp::Off).on(Switch::Hold).stay()))
            .and_then(|b| b.rule(RuleBuilder::new().from(Lamp::On).on(Switch::Hold).stay()))
            .and_then(|b| b.build())
            .unwrap();

        assert_eq!(table.len(), 4);
    }

    #[test]
    fn prebuilt_rules_join_the_coverage_check() {
        let rules = [Lamp::Off, Lamp::On]
            .into_iter()
            .map(|lamp| {
                RuleBuilder::<Lamp, Switch, ()>::new()
                    .from(lamp)
                    .when(|_| true)
                    .stay()
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        let table = TableBuilder::<Lamp, Switch, ()>::new()
            .alphabet(Switch::all().iter().copied())
            .rules(rules)
            .build()
            .unwrap();

        assert_eq!(table.len(), 2);
    }
}
