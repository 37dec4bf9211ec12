//! Two-state machine shown side by side as a Mealy and a Moore machine.
//!
//! Both share the same next-state logic: `S0 --1--> S1`, `S1 --0--> S0`,
//! otherwise hold. The Moore output is high in `S1`. The Mealy output is
//! high while in `S0` with input `1`, and is raised on that transition.

use crate::core::{Enumerable, State};
use crate::machine::{TickAction, Widget};
use crate::render::{lamp, Render};
use crate::table::{BuildError, Outcome, RuleBuilder, Table};
use crate::state_enum;
use crate::widgets::Bit;
use serde::{Deserialize, Serialize};
use std::fmt;

state_enum! {
    pub enum TwoState {
        S0,
        S1,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputStyle {
    Mealy,
    Moore,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MachineOutput {
    High,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MealyMooreCounters {
    /// Level on the input pin, sampled at each clock edge
    pub input: Bit,
}

pub struct MealyMoore {
    style: OutputStyle,
    table: Table<TwoState, Bit, MachineOutput>,
}

impl MealyMoore {
    pub fn new(style: OutputStyle) -> Result<Self, BuildError> {
        let mut builder = Table::builder().alphabet(Bit::all().iter().copied());
        for state in TwoState::all() {
            for bit in Bit::all() {
                let next = match (state, bit) {
                    (TwoState::S0, Bit::One) => TwoState::S1,
                    (TwoState::S1, Bit::Zero) => TwoState::S0,
                    _ => state.clone(),
                };
                let mut rule = RuleBuilder::new().from(state.clone()).on(*bit).to(next);
                if style == OutputStyle::Mealy && mealy_output(state, *bit) {
                    rule = rule.emit(MachineOutput::High);
                }
                builder = builder.rule(rule)?;
            }
        }
        let table = builder.build()?;

        Ok(Self { style, table })
    }

    pub fn style(&self) -> OutputStyle {
        self.style
    }

    /// Current output level: a function of the state alone (Moore) or of
    /// the state and the input pin (Mealy).
    pub fn output(&self, state: &TwoState, input: Bit) -> bool {
        match self.style {
            OutputStyle::Moore => *state == TwoState::S1,
            OutputStyle::Mealy => mealy_output(state, input),
        }
    }
}

fn mealy_output(state: &TwoState, input: Bit) -> bool {
    *state == TwoState::S0 && input == Bit::One
}

impl Widget for MealyMoore {
    type Table = Table<TwoState, Bit, MachineOutput>;
    type Counters = MealyMooreCounters;

    fn label(&self) -> &str {
        match self.style {
            OutputStyle::Mealy => "mealy",
            OutputStyle::Moore => "moore",
        }
    }

    fn table(&self) -> &Self::Table {
        &self.table
    }

    fn initial_state(&self) -> TwoState {
        TwoState::S0
    }

    fn initial_counters(&self) -> MealyMooreCounters {
        MealyMooreCounters { input: Bit::Zero }
    }

    fn on_tick(&self, _state: &TwoState, counters: &mut MealyMooreCounters) -> TickAction<Bit> {
        TickAction::Apply(counters.input)
    }

    fn after_transition(
        &self,
        counters: &mut MealyMooreCounters,
        input: &Bit,
        _from: &TwoState,
        _outcome: &Outcome<TwoState, MachineOutput>,
    ) {
        counters.input = *input;
    }

    fn describe(
        &self,
        input: &Bit,
        from: &TwoState,
        outcome: &Outcome<TwoState, MachineOutput>,
        counters: &MealyMooreCounters,
    ) -> Option<String> {
        Some(format!(
            "clock: {} --{}--> {}, output {}",
            from.name(),
            input,
            outcome.next.name(),
            u8::from(self.output(&outcome.next, counters.input))
        ))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MealyMooreView {
    pub style: OutputStyle,
    pub input: Bit,
    pub output: bool,
}

impl Render for MealyMoore {
    type View = MealyMooreView;

    fn render(&self, state: &TwoState, counters: &MealyMooreCounters) -> MealyMooreView {
        MealyMooreView {
            style: self.style,
            input: counters.input,
            output: self.output(state, counters.input),
        }
    }
}

impl fmt::Display for MealyMooreView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} | in {} | out {}",
            self.style,
            self.input,
            lamp(self.output)
        )
    }
}
