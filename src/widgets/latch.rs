//! Cross-coupled SR latch in NOR (active-high) and NAND (active-low) form.
//!
//! Driving both inputs active is the forbidden condition: the NOR form
//! pulls both outputs low, the NAND form pulls both high. Releasing the
//! inputs from there holds the forbidden state; the physical race that
//! decides the real outcome is not modeled.

use crate::core::{Enumerable, State};
use crate::machine::Widget;
use crate::render::{lamp, Render};
use crate::table::{BuildError, Outcome, RuleBuilder, Table, TableBuilder};
use crate::state_enum;
use serde::{Deserialize, Serialize};
use std::fmt;

state_enum! {
    pub enum LatchState {
        Reset,
        Set,
        Forbidden,
    }
    error: [Forbidden]
}

/// Gate family used for the cross-coupled pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LatchKind {
    Nor,
    Nand,
}

impl LatchKind {
    /// Pin level that asserts an input.
    pub fn active_level(&self) -> bool {
        matches!(self, Self::Nor)
    }
}

/// Levels on the S and R pins, as wired (NAND pins are active-low).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrInput {
    pub s: bool,
    pub r: bool,
}

impl SrInput {
    pub fn new(s: bool, r: bool) -> Self {
        Self { s, r }
    }

    /// Parse `S,R` pin levels such as `1,0`.
    pub fn parse(text: &str) -> Option<Self> {
        let (s, r) = text.split_once(',')?;
        let level = |t: &str| match t.trim() {
            "0" => Some(false),
            "1" => Some(true),
            _ => None,
        };
        Some(Self::new(level(s)?, level(r)?))
    }
}

impl Enumerable for SrInput {
    fn all() -> &'static [Self] {
        const ALL: &[SrInput] = &[
            SrInput { s: false, r: false },
            SrInput { s: false, r: true },
            SrInput { s: true, r: false },
            SrInput { s: true, r: true },
        ];
        ALL
    }
}

/// Levels of the Q and Q̄ outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LatchLevels {
    pub q: bool,
    pub q_bar: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LatchCounters {
    /// Pin levels most recently applied
    pub last: SrInput,
}

pub struct SrLatch {
    kind: LatchKind,
    table: Table<LatchState, SrInput, LatchLevels>,
}

impl SrLatch {
    pub fn new(kind: LatchKind) -> Result<Self, BuildError> {
        let mut builder = TableBuilder::new().alphabet(SrInput::all().iter().copied());
        for state in LatchState::all() {
            for input in SrInput::all() {
                let next = next_state(kind, state, input);
                builder = builder.rule(
                    RuleBuilder::new()
                        .from(state.clone())
                        .on(*input)
                        .to(next.clone())
                        .emit(levels(kind, &next)),
                )?;
            }
        }
        let table = builder.build()?;

        Ok(Self { kind, table })
    }

    pub fn kind(&self) -> LatchKind {
        self.kind
    }

    /// Pin levels after flipping the S (`true`) or R (`false`) pin of `last`.
    pub fn toggle(last: &SrInput, s_pin: bool) -> SrInput {
        if s_pin {
            SrInput::new(!last.s, last.r)
        } else {
            SrInput::new(last.s, !last.r)
        }
    }
}

fn next_state(kind: LatchKind, current: &LatchState, input: &SrInput) -> LatchState {
    let active = kind.active_level();
    match (input.s == active, input.r == active) {
        (true, true) => LatchState::Forbidden,
        (true, false) => LatchState::Set,
        (false, true) => LatchState::Reset,
        (false, false) => current.clone(),
    }
}

/// Output levels of `state`.
pub fn levels(kind: LatchKind, state: &LatchState) -> LatchLevels {
    match state {
        LatchState::Set => LatchLevels { q: true, q_bar: false },
        LatchState::Reset => LatchLevels { q: false, q_bar: true },
        LatchState::Forbidden => {
            let level = kind == LatchKind::Nand;
            LatchLevels { q: level, q_bar: level }
        }
    }
}

impl Widget for SrLatch {
    type Table = Table<LatchState, SrInput, LatchLevels>;
    type Counters = LatchCounters;

    fn label(&self) -> &str {
        match self.kind {
            LatchKind::Nor => "sr-latch-nor",
            LatchKind::Nand => "sr-latch-nand",
        }
    }

    fn table(&self) -> &Self::Table {
        &self.table
    }

    fn initial_state(&self) -> LatchState {
        LatchState::Reset
    }

    fn initial_counters(&self) -> LatchCounters {
        let idle = !self.kind.active_level();
        LatchCounters {
            last: SrInput::new(idle, idle),
        }
    }

    fn after_transition(
        &self,
        counters: &mut LatchCounters,
        input: &SrInput,
        _from: &LatchState,
        _outcome: &Outcome<LatchState, LatchLevels>,
    ) {
        counters.last = *input;
    }

    fn describe(
        &self,
        input: &SrInput,
        from: &LatchState,
        outcome: &Outcome<LatchState, LatchLevels>,
        _counters: &LatchCounters,
    ) -> Option<String> {
        let action = if outcome.next.is_error() {
            "INVALID"
        } else if outcome.next == *from {
            "hold"
        } else {
            outcome.next.name()
        };
        Some(format!(
            "S={} R={} -> {}",
            u8::from(input.s),
            u8::from(input.r),
            action
        ))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LatchView {
    pub kind: LatchKind,
    pub inputs: SrInput,
    pub outputs: LatchLevels,
    pub invalid: bool,
}

impl Render for SrLatch {
    type View = LatchView;

    fn render(&self, state: &LatchState, counters: &LatchCounters) -> LatchView {
        LatchView {
            kind: self.kind,
            inputs: counters.last,
            outputs: levels(self.kind, state),
            invalid: state.is_error(),
        }
    }
}

impl fmt::Display for LatchView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (s, r) = match self.kind {
            LatchKind::Nor => ("S", "R"),
            LatchKind::Nand => ("S̄", "R̄"),
        };
        write!(
            f,
            "{s}={} {r}={} | Q {} Q̄ {}",
            u8::from(self.inputs.s),
            u8::from(self.inputs.r),
            lamp(self.outputs.q),
            lamp(self.outputs.q_bar)
        )?;
        if self.invalid {
            write!(f, " | INVALID")?;
        }
        Ok(())
    }
}
