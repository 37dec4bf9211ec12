//! 4-bit ring and Johnson (twisted-ring) counters.
//!
//! Both shift `Q0 -> Q1 -> Q2 -> Q3` on every clock. The ring feeds `Q3`
//! back into `Q0` and circulates a single hot bit through 4 states; the
//! Johnson counter feeds back `!Q3` and walks 8 states.

use crate::core::Enumerable;
use crate::machine::{TickAction, Widget};
use crate::render::{lamp, Render};
use crate::table::{BuildError, RuleBuilder, Table};
use crate::{state_enum, symbol_enum};
use serde::{Deserialize, Serialize};
use std::fmt;

state_enum! {
    /// Register contents, named `Q0 Q1 Q2 Q3`.
    pub enum ShiftState {
        R1000, R0100, R0010, R0001,
        J0000, J1000, J1100, J1110, J1111, J0111, J0011, J0001,
    }
}

symbol_enum! {
    pub enum ShiftInput {
        Shift,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftKind {
    Ring,
    Johnson,
}

impl ShiftState {
    /// Register bits `[Q0, Q1, Q2, Q3]`.
    pub fn bits(&self) -> [bool; 4] {
        let code: u8 = match self {
            Self::R1000 | Self::J1000 => 0b1000,
            Self::R0100 => 0b0100,
            Self::R0010 => 0b0010,
            Self::R0001 | Self::J0001 => 0b0001,
            Self::J0000 => 0b0000,
            Self::J1100 => 0b1100,
            Self::J1110 => 0b1110,
            Self::J1111 => 0b1111,
            Self::J0111 => 0b0111,
            Self::J0011 => 0b0011,
        };
        [3, 2, 1, 0].map(|shift| (code >> shift) & 1 == 1)
    }

    pub fn kind(&self) -> ShiftKind {
        match self {
            Self::R1000 | Self::R0100 | Self::R0010 | Self::R0001 => ShiftKind::Ring,
            _ => ShiftKind::Johnson,
        }
    }
}

impl ShiftKind {
    /// Legal register codes of this counter, in no particular order.
    pub fn codes(&self) -> impl Iterator<Item = &'static ShiftState> + '_ {
        ShiftState::all().iter().filter(move |s| s.kind() == *self)
    }

    pub fn seed(&self) -> ShiftState {
        match self {
            Self::Ring => ShiftState::R1000,
            Self::Johnson => ShiftState::J0000,
        }
    }

    /// Register contents after one clock.
    pub fn shift(&self, bits: [bool; 4]) -> [bool; 4] {
        let feedback = match self {
            Self::Ring => bits[3],
            Self::Johnson => !bits[3],
        };
        [feedback, bits[0], bits[1], bits[2]]
    }
}

pub struct ShiftCounter {
    kind: ShiftKind,
    table: Table<ShiftState, ShiftInput, ()>,
}

impl ShiftCounter {
    pub fn new(kind: ShiftKind) -> Result<Self, BuildError> {
        let mut builder = Table::builder();
        for code in kind.codes() {
            let shifted = kind.shift(code.bits());
            // every shift of a legal code is itself a legal code
            if let Some(next) = kind.codes().find(|c| c.bits() == shifted) {
                builder = builder.rule(
                    RuleBuilder::new()
                        .from(code.clone())
                        .on(ShiftInput::Shift)
                        .to(next.clone()),
                )?;
            }
        }
        let table = builder.build()?;

        Ok(Self { kind, table })
    }

    pub fn kind(&self) -> ShiftKind {
        self.kind
    }
}

impl Widget for ShiftCounter {
    type Table = Table<ShiftState, ShiftInput, ()>;
    type Counters = ();

    fn label(&self) -> &str {
        match self.kind {
            ShiftKind::Ring => "ring-counter",
            ShiftKind::Johnson => "johnson-counter",
        }
    }

    fn table(&self) -> &Self::Table {
        &self.table
    }

    fn initial_state(&self) -> ShiftState {
        self.kind.seed()
    }

    fn initial_counters(&self) -> Self::Counters {}

    fn on_tick(&self, _state: &ShiftState, _counters: &mut ()) -> TickAction<ShiftInput> {
        TickAction::Apply(ShiftInput::Shift)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShiftView {
    pub kind: ShiftKind,
    pub bits: [bool; 4],
}

impl Render for ShiftCounter {
    type View = ShiftView;

    fn render(&self, state: &ShiftState, _counters: &()) -> ShiftView {
        ShiftView {
            kind: self.kind,
            bits: state.bits(),
        }
    }
}

impl fmt::Display for ShiftView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lamps: String = self.bits.iter().map(|b| lamp(*b)).collect();
        write!(f, "{:?} Q0..Q3 {}", self.kind, lamps)
    }
}
