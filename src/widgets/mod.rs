//! The textbook digital-design widgets.
//!
//! Each widget pairs a transition table with its own counters and view.
//! Widgets are independent of one another; they only share the engine.

pub mod counter;
pub mod latch;
pub mod mealy_moore;
pub mod sequence;
pub mod serial_adder;
pub mod shift;
pub mod shift_register;
pub mod traffic_light;
pub mod vending;

pub use counter::ParallelLoadCounter;
pub use latch::{LatchKind, SrLatch};
pub use mealy_moore::{MealyMoore, OutputStyle};
pub use sequence::SequenceDetector;
pub use serial_adder::SerialAdder;
pub use shift::{ShiftCounter, ShiftKind};
pub use shift_register::{RegisterMode, ShiftRegister};
pub use traffic_light::TrafficLight;
pub use vending::VendingMachine;

use crate::symbol_enum;
use std::fmt;

symbol_enum! {
    /// A single logic level used as an input symbol.
    pub enum Bit {
        Zero,
        One,
    }
}

impl Bit {
    pub fn from_bool(level: bool) -> Self {
        if level {
            Self::One
        } else {
            Self::Zero
        }
    }

    pub fn is_high(&self) -> bool {
        matches!(self, Self::One)
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_high() { "1" } else { "0" })
    }
}

/// Parse a `0`/`1` string into bits, in the order written.
///
/// Commas and whitespace are ignored, so `"1,0,1,1"` and `"1011"` are
/// equivalent. Returns `None` on any other character.
pub fn parse_tape(text: &str) -> Option<Vec<Bit>> {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| match c {
            '0' => Some(Bit::Zero),
            '1' => Some(Bit::One),
            _ => None,
        })
        .collect()
}
