//! 4-bit synchronous counter with parallel load.
//!
//! The count is sixteen named states; the next state is computed rather
//! than listed, because `Load` carries a payload that a rule list would
//! have to enumerate.

use crate::core::{Enumerable, State};
use crate::machine::{TickAction, Widget};
use crate::render::{bit_string, Render};
use crate::state_enum;
use crate::table::{Outcome, TableError, TransitionTable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of distinct counts.
pub const MODULUS: u8 = 16;

state_enum! {
    pub enum Count {
        S0, S1, S2, S3, S4, S5, S6, S7,
        S8, S9, S10, S11, S12, S13, S14, S15,
    }
}

impl Count {
    pub fn value(&self) -> u8 {
        // at most 15
        self.index() as u8
    }

    /// Bits Q3..Q0, most significant first.
    pub fn bits(&self) -> [bool; 4] {
        nibble(self.value())
    }
}

fn nibble(value: u8) -> [bool; 4] {
    [3, 2, 1, 0].map(|shift| (value >> shift) & 1 == 1)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CounterInput {
    /// Advance by one, wrapping 15 to 0
    Count,
    /// Load a value from the parallel inputs (masked to 4 bits)
    Load(u8),
    /// Synchronous clear
    Clear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CounterOutput {
    /// Raised on the 15 to 0 rollover
    Carry,
}

/// Computed transition function of the counter.
#[derive(Clone, Copy, Debug, Default)]
pub struct CounterTable;

impl TransitionTable for CounterTable {
    type State = Count;
    type Input = CounterInput;
    type Output = CounterOutput;

    fn next(
        &self,
        state: &Count,
        input: &CounterInput,
    ) -> Result<Outcome<Count, CounterOutput>, TableError> {
        let value = match input {
            CounterInput::Count => (state.value() + 1) % MODULUS,
            CounterInput::Load(data) => data & 0x0F,
            CounterInput::Clear => 0,
        };
        let next = Count::from_index(usize::from(value))
            .cloned()
            .ok_or_else(|| TableError::NoTransition {
                from: state.name().to_string(),
                input: format!("{input:?}"),
            })?;

        let rollover = matches!(input, CounterInput::Count) && value == 0;
        Ok(if rollover {
            Outcome::with(next, vec![CounterOutput::Carry])
        } else {
            Outcome::to(next)
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CounterCounters {
    /// Value on the parallel data inputs
    pub data: u8,
    /// When set, a clock pulse loads `data` instead of counting
    pub load_mode: bool,
    /// Clock pulses applied since reset
    pub pulses: u64,
    /// Carry-outs since reset
    pub carries: u64,
}

impl CounterCounters {
    /// Flip one data input; `bit` 3 is the MSB.
    pub fn toggle_data_bit(&mut self, bit: u8) {
        self.data ^= 1 << (bit & 0x03);
    }
}

pub struct ParallelLoadCounter {
    table: CounterTable,
    data: u8,
}

impl ParallelLoadCounter {
    /// Counter whose parallel inputs start at `data` (masked to 4 bits).
    pub fn new(data: u8) -> Self {
        Self {
            table: CounterTable,
            data: data & 0x0F,
        }
    }
}

impl Default for ParallelLoadCounter {
    fn default() -> Self {
        Self::new(0b1010)
    }
}

impl Widget for ParallelLoadCounter {
    type Table = CounterTable;
    type Counters = CounterCounters;

    fn label(&self) -> &str {
        "parallel-load-counter"
    }

    fn table(&self) -> &CounterTable {
        &self.table
    }

    fn initial_state(&self) -> Count {
        Count::S0
    }

    fn initial_counters(&self) -> CounterCounters {
        CounterCounters {
            data: self.data,
            load_mode: false,
            pulses: 0,
            carries: 0,
        }
    }

    fn reset_counters(&self, previous: &CounterCounters) -> CounterCounters {
        CounterCounters {
            data: previous.data,
            load_mode: previous.load_mode,
            ..self.initial_counters()
        }
    }

    fn on_tick(&self, _state: &Count, counters: &mut CounterCounters) -> TickAction<CounterInput> {
        if counters.load_mode {
            TickAction::Apply(CounterInput::Load(counters.data))
        } else {
            TickAction::Apply(CounterInput::Count)
        }
    }

    fn after_transition(
        &self,
        counters: &mut CounterCounters,
        input: &CounterInput,
        _from: &Count,
        outcome: &Outcome<Count, CounterOutput>,
    ) {
        if !matches!(input, CounterInput::Clear) {
            counters.pulses += 1;
        }
        if outcome.outputs.contains(&CounterOutput::Carry) {
            counters.carries += 1;
        }
    }

    fn describe(
        &self,
        input: &CounterInput,
        from: &Count,
        outcome: &Outcome<Count, CounterOutput>,
        _counters: &CounterCounters,
    ) -> Option<String> {
        let action = match input {
            CounterInput::Count => "count",
            CounterInput::Load(_) => "load",
            CounterInput::Clear => "clear",
        };
        Some(format!(
            "{action}: {} -> {}",
            bit_string(&from.bits()),
            bit_string(&outcome.next.bits())
        ))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CounterView {
    pub q: String,
    pub value: u8,
    pub data: String,
    pub load_mode: bool,
    pub pulses: u64,
}

impl Render for ParallelLoadCounter {
    type View = CounterView;

    fn render(&self, state: &Count, counters: &CounterCounters) -> CounterView {
        CounterView {
            q: bit_string(&state.bits()),
            value: state.value(),
            data: bit_string(&nibble(counters.data)),
            load_mode: counters.load_mode,
            pulses: counters.pulses,
        }
    }
}

impl fmt::Display for CounterView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Q={} ({:>2}) | D={} | {} | pulses {}",
            self.q,
            self.value,
            self.data,
            if self.load_mode { "LOAD" } else { "COUNT" },
            self.pulses
        )
    }
}
