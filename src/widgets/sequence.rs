//! Overlapping `1011` sequence detector fed from a bit tape.

use crate::core::{Enumerable, State};
use crate::machine::{TickAction, Widget};
use crate::render::Render;
use crate::table::{BuildError, Outcome, RuleBuilder, Table};
use crate::state_enum;
use crate::widgets::Bit;
use serde::Serialize;
use std::fmt;

/// The pattern recognized by [`SequenceDetector`].
pub const PATTERN: &str = "1011";

state_enum! {
    /// Longest suffix of the input that is a prefix of `1011`.
    pub enum Progress {
        Idle,
        Got1,
        Got10,
        Got101,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SequenceOutput {
    Detected,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SequenceCounters {
    pub tape: Vec<Bit>,
    /// Index of the next tape bit a tick will read
    pub cursor: usize,
    /// Bits consumed so far, from the tape or entered by hand
    pub bits_seen: usize,
    /// Zero-based positions of the bits that completed a match
    pub detections: Vec<usize>,
}

impl SequenceCounters {
    /// Append a bit to the end of the tape.
    pub fn push(&mut self, bit: Bit) {
        self.tape.push(bit);
    }

    pub fn detected(&self) -> usize {
        self.detections.len()
    }
}

pub struct SequenceDetector {
    table: Table<Progress, Bit, SequenceOutput>,
    tape: Vec<Bit>,
}

impl SequenceDetector {
    pub fn new(tape: Vec<Bit>) -> Result<Self, BuildError> {
        use Bit::{One, Zero};
        use Progress::{Got1, Got10, Got101, Idle};

        let rules = [
            (Idle, One, Got1, None),
            (Idle, Zero, Idle, None),
            (Got1, One, Got1, None),
            (Got1, Zero, Got10, None),
            (Got10, One, Got101, None),
            (Got10, Zero, Idle, None),
            (Got101, One, Got1, Some(SequenceOutput::Detected)),
            (Got101, Zero, Got10, None),
        ];

        let table = rules
            .into_iter()
            .try_fold(
                Table::builder().alphabet(Bit::all().iter().copied()),
                |builder, (from, bit, to, output)| {
                    let rule = RuleBuilder::new().from(from).on(bit).to(to);
                    builder.rule(match output {
                        Some(o) => rule.emit(o),
                        None => rule,
                    })
                },
            )?
            .build()?;

        Ok(Self { table, tape })
    }
}

impl Widget for SequenceDetector {
    type Table = Table<Progress, Bit, SequenceOutput>;
    type Counters = SequenceCounters;

    fn label(&self) -> &str {
        "sequence-detector"
    }

    fn table(&self) -> &Self::Table {
        &self.table
    }

    fn initial_state(&self) -> Progress {
        Progress::Idle
    }

    fn initial_counters(&self) -> SequenceCounters {
        SequenceCounters {
            tape: self.tape.clone(),
            cursor: 0,
            bits_seen: 0,
            detections: Vec::new(),
        }
    }

    /// Rewind to the start of the tape, keeping any bits the user added.
    fn reset_counters(&self, previous: &SequenceCounters) -> SequenceCounters {
        SequenceCounters {
            tape: previous.tape.clone(),
            ..self.initial_counters()
        }
    }

    fn on_tick(&self, _state: &Progress, counters: &mut SequenceCounters) -> TickAction<Bit> {
        match counters.tape.get(counters.cursor) {
            Some(bit) => {
                let bit = *bit;
                counters.cursor += 1;
                TickAction::Apply(bit)
            }
            None => TickAction::Halt,
        }
    }

    fn after_transition(
        &self,
        counters: &mut SequenceCounters,
        _input: &Bit,
        _from: &Progress,
        outcome: &Outcome<Progress, SequenceOutput>,
    ) {
        if outcome.outputs.contains(&SequenceOutput::Detected) {
            counters.detections.push(counters.bits_seen);
        }
        counters.bits_seen += 1;
    }

    fn describe(
        &self,
        bit: &Bit,
        from: &Progress,
        outcome: &Outcome<Progress, SequenceOutput>,
        counters: &SequenceCounters,
    ) -> Option<String> {
        let mut line = format!("{} --{}--> {}", from.name(), bit, outcome.next.name());
        if !outcome.outputs.is_empty() {
            line.push_str(&format!(" (match #{})", counters.detected()));
        }
        Some(line)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SequenceView {
    pub tape: String,
    pub cursor: usize,
    /// Index of the state in the `Idle, Got1, Got10, Got101` chain
    pub progress: usize,
    pub detected: usize,
}

impl Render for SequenceDetector {
    type View = SequenceView;

    fn render(&self, state: &Progress, counters: &SequenceCounters) -> SequenceView {
        SequenceView {
            tape: counters.tape.iter().map(Bit::to_string).collect(),
            cursor: counters.cursor,
            progress: state.index(),
            detected: counters.detected(),
        }
    }
}

impl fmt::Display for SequenceView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, bit) in self.tape.chars().enumerate() {
            if i + 1 == self.cursor {
                write!(f, "[{bit}]")?;
            } else {
                write!(f, " {bit} ")?;
            }
        }
        write!(
            f,
            " | matched {}/{} | detections {}",
            PATTERN.get(..self.progress).unwrap_or(PATTERN),
            PATTERN,
            self.detected
        )
    }
}
