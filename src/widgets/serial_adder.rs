//! Serial adder: one full adder and a carry flip-flop fed by two shift
//! registers, least significant bit first.

use crate::config::MAX_OPERAND_BITS;
use crate::core::{Enumerable, State};
use crate::machine::{TickAction, Widget};
use crate::render::{bit_string, Render};
use crate::table::{BuildError, Outcome, RuleBuilder, Table, TableBuilder};
use crate::state_enum;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from loading the operand registers.
#[derive(Debug, Error)]
pub enum AdderError {
    #[error("operand {operand} has {bits} bits; registers hold at most {max}")]
    OperandTooWide {
        operand: char,
        bits: usize,
        max: usize,
    },

    #[error(transparent)]
    Build(#[from] BuildError),
}

state_enum! {
    /// Contents of the carry flip-flop.
    pub enum Carry {
        CarryClear,
        CarrySet,
    }
}

impl Carry {
    pub fn is_set(&self) -> bool {
        matches!(self, Self::CarrySet)
    }
}

/// One bit from each operand register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitPair {
    pub a: bool,
    pub b: bool,
}

impl Enumerable for BitPair {
    fn all() -> &'static [Self] {
        const ALL: &[BitPair] = &[
            BitPair { a: false, b: false },
            BitPair { a: false, b: true },
            BitPair { a: true, b: false },
            BitPair { a: true, b: true },
        ];
        ALL
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AdderOutput {
    Sum(bool),
}

/// Full adder: `(sum, carry_out)`.
pub fn full_add(a: bool, b: bool, carry_in: bool) -> (bool, bool) {
    let sum = a ^ b ^ carry_in;
    let carry_out = (a && b) || (carry_in && (a ^ b));
    (sum, carry_out)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AdderCounters {
    /// Operand A, least significant bit first
    pub a: Vec<bool>,
    /// Operand B, least significant bit first
    pub b: Vec<bool>,
    /// Index of the next bit pair to shift out
    pub cursor: usize,
    /// Sum bits produced so far, least significant first
    pub sum: Vec<bool>,
}

impl AdderCounters {
    /// Register width: the longer operand.
    pub fn width(&self) -> usize {
        self.a.len().max(self.b.len())
    }

    /// The next bit pair, zero-padding the shorter register.
    pub fn next_pair(&self) -> Option<BitPair> {
        if self.cursor >= self.width() {
            return None;
        }
        let bit = |reg: &[bool]| reg.get(self.cursor).copied().unwrap_or(false);
        Some(BitPair {
            a: bit(&self.a),
            b: bit(&self.b),
        })
    }
}

pub struct SerialAdder {
    table: Table<Carry, BitPair, AdderOutput>,
    a: Vec<bool>,
    b: Vec<bool>,
}

impl SerialAdder {
    /// Adder loaded with operands written most significant bit first.
    ///
    /// Each operand may be at most [`MAX_OPERAND_BITS`] wide.
    pub fn new(a: &[bool], b: &[bool]) -> Result<Self, AdderError> {
        for (operand, bits) in [('A', a), ('B', b)] {
            if bits.len() > MAX_OPERAND_BITS {
                return Err(AdderError::OperandTooWide {
                    operand,
                    bits: bits.len(),
                    max: MAX_OPERAND_BITS,
                });
            }
        }

        let mut builder = TableBuilder::new().alphabet(BitPair::all().iter().copied());
        for carry in Carry::all() {
            for pair in BitPair::all() {
                let (sum, carry_out) = full_add(pair.a, pair.b, carry.is_set());
                let next = if carry_out {
                    Carry::CarrySet
                } else {
                    Carry::CarryClear
                };
                builder = builder.rule(
                    RuleBuilder::new()
                        .from(carry.clone())
                        .on(*pair)
                        .to(next)
                        .emit(AdderOutput::Sum(sum)),
                )?;
            }
        }
        let table = builder.build()?;

        Ok(Self {
            table,
            a: a.iter().rev().copied().collect(),
            b: b.iter().rev().copied().collect(),
        })
    }
}

impl Widget for SerialAdder {
    type Table = Table<Carry, BitPair, AdderOutput>;
    type Counters = AdderCounters;

    fn label(&self) -> &str {
        "serial-adder"
    }

    fn table(&self) -> &Self::Table {
        &self.table
    }

    fn initial_state(&self) -> Carry {
        Carry::CarryClear
    }

    fn initial_counters(&self) -> AdderCounters {
        AdderCounters {
            a: self.a.clone(),
            b: self.b.clone(),
            cursor: 0,
            sum: Vec::new(),
        }
    }

    fn reset_counters(&self, previous: &AdderCounters) -> AdderCounters {
        AdderCounters {
            a: previous.a.clone(),
            b: previous.b.clone(),
            ..self.initial_counters()
        }
    }

    fn on_tick(&self, _state: &Carry, counters: &mut AdderCounters) -> TickAction<BitPair> {
        match counters.next_pair() {
            Some(pair) => {
                counters.cursor += 1;
                TickAction::Apply(pair)
            }
            None => TickAction::Halt,
        }
    }

    fn after_transition(
        &self,
        counters: &mut AdderCounters,
        _input: &BitPair,
        _from: &Carry,
        outcome: &Outcome<Carry, AdderOutput>,
    ) {
        for AdderOutput::Sum(bit) in &outcome.outputs {
            counters.sum.push(*bit);
        }
    }

    fn describe(
        &self,
        pair: &BitPair,
        from: &Carry,
        outcome: &Outcome<Carry, AdderOutput>,
        _counters: &AdderCounters,
    ) -> Option<String> {
        let sum = outcome
            .outputs
            .iter()
            .map(|AdderOutput::Sum(bit)| u8::from(*bit))
            .next()
            .unwrap_or_default();
        Some(format!(
            "{} + {} + c{} = {} carry {}",
            u8::from(pair.a),
            u8::from(pair.b),
            u8::from(from.is_set()),
            sum,
            u8::from(outcome.next.is_set())
        ))
    }
}

/// Value of little-endian bits plus a carry above the top bit, or `None`
/// if it does not fit in a `u64`.
fn total(bits: &[bool], carry: bool) -> Option<u64> {
    let sum = bits.iter().rev().try_fold(0u64, |acc, bit| {
        acc.checked_mul(2)?.checked_add(u64::from(*bit))
    })?;
    if !carry {
        return Some(sum);
    }
    let shift = u32::try_from(bits.len()).ok()?;
    sum.checked_add(1u64.checked_shl(shift)?)
}

fn msb_first(bits: &[bool]) -> String {
    let ordered: Vec<bool> = bits.iter().rev().copied().collect();
    bit_string(&ordered)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AdderView {
    pub a: String,
    pub b: String,
    pub sum: String,
    pub carry: bool,
    /// Sum so far including the pending carry; `None` past 64 bits
    pub total: Option<u64>,
    pub finished: bool,
}

impl Render for SerialAdder {
    type View = AdderView;

    fn render(&self, state: &Carry, counters: &AdderCounters) -> AdderView {
        let carry = state.is_set();
        AdderView {
            a: msb_first(&counters.a),
            b: msb_first(&counters.b),
            sum: msb_first(&counters.sum),
            carry,
            total: total(&counters.sum, carry),
            finished: counters.cursor >= counters.width(),
        }
    }
}

impl fmt::Display for AdderView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A={} B={} | C={} | S={:>width$} = ",
            self.a,
            self.b,
            u8::from(self.carry),
            self.sum,
            width = self.a.len().max(self.b.len())
        )?;
        match self.total {
            Some(total) => write!(f, "{total}")?,
            None => write!(f, "?")?,
        }
        if self.finished {
            write!(f, " (done)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_bits;
    use crate::machine::{Simulation, StepResult};
    use crate::trigger::TickDriver;

    fn adder(a: &str, b: &str) -> Simulation<SerialAdder> {
        let a = parse_bits(a).unwrap();
        let b = parse_bits(b).unwrap();
        Simulation::new(SerialAdder::new(&a, &b).unwrap())
    }

    #[test]
    fn full_adder_truth_table() {
        assert_eq!(full_add(false, false, false), (false, false));
        assert_eq!(full_add(true, false, false), (true, false));
        assert_eq!(full_add(true, true, false), (false, true));
        assert_eq!(full_add(true, true, true), (true, true));
        assert_eq!(full_add(false, true, true), (false, true));
    }

    #[test]
    fn adds_five_and_three() {
        let mut sim = adder("0101", "0011");

        let results = TickDriver::run(&mut sim, 10).unwrap();

        assert_eq!(results.len(), 5);
        assert_eq!(results[4], StepResult::Halted);
        let view = sim.render();
        assert_eq!(view.sum, "1000");
        assert_eq!(view.total, Some(8));
        assert!(view.finished);
    }

    #[test]
    fn final_carry_counts_toward_total() {
        let mut sim = adder("1111", "0001");

        TickDriver::run(&mut sim, 10).unwrap();

        assert_eq!(sim.current_state(), &Carry::CarrySet);
        assert_eq!(sim.render().total, Some(16));
    }

    #[test]
    fn shorter_operand_is_zero_padded() {
        let mut sim = adder("110", "1");

        TickDriver::run(&mut sim, 10).unwrap();

        assert_eq!(sim.counters().sum.len(), 3);
        assert_eq!(sim.render().total, Some(7));
    }

    #[test]
    fn reset_keeps_operands() {
        let mut sim = adder("0101", "0011");
        TickDriver::run(&mut sim, 2).unwrap();

        sim.reset();

        assert_eq!(sim.counters().cursor, 0);
        assert!(sim.counters().sum.is_empty());
        assert_eq!(sim.render().a, "0101");
        assert_eq!(sim.current_state(), &Carry::CarryClear);
    }

    #[test]
    fn log_shows_each_bit_slice() {
        let mut sim = adder("01", "01");

        TickDriver::run(&mut sim, 10).unwrap();

        let notes: Vec<_> = sim.log().notes().collect();
        assert_eq!(notes, vec!["1 + 1 + c0 = 0 carry 1", "0 + 0 + c1 = 1 carry 0"]);
    }

    #[test]
    fn view_text() {
        let mut sim = adder("0101", "0011");
        TickDriver::run(&mut sim, 10).unwrap();

        assert_eq!(sim.render().to_string(), "A=0101 B=0011 | C=0 | S=1000 = 8 (done)");
    }

    #[test]
    fn wide_operands_are_rejected() {
        let wide = vec![true; MAX_OPERAND_BITS + 1];

        let err = SerialAdder::new(&[true], &wide).err().unwrap();
        assert!(matches!(
            err,
            AdderError::OperandTooWide { operand: 'B', bits: 17, max: 16 }
        ));
        assert!(SerialAdder::new(&vec![true; MAX_OPERAND_BITS], &[true]).is_ok());
    }

    #[test]
    fn long_manual_runs_render_without_overflow() {
        let mut sim = adder("1", "1");
        let ones = BitPair { a: true, b: true };
        for _ in 0..64 {
            sim.step(ones).unwrap();
        }

        let view = sim.render();
        assert_eq!(sim.counters().sum.len(), 64);
        assert_eq!(view.total, None);
        assert!(view.to_string().ends_with("= ?"));
    }

    #[test]
    fn total_is_exact_up_to_sixty_four_bits() {
        assert_eq!(total(&[false; 63], true), Some(1 << 63));
        assert_eq!(total(&[true; 64], false), Some(u64::MAX));
        assert_eq!(total(&[true; 64], true), None);
        assert_eq!(total(&[], true), Some(1));
    }
}
