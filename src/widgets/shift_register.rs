//! 4-bit shift register in its four textbook data-movement modes.
//!
//! A clock shifts `serial in -> Q0 -> Q1 -> Q2 -> Q3 -> serial out`, except
//! in PIPO mode where it loads the parallel inputs. PISO also loads
//! directly, so a word can be latched and then clocked out bit by bit.
//! Inputs a mode lacks have no rule and are rejected by the table.

use crate::core::Enumerable;
use crate::machine::{TickAction, Widget};
use crate::render::{bit_string, lamp, Render};
use crate::state_enum;
use crate::table::{BuildError, Outcome, Rule, RuleBuilder, Table};
use serde::{Deserialize, Serialize};
use std::fmt;

state_enum! {
    /// Register contents, named `Q0 Q1 Q2 Q3`.
    pub enum Contents {
        Q0000, Q0001, Q0010, Q0011, Q0100, Q0101, Q0110, Q0111,
        Q1000, Q1001, Q1010, Q1011, Q1100, Q1101, Q1110, Q1111,
    }
}

impl Contents {
    /// Contents as a nibble with `Q0` most significant.
    pub fn value(&self) -> u8 {
        // at most 15
        self.index() as u8
    }

    /// Contents holding the low four bits of `value`.
    pub fn from_value(value: u8) -> Self {
        let all = Self::all();
        all[usize::from(value) % all.len()].clone()
    }

    /// Register bits `[Q0, Q1, Q2, Q3]`.
    pub fn bits(&self) -> [bool; 4] {
        let value = self.value();
        [3, 2, 1, 0].map(|shift| (value >> shift) & 1 == 1)
    }

    /// Shift right by one: `serial_in` enters `Q0` and `Q3` falls out.
    pub fn shifted(&self, serial_in: bool) -> (Self, bool) {
        let value = self.value();
        let next = (u8::from(serial_in) << 3) | (value >> 1);
        (Self::from_value(next), value & 1 == 1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegisterInput {
    /// Clock edge shifting in the given serial bit
    Shift(bool),
    /// Latch a 4-bit word, `Q0` most significant
    Load(u8),
    Clear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RegisterOutput {
    /// Bit that left `Q3` on a shift
    SerialOut(bool),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegisterMode {
    /// Serial in, serial out
    Siso,
    /// Serial in, parallel out
    Sipo,
    /// Parallel in, serial out
    Piso,
    /// Parallel in, parallel out
    Pipo,
}

impl RegisterMode {
    pub const ALL: [RegisterMode; 4] = [Self::Siso, Self::Sipo, Self::Piso, Self::Pipo];

    pub fn serial_input(&self) -> bool {
        matches!(self, Self::Siso | Self::Sipo)
    }

    pub fn parallel_input(&self) -> bool {
        matches!(self, Self::Piso | Self::Pipo)
    }

    pub fn serial_output(&self) -> bool {
        matches!(self, Self::Siso | Self::Piso)
    }

    pub fn parallel_output(&self) -> bool {
        matches!(self, Self::Sipo | Self::Pipo)
    }

    /// Whether the clock shifts (every mode but PIPO).
    pub fn shifts(&self) -> bool {
        !matches!(self, Self::Pipo)
    }

    /// Every input the mode accepts.
    pub fn inputs(&self) -> Vec<RegisterInput> {
        let mut inputs = vec![RegisterInput::Clear];
        if self.shifts() {
            inputs.extend([RegisterInput::Shift(false), RegisterInput::Shift(true)]);
        }
        if self.parallel_input() {
            inputs.extend((0..16).map(RegisterInput::Load));
        }
        inputs
    }
}

impl fmt::Display for RegisterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Siso => "SISO",
            Self::Sipo => "SIPO",
            Self::Piso => "PISO",
            Self::Pipo => "PIPO",
        };
        f.write_str(name)
    }
}

type RegisterRule = Rule<Contents, RegisterInput, RegisterOutput>;

fn mode_rules(mode: RegisterMode) -> Result<Vec<RegisterRule>, BuildError> {
    let mut rules = Vec::new();
    for word in Contents::all() {
        rules.push(
            RuleBuilder::new()
                .from(word.clone())
                .on(RegisterInput::Clear)
                .to(Contents::Q0000)
                .build()?,
        );
        if mode.shifts() {
            for bit in [false, true] {
                let (next, out) = word.shifted(bit);
                rules.push(
                    RuleBuilder::new()
                        .from(word.clone())
                        .on(RegisterInput::Shift(bit))
                        .to(next)
                        .emit(RegisterOutput::SerialOut(out))
                        .build()?,
                );
            }
        }
        if mode.parallel_input() {
            for data in 0..16 {
                rules.push(
                    RuleBuilder::new()
                        .from(word.clone())
                        .on(RegisterInput::Load(data))
                        .to(Contents::from_value(data))
                        .build()?,
                );
            }
        }
    }
    Ok(rules)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegisterCounters {
    /// Level on the serial input pin
    pub serial_in: bool,
    /// Word on the parallel input pins, `Q0` most significant
    pub parallel_in: u8,
    /// Bits shifted out of `Q3`, oldest first
    pub shifted_out: Vec<bool>,
}

impl RegisterCounters {
    /// Flip one parallel input; `bit` 0 drives `Q0`.
    pub fn toggle_parallel_bit(&mut self, bit: u8) {
        self.parallel_in ^= 0b1000 >> (bit & 0x03);
    }
}

pub struct ShiftRegister {
    table: Table<Contents, RegisterInput, RegisterOutput>,
    mode: RegisterMode,
}

impl ShiftRegister {
    pub fn new(mode: RegisterMode) -> Result<Self, BuildError> {
        let table = Table::builder()
            .alphabet(mode.inputs())
            .rules(mode_rules(mode)?)
            .build()?;
        Ok(Self { table, mode })
    }

    pub fn mode(&self) -> RegisterMode {
        self.mode
    }
}

impl Widget for ShiftRegister {
    type Table = Table<Contents, RegisterInput, RegisterOutput>;
    type Counters = RegisterCounters;

    fn label(&self) -> &str {
        "shift-register"
    }

    fn table(&self) -> &Self::Table {
        &self.table
    }

    fn initial_state(&self) -> Contents {
        Contents::Q0000
    }

    fn initial_counters(&self) -> RegisterCounters {
        RegisterCounters {
            serial_in: false,
            parallel_in: 0,
            shifted_out: Vec::new(),
        }
    }

    /// Input pins keep their levels across a reset.
    fn reset_counters(&self, previous: &RegisterCounters) -> RegisterCounters {
        RegisterCounters {
            serial_in: previous.serial_in,
            parallel_in: previous.parallel_in,
            shifted_out: Vec::new(),
        }
    }

    fn on_tick(
        &self,
        _state: &Contents,
        counters: &mut RegisterCounters,
    ) -> TickAction<RegisterInput> {
        if self.mode.shifts() {
            TickAction::Apply(RegisterInput::Shift(counters.serial_in))
        } else {
            TickAction::Apply(RegisterInput::Load(counters.parallel_in & 0x0F))
        }
    }

    fn after_transition(
        &self,
        counters: &mut RegisterCounters,
        _input: &RegisterInput,
        _from: &Contents,
        outcome: &Outcome<Contents, RegisterOutput>,
    ) {
        for RegisterOutput::SerialOut(bit) in &outcome.outputs {
            counters.shifted_out.push(*bit);
        }
    }

    fn describe(
        &self,
        input: &RegisterInput,
        from: &Contents,
        outcome: &Outcome<Contents, RegisterOutput>,
        _counters: &RegisterCounters,
    ) -> Option<String> {
        let from = bit_string(&from.bits());
        let to = bit_string(&outcome.next.bits());
        Some(match input {
            RegisterInput::Shift(bit) => {
                let out = outcome
                    .outputs
                    .iter()
                    .map(|RegisterOutput::SerialOut(b)| u8::from(*b))
                    .next()
                    .unwrap_or_default();
                format!("shift in {}: {from} -> {to}, out {out}", u8::from(*bit))
            }
            RegisterInput::Load(_) => format!("load: {from} -> {to}"),
            RegisterInput::Clear => format!("clear: {from} -> {to}"),
        })
    }
}

/// What the register shows; pins a mode lacks are `None`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegisterView {
    pub mode: RegisterMode,
    pub bits: [bool; 4],
    pub serial_in: Option<bool>,
    pub parallel_in: Option<String>,
    /// Level on the serial output pin (`Q3`)
    pub serial_out: Option<bool>,
    pub parallel_out: Option<String>,
}

impl Render for ShiftRegister {
    type View = RegisterView;

    fn render(&self, state: &Contents, counters: &RegisterCounters) -> RegisterView {
        let bits = state.bits();
        let mode = self.mode;
        let data = Contents::from_value(counters.parallel_in).bits();
        RegisterView {
            mode,
            bits,
            serial_in: mode.serial_input().then_some(counters.serial_in),
            parallel_in: mode.parallel_input().then(|| bit_string(&data)),
            serial_out: mode.serial_output().then_some(bits[3]),
            parallel_out: mode.parallel_output().then(|| bit_string(&bits)),
        }
    }
}

impl fmt::Display for RegisterView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mode)?;
        if let Some(bit) = self.serial_in {
            write!(f, " | SI={}", u8::from(bit))?;
        }
        if let Some(data) = &self.parallel_in {
            write!(f, " | D={data}")?;
        }
        let lamps: String = self.bits.iter().map(|b| lamp(*b)).collect();
        write!(f, " | Q0..Q3 {lamps}")?;
        if let Some(bit) = self.serial_out {
            write!(f, " | SO={}", u8::from(bit))?;
        }
        if let Some(word) = &self.parallel_out {
            write!(f, " | Q={word}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::Simulation;
    use crate::table::{TableError, TransitionTable};
    use crate::trigger::TickDriver;

    fn register(mode: RegisterMode) -> Simulation<ShiftRegister> {
        Simulation::new(ShiftRegister::new(mode).unwrap())
    }

    /// Clock once per bit with the serial input set to that bit.
    fn clock_in(sim: &mut Simulation<ShiftRegister>, bits: &[bool]) {
        sim.start();
        for &bit in bits {
            sim.adjust(|c| c.serial_in = bit);
            sim.tick().unwrap();
        }
    }

    #[test]
    fn shifting_moves_bits_toward_q3() {
        assert_eq!(Contents::Q0000.shifted(true), (Contents::Q1000, false));
        assert_eq!(Contents::Q1011.shifted(false), (Contents::Q0101, true));
        assert_eq!(Contents::Q0110.bits(), [false, true, true, false]);
    }

    #[test]
    fn siso_delays_a_bit_by_four_clocks() {
        let mut sim = register(RegisterMode::Siso);

        clock_in(&mut sim, &[true, false, false, false, false]);

        assert_eq!(sim.counters().shifted_out, vec![false, false, false, false, true]);
        assert_eq!(sim.current_state(), &Contents::Q0000);
    }

    #[test]
    fn sipo_presents_serial_word_in_parallel() {
        let mut sim = register(RegisterMode::Sipo);

        clock_in(&mut sim, &[true, true, false, true]);

        let view = sim.render();
        assert_eq!(view.parallel_out.as_deref(), Some("1011"));
        assert_eq!(view.serial_out, None);
        assert_eq!(view.to_string(), "SIPO | SI=1 | Q0..Q3 ●○●● | Q=1011");
    }

    #[test]
    fn piso_loads_then_shifts_out() {
        let mut sim = register(RegisterMode::Piso);
        sim.step(RegisterInput::Load(0b1011)).unwrap();

        TickDriver::run(&mut sim, 4).unwrap();

        assert_eq!(sim.counters().shifted_out, vec![true, true, false, true]);
        assert_eq!(sim.current_state(), &Contents::Q0000);
    }

    #[test]
    fn pipo_clock_loads_parallel_inputs() {
        let mut sim = register(RegisterMode::Pipo);
        sim.adjust(|c| c.parallel_in = 0b0110);

        TickDriver::run(&mut sim, 1).unwrap();

        assert_eq!(sim.current_state(), &Contents::Q0110);
        assert!(sim.counters().shifted_out.is_empty());
        assert_eq!(sim.render().to_string(), "PIPO | D=0110 | Q0..Q3 ○●●○ | Q=0110");
    }

    #[test]
    fn inputs_outside_the_mode_are_rejected() {
        let mut siso = register(RegisterMode::Siso);
        let mut pipo = register(RegisterMode::Pipo);

        assert!(matches!(
            siso.step(RegisterInput::Load(3)),
            Err(TableError::NoTransition { .. })
        ));
        assert!(matches!(
            pipo.step(RegisterInput::Shift(true)),
            Err(TableError::NoTransition { .. })
        ));
        assert!(pipo.step(RegisterInput::Load(16)).is_err());
    }

    #[test]
    fn clear_works_in_every_mode() {
        for mode in RegisterMode::ALL {
            let register = ShiftRegister::new(mode).unwrap();
            let outcome = register
                .table()
                .next(&Contents::Q1111, &RegisterInput::Clear)
                .unwrap();
            assert_eq!(outcome.next, Contents::Q0000, "{mode}");
        }
    }

    #[test]
    fn tables_cover_exactly_the_mode_inputs() {
        let rules = |mode| ShiftRegister::new(mode).unwrap().table().len();

        assert_eq!(rules(RegisterMode::Siso), 16 * 3);
        assert_eq!(rules(RegisterMode::Sipo), 16 * 3);
        assert_eq!(rules(RegisterMode::Piso), 16 * 19);
        assert_eq!(rules(RegisterMode::Pipo), 16 * 17);
    }

    #[test]
    fn reset_keeps_input_pins() {
        let mut sim = register(RegisterMode::Siso);
        clock_in(&mut sim, &[true, true]);

        sim.reset();

        assert!(sim.counters().serial_in);
        assert!(sim.counters().shifted_out.is_empty());
        assert_eq!(sim.current_state(), &Contents::Q0000);
    }

    #[test]
    fn parallel_bits_toggle_from_q0() {
        let mut counters = ShiftRegister::new(RegisterMode::Pipo)
            .unwrap()
            .initial_counters();

        counters.toggle_parallel_bit(0);
        counters.toggle_parallel_bit(3);

        assert_eq!(counters.parallel_in, 0b1001);
    }

    #[test]
    fn log_describes_shifts() {
        let mut sim = register(RegisterMode::Siso);
        clock_in(&mut sim, &[true]);

        let notes: Vec<_> = sim.log().notes().collect();
        assert_eq!(notes, vec!["shift in 1: 0000 -> 1000, out 0"]);
    }
}
