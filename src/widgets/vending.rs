//! 15-cent vending machine accepting nickels and dimes.
//!
//! Outputs are attached to the transition that enters `Dispensing`, so an
//! overpaying dime raises `Dispense` and `Change(5)` in the same step. A
//! coin inserted while dispensing starts the next purchase.

use crate::core::{Enumerable, State};
use crate::machine::Widget;
use crate::render::Render;
use crate::table::{BuildError, Outcome, RuleBuilder, Table};
use crate::{state_enum, symbol_enum};
use serde::Serialize;
use std::fmt;

/// Price of one item, in cents.
pub const PRICE_CENTS: u32 = 15;

state_enum! {
    pub enum Credit {
        Cents0,
        Cents5,
        Cents10,
        Dispensing,
    }
}

symbol_enum! {
    pub enum Coin {
        Nickel,
        Dime,
    }
}

impl Coin {
    pub fn cents(&self) -> u32 {
        match self {
            Self::Nickel => 5,
            Self::Dime => 10,
        }
    }

    /// Parse a coin from its value (`5`, `10`) or name.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "5" | "n" | "nickel" => Some(Self::Nickel),
            "10" | "d" | "dime" => Some(Self::Dime),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum VendOutput {
    Dispense,
    Change(u32),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct VendingCounters {
    /// Cents inserted for the current purchase
    pub balance: u32,
    /// Change returned by the last dispense
    pub change: u32,
    /// Items dispensed since reset
    pub vended: u32,
}

pub struct VendingMachine {
    table: Table<Credit, Coin, VendOutput>,
}

impl VendingMachine {
    pub fn new() -> Result<Self, BuildError> {
        use Coin::{Dime, Nickel};
        use Credit::{Cents0, Cents10, Cents5, Dispensing};

        let rules = vec![
            (Cents0, Nickel, Cents5, vec![]),
            (Cents0, Dime, Cents10, vec![]),
            (Cents5, Nickel, Cents10, vec![]),
            (Cents5, Dime, Dispensing, vec![VendOutput::Dispense]),
            (Cents10, Nickel, Dispensing, vec![VendOutput::Dispense]),
            (
                Cents10,
                Dime,
                Dispensing,
                vec![VendOutput::Dispense, VendOutput::Change(5)],
            ),
            (Dispensing, Nickel, Cents5, vec![]),
            (Dispensing, Dime, Cents10, vec![]),
        ];

        let table = rules
            .into_iter()
            .try_fold(
                Table::builder().alphabet(Coin::all().iter().copied()),
                |builder, (from, coin, to, outputs)| {
                    let rule = outputs
                        .into_iter()
                        .fold(RuleBuilder::new().from(from).on(coin).to(to), |r, o| {
                            r.emit(o)
                        });
                    builder.rule(rule)
                },
            )?
            .build()?;

        Ok(Self { table })
    }
}

impl Widget for VendingMachine {
    type Table = Table<Credit, Coin, VendOutput>;
    type Counters = VendingCounters;

    fn label(&self) -> &str {
        "vending-machine"
    }

    fn table(&self) -> &Self::Table {
        &self.table
    }

    fn initial_state(&self) -> Credit {
        Credit::Cents0
    }

    fn initial_counters(&self) -> VendingCounters {
        VendingCounters::default()
    }

    fn after_transition(
        &self,
        counters: &mut VendingCounters,
        coin: &Coin,
        from: &Credit,
        outcome: &Outcome<Credit, VendOutput>,
    ) {
        counters.balance = match from {
            Credit::Dispensing => coin.cents(),
            _ => counters.balance + coin.cents(),
        };
        counters.change = 0;
        for output in &outcome.outputs {
            match output {
                VendOutput::Dispense => counters.vended += 1,
                VendOutput::Change(cents) => counters.change = *cents,
            }
        }
    }

    fn describe(
        &self,
        coin: &Coin,
        _from: &Credit,
        outcome: &Outcome<Credit, VendOutput>,
        counters: &VendingCounters,
    ) -> Option<String> {
        let mut line = format!("Inserted {}¢, balance {}¢", coin.cents(), counters.balance);
        if outcome.next == Credit::Dispensing {
            line.push_str(", dispensing");
            if counters.change > 0 {
                line.push_str(&format!(" with {}¢ change", counters.change));
            }
        }
        Some(line)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VendingView {
    pub state: String,
    pub balance: u32,
    pub dispensing: bool,
    pub change: u32,
}

impl Render for VendingMachine {
    type View = VendingView;

    fn render(&self, state: &Credit, counters: &VendingCounters) -> VendingView {
        VendingView {
            state: state.name().to_string(),
            balance: counters.balance,
            dispensing: *state == Credit::Dispensing,
            change: counters.change,
        }
    }
}

impl fmt::Display for VendingView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>3}¢ ", self.balance)?;
        if self.dispensing {
            write!(f, "DISPENSING")?;
            if self.change > 0 {
                write!(f, " (change {}¢)", self.change)?;
            }
            Ok(())
        } else {
            write!(f, "INSERT COIN")
        }
    }
}
