//! The stepper and the widget definition it drives.
//!
//! A [`Widget`] bundles a transition table with the auxiliary counters a
//! teaching widget keeps next to its state (countdowns, tapes, balances).
//! A [`Simulation`] owns one widget instance and applies exactly one
//! transition per trigger.

mod simulation;
mod widget;

pub use simulation::{Simulation, Snapshot, StepResult};
pub use widget::{InputOf, OutputOf, StateOf, TickAction, Widget};
