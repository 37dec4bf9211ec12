//! Logic Dojo: interactive digital-design widgets on a small FSM engine.
//!
//! Every widget (traffic light, vending machine, sequence detector, latches,
//! counters, shift registers, adders) is a pure transition table plus a
//! handful of counters. Combinational topics (gates, signed numbers,
//! Karnaugh maps) are plain functions beside the engine.
//! The engine around them is deliberately small:
//!
//! - **Tables**: deterministic `(state, input) -> (next, outputs)` lookups,
//!   checked for coverage when they are built
//! - **Simulation**: owns the current state and applies exactly one
//!   transition per trigger, keeping a bounded step log
//! - **Render**: pure views of a simulation, never mutating it
//! - **Triggers**: manual inputs, discrete ticks, or a real tokio timer
//!
//! # Example
//!
//! ```rust
//! use logic_dojo::widgets::sequence::SequenceDetector;
//! use logic_dojo::widgets::parse_tape;
//! use logic_dojo::{Simulation, TickDriver};
//!
//! let tape = parse_tape("1,0,1,1,0,1,0,1,1,1").unwrap();
//! let mut sim = Simulation::new(SequenceDetector::new(tape)?);
//! TickDriver::run(&mut sim, 20)?;
//!
//! assert_eq!(sim.counters().detections, vec![3, 8]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod core;
pub mod curriculum;
pub mod gates;
pub mod kmap;
pub mod machine;
pub mod profile;
pub mod render;
pub mod signed;
pub mod table;
pub mod telemetry;
pub mod trigger;
pub mod validation;
pub mod widgets;

// Re-export commonly used types
pub use config::SimConfig;
pub use core::{Enumerable, State, StepLog, StepRecord};
pub use machine::{Simulation, StepResult, TickAction, Widget};
pub use render::{Frame, Render};
pub use table::{Outcome, Table, TransitionTable};
pub use trigger::{TickDriver, TimedRunner, Trigger};
