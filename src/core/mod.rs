//! Core state machine types.
//!
//! This module contains the pure pieces shared by every widget:
//! - State definitions via the `State` and `Enumerable` traits
//! - Guard predicates for matching inputs
//! - The bounded step log
//!
//! Nothing in this module performs I/O or touches a clock other than
//! stamping step records.

mod guard;
mod history;
mod state;

pub use guard::Guard;
pub use history::{StepLog, StepRecord, DEFAULT_LOG_LIMIT};
pub use state::{Enumerable, State};
