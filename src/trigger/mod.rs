//! Trigger sources: manual inputs and periodic ticks.
//!
//! Manual inputs are delivered synchronously with [`Simulation::fire`].
//! Ticks come either from [`TickDriver`], which advances a simulation a
//! fixed number of discrete ticks, or from [`TimedRunner`], which owns a
//! simulation inside a tokio task and ticks it on a real interval.

mod timer;

pub use timer::{RunnerError, RunnerHandle, TimedRunner};

use crate::machine::{InputOf, OutputOf, Simulation, StateOf, StepResult, Widget};
use crate::table::TableError;
use serde::{Deserialize, Serialize};

/// One event delivered to the stepper.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Trigger<I> {
    /// A user action: a button press, a coin, a bit toggle
    Input(I),
    /// One clock period elapsed
    Tick,
}

/// Deterministic discrete tick source.
pub struct TickDriver;

impl TickDriver {
    /// Start `sim` and tick it up to `n` times.
    ///
    /// Stops early when the widget's timed source is exhausted or the
    /// simulation is stopped. Returns every result, in order.
    pub fn run<W: Widget>(
        sim: &mut Simulation<W>,
        n: usize,
    ) -> Result<Vec<StepResult<StateOf<W>, OutputOf<W>>>, TableError> {
        Self::run_with(sim, n, |_, _| {})
    }

    /// Like [`run`](Self::run), calling `observe` after every tick.
    pub fn run_with<W, F>(
        sim: &mut Simulation<W>,
        n: usize,
        mut observe: F,
    ) -> Result<Vec<StepResult<StateOf<W>, OutputOf<W>>>, TableError>
    where
        W: Widget,
        F: FnMut(&Simulation<W>, &StepResult<StateOf<W>, OutputOf<W>>),
    {
        sim.start();
        let mut results = Vec::with_capacity(n);
        for _ in 0..n {
            let result = sim.tick()?;
            observe(sim, &result);
            let done = matches!(result, StepResult::Halted | StepResult::Paused);
            results.push(result);
            if done {
                break;
            }
        }
        Ok(results)
    }

    /// Feed a sequence of manual inputs, stopping at the first rejection.
    pub fn feed<W, I>(
        sim: &mut Simulation<W>,
        inputs: I,
    ) -> Result<Vec<StepResult<StateOf<W>, OutputOf<W>>>, TableError>
    where
        W: Widget,
        I: IntoIterator<Item = InputOf<W>>,
    {
        inputs
            .into_iter()
            .map(|input| sim.fire(Trigger::Input(input)))
            .collect()
    }
}
