//! The per-widget definition consumed by the stepper.

use crate::table::{Outcome, TransitionTable};
use serde::Serialize;
use std::fmt::Debug;

/// State type of a widget's table.
pub type StateOf<W> = <<W as Widget>::Table as TransitionTable>::State;
/// Input alphabet of a widget's table.
pub type InputOf<W> = <<W as Widget>::Table as TransitionTable>::Input;
/// Output signals of a widget's table.
pub type OutputOf<W> = <<W as Widget>::Table as TransitionTable>::Output;

/// What a timer tick should do to a running simulation.
#[derive(Clone, Debug, PartialEq)]
pub enum TickAction<I> {
    /// Consume the tick without a transition (a countdown is still running)
    Wait,
    /// Apply one transition with this input
    Apply(I),
    /// The timed source is exhausted; stop the simulation
    Halt,
}

/// One interactive teaching widget: a transition table plus the auxiliary
/// counters the stepper keeps next to the current state.
///
/// Hooks default to "manual only": ticks halt immediately and counters are
/// left alone, which is right for button-driven widgets such as latches.
pub trait Widget: Send + Sync {
    type Table: TransitionTable;
    type Counters: Clone + Debug + PartialEq + Serialize + Send + Sync;

    /// Short name used in logs and snapshots.
    fn label(&self) -> &str;

    fn table(&self) -> &Self::Table;

    fn initial_state(&self) -> StateOf<Self>;

    fn initial_counters(&self) -> Self::Counters;

    /// Counters to restore on reset. Widgets that keep user-edited data
    /// across resets (a bit tape, operand registers) override this.
    fn reset_counters(&self, _previous: &Self::Counters) -> Self::Counters {
        self.initial_counters()
    }

    /// Decide what a timer tick does. May update counters (countdowns,
    /// tape cursors); the stepper rolls them back if the resulting
    /// transition fails.
    fn on_tick(
        &self,
        _state: &StateOf<Self>,
        _counters: &mut Self::Counters,
    ) -> TickAction<InputOf<Self>> {
        TickAction::Halt
    }

    /// Update counters after a transition has been applied.
    fn after_transition(
        &self,
        _counters: &mut Self::Counters,
        _input: &InputOf<Self>,
        _from: &StateOf<Self>,
        _outcome: &Outcome<StateOf<Self>, OutputOf<Self>>,
    ) {
    }

    /// Human-readable log line for an applied transition.
    fn describe(
        &self,
        _input: &InputOf<Self>,
        _from: &StateOf<Self>,
        _outcome: &Outcome<StateOf<Self>, OutputOf<Self>>,
        _counters: &Self::Counters,
    ) -> Option<String> {
        None
    }
}
