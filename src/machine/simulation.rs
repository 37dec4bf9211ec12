//! The stepper: a single-owner simulation instance.

use crate::core::{State, StepLog, StepRecord, DEFAULT_LOG_LIMIT};
use crate::machine::widget::{InputOf, OutputOf, StateOf, TickAction, Widget};
use crate::table::{Outcome, TableError, TransitionTable};
use crate::trigger::Trigger;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Result of one trigger.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum StepResult<S, O> {
    /// A transition was applied (possibly a self-loop)
    Transitioned { from: S, to: S, outputs: Vec<O> },
    /// A tick was consumed without a transition
    Waiting,
    /// The timed source ran out; the simulation is now stopped
    Halted,
    /// A tick arrived while the simulation was stopped; nothing changed
    Paused,
}

impl<S, O> StepResult<S, O> {
    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Transitioned { .. })
    }

    /// Output signals of an applied transition, empty otherwise.
    pub fn outputs(&self) -> &[O] {
        match self {
            Self::Transitioned { outputs, .. } => outputs,
            _ => &[],
        }
    }
}

/// Serializable view of a simulation's mutable record.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot<S, C> {
    pub id: Uuid,
    pub widget: String,
    pub state: S,
    pub counters: C,
    pub running: bool,
    pub ticks: u64,
}

/// Mutable runtime record of one widget: current state, auxiliary
/// counters and the running flag.
///
/// A simulation is owned by exactly one controller. Every mutation goes
/// through [`step`](Self::step), [`tick`](Self::tick) or
/// [`reset`](Self::reset), so there is never more than one writer.
pub struct Simulation<W: Widget> {
    id: Uuid,
    widget: W,
    current: StateOf<W>,
    counters: W::Counters,
    running: bool,
    ticks: u64,
    log: StepLog<StateOf<W>>,
}

impl<W: Widget> Simulation<W> {
    /// Create a stopped simulation in the widget's initial state.
    pub fn new(widget: W) -> Self {
        Self::with_log_limit(widget, DEFAULT_LOG_LIMIT)
    }

    /// Create a simulation whose step log keeps at most `limit` records.
    pub fn with_log_limit(widget: W, limit: usize) -> Self {
        let current = widget.initial_state();
        let counters = widget.initial_counters();
        let id = Uuid::new_v4();
        debug!(sim = %id, widget = widget.label(), state = current.name(), "simulation created");
        Self {
            id,
            widget,
            current,
            counters,
            running: false,
            ticks: 0,
            log: StepLog::with_limit(limit),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn current_state(&self) -> &StateOf<W> {
        &self.current
    }

    pub fn counters(&self) -> &W::Counters {
        &self.counters
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn log(&self) -> &StepLog<StateOf<W>> {
        &self.log
    }

    /// Preview the outcome of `input` without applying it (pure).
    pub fn peek(
        &self,
        input: &InputOf<W>,
    ) -> Result<Outcome<StateOf<W>, OutputOf<W>>, TableError> {
        self.widget.table().next(&self.current, input)
    }

    /// Apply one transition.
    ///
    /// On error the simulation is left untouched.
    pub fn step(
        &mut self,
        input: InputOf<W>,
    ) -> Result<StepResult<StateOf<W>, OutputOf<W>>, TableError> {
        let outcome = self.peek(&input).inspect_err(|e| {
            warn!(sim = %self.id, widget = self.widget.label(), error = %e, "input rejected");
        })?;

        let from = std::mem::replace(&mut self.current, outcome.next.clone());
        self.widget
            .after_transition(&mut self.counters, &input, &from, &outcome);
        let note = self
            .widget
            .describe(&input, &from, &outcome, &self.counters);

        debug!(
            sim = %self.id,
            widget = self.widget.label(),
            from = from.name(),
            to = outcome.next.name(),
            tick = self.ticks,
            "transition applied"
        );

        self.log.record(StepRecord {
            from: from.clone(),
            to: outcome.next.clone(),
            tick: self.ticks,
            timestamp: Utc::now(),
            note,
        });

        Ok(StepResult::Transitioned {
            from,
            to: outcome.next,
            outputs: outcome.outputs,
        })
    }

    /// Handle one timer tick. Stopped simulations ignore ticks.
    pub fn tick(&mut self) -> Result<StepResult<StateOf<W>, OutputOf<W>>, TableError> {
        if !self.running {
            return Ok(StepResult::Paused);
        }

        let saved = self.counters.clone();
        self.ticks += 1;
        match self.widget.on_tick(&self.current, &mut self.counters) {
            TickAction::Wait => Ok(StepResult::Waiting),
            TickAction::Apply(input) => self.step(input).inspect_err(|_| {
                self.counters = saved;
                self.ticks -= 1;
            }),
            TickAction::Halt => {
                self.running = false;
                info!(sim = %self.id, widget = self.widget.label(), ticks = self.ticks, "timed source exhausted");
                Ok(StepResult::Halted)
            }
        }
    }

    /// Dispatch a trigger to [`step`](Self::step) or [`tick`](Self::tick).
    pub fn fire(
        &mut self,
        trigger: Trigger<InputOf<W>>,
    ) -> Result<StepResult<StateOf<W>, OutputOf<W>>, TableError> {
        match trigger {
            Trigger::Input(input) => self.step(input),
            Trigger::Tick => self.tick(),
        }
    }

    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            info!(sim = %self.id, widget = self.widget.label(), "simulation started");
        }
    }

    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            info!(sim = %self.id, widget = self.widget.label(), "simulation stopped");
        }
    }

    /// Return to the initial state, stop, and clear the step log.
    pub fn reset(&mut self) {
        self.running = false;
        self.current = self.widget.initial_state();
        self.counters = self.widget.reset_counters(&self.counters);
        self.ticks = 0;
        self.log.clear();
        info!(sim = %self.id, widget = self.widget.label(), "simulation reset");
    }

    /// Edit counters directly, for widget-specific controls such as
    /// appending a bit to a tape. The current state is not touched.
    pub fn adjust<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut W::Counters),
    {
        edit(&mut self.counters);
    }

    pub fn snapshot(&self) -> Snapshot<StateOf<W>, W::Counters> {
        Snapshot {
            id: self.id,
            widget: self.widget.label().to_string(),
            state: self.current.clone(),
            counters: self.counters.clone(),
            running: self.running,
            ticks: self.ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{RuleBuilder, Table, TableBuilder};
    use crate::{state_enum, symbol_enum};

    state_enum! {
        enum Phase {
            First,
            Second,
        }
    }

    symbol_enum! {
        enum Go {
            Next,
            Broken,
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize)]
    enum Flag {
        Wrapped,
    }

    /// Flips between two phases every `period` ticks; counts flips.
    struct Blinker {
        table: Table<Phase, Go, Flag>,
        period: u32,
        budget: u32,
    }

    #[derive(Clone, Debug, PartialEq, Serialize)]
    struct BlinkCounters {
        remaining: u32,
        flips: u32,
        budget: u32,
    }

    impl Blinker {
        fn new(period: u32, budget: u32) -> Self {
            let table = TableBuilder::new()
                .rule(RuleBuilder::new().from(Phase::First).on(Go::Next).to(Phase::Second))
                .and_then(|b| {
                    b.rule(
                        RuleBuilder::new()
                            .from(Phase::Second)
                            .on(Go::Next)
                            .to(Phase::First)
                            .emit(Flag::Wrapped),
                    )
                })
                .and_then(|b| b.build())
                .unwrap();
            Self {
                table,
                period,
                budget,
            }
        }
    }

    impl Widget for Blinker {
        type Table = Table<Phase, Go, Flag>;
        type Counters = BlinkCounters;

        fn label(&self) -> &str {
            "blinker"
        }

        fn table(&self) -> &Self::Table {
            &self.table
        }

        fn initial_state(&self) -> Phase {
            Phase::First
        }

        fn initial_counters(&self) -> BlinkCounters {
            BlinkCounters {
                remaining: self.period,
                flips: 0,
                budget: self.budget,
            }
        }

        fn on_tick(&self, _state: &Phase, counters: &mut BlinkCounters) -> TickAction<Go> {
            if counters.budget == 0 {
                return TickAction::Halt;
            }
            if counters.remaining > 1 {
                counters.remaining -= 1;
                return TickAction::Wait;
            }
            counters.budget -= 1;
            TickAction::Apply(Go::Next)
        }

        fn after_transition(
            &self,
            counters: &mut BlinkCounters,
            _input: &Go,
            _from: &Phase,
            _outcome: &Outcome<Phase, Flag>,
        ) {
            counters.remaining = self.period;
            counters.flips += 1;
        }

        fn describe(
            &self,
            _input: &Go,
            from: &Phase,
            outcome: &Outcome<Phase, Flag>,
            _counters: &BlinkCounters,
        ) -> Option<String> {
            Some(format!("{} -> {}", from.name(), outcome.next.name()))
        }
    }

    #[test]
    fn manual_step_applies_transition() {
        let mut sim = Simulation::new(Blinker::new(2, 10));

        let result = sim.step(Go::Next).unwrap();

        assert_eq!(
            result,
            StepResult::Transitioned {
                from: Phase::First,
                to: Phase::Second,
                outputs: vec![],
            }
        );
        assert_eq!(sim.current_state(), &Phase::Second);
        assert_eq!(sim.counters().flips, 1);
        assert_eq!(sim.log().len(), 1);
        assert_eq!(sim.log().notes().collect::<Vec<_>>(), vec!["First -> Second"]);
    }

    #[test]
    fn rejected_input_leaves_simulation_untouched() {
        let mut sim = Simulation::new(Blinker::new(2, 10));
        let before = sim.snapshot();

        let result = sim.step(Go::Broken);

        assert!(matches!(result, Err(TableError::NoTransition { .. })));
        assert_eq!(sim.snapshot(), before);
        assert!(sim.log().is_empty());
    }

    #[test]
    fn ticks_are_ignored_while_stopped() {
        let mut sim = Simulation::new(Blinker::new(1, 10));

        assert_eq!(sim.tick().unwrap(), StepResult::Paused);
        assert_eq!(sim.ticks(), 0);
        assert_eq!(sim.current_state(), &Phase::First);
    }

    #[test]
    fn ticks_count_down_before_transitioning() {
        let mut sim = Simulation::new(Blinker::new(3, 10));
        sim.start();

        assert_eq!(sim.tick().unwrap(), StepResult::Waiting);
        assert_eq!(sim.tick().unwrap(), StepResult::Waiting);
        assert!(sim.tick().unwrap().is_transition());
        assert_eq!(sim.current_state(), &Phase::Second);
        assert_eq!(sim.counters().remaining, 3);
    }

    #[test]
    fn wrap_transition_reports_outputs() {
        let mut sim = Simulation::new(Blinker::new(1, 10));
        sim.start();

        sim.tick().unwrap();
        let result = sim.tick().unwrap();

        assert_eq!(result.outputs(), &[Flag::Wrapped]);
        assert_eq!(sim.current_state(), &Phase::First);
    }

    #[test]
    fn halt_stops_the_simulation() {
        let mut sim = Simulation::new(Blinker::new(1, 1));
        sim.start();

        assert!(sim.tick().unwrap().is_transition());
        assert_eq!(sim.tick().unwrap(), StepResult::Halted);
        assert!(!sim.is_running());
        assert_eq!(sim.tick().unwrap(), StepResult::Paused);
    }

    #[test]
    fn fire_dispatches_triggers() {
        let mut sim = Simulation::new(Blinker::new(1, 5));

        assert!(sim.fire(Trigger::Input(Go::Next)).unwrap().is_transition());
        assert_eq!(sim.fire(Trigger::Tick).unwrap(), StepResult::Paused);
    }

    #[test]
    fn reset_restores_initial_record() {
        let mut sim = Simulation::new(Blinker::new(1, 5));
        sim.start();
        sim.tick().unwrap();
        sim.tick().unwrap();

        sim.reset();

        assert_eq!(sim.current_state(), &Phase::First);
        assert_eq!(sim.counters(), &sim.widget().initial_counters());
        assert!(!sim.is_running());
        assert_eq!(sim.ticks(), 0);
        assert!(sim.log().is_empty());
    }

    #[test]
    fn peek_does_not_mutate() {
        let sim = Simulation::new(Blinker::new(1, 5));

        let outcome = sim.peek(&Go::Next).unwrap();

        assert_eq!(outcome.next, Phase::Second);
        assert_eq!(sim.current_state(), &Phase::First);
    }

    #[test]
    fn log_limit_bounds_history() {
        let mut sim = Simulation::with_log_limit(Blinker::new(1, 100), 3);

        for _ in 0..10 {
            sim.step(Go::Next).unwrap();
        }

        assert_eq!(sim.log().len(), 3);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let sim = Simulation::new(Blinker::new(2, 1));

        let json = serde_json::to_value(sim.snapshot()).unwrap();

        assert_eq!(json["widget"], "blinker");
        assert_eq!(json["state"], "First");
        assert_eq!(json["counters"]["remaining"], 2);
        assert_eq!(json["running"], false);
    }
}
