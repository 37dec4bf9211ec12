//! Four-phase traffic light controller.
//!
//! Each phase dwells for a fixed number of ticks; the timer expiring is
//! the only input. North-south and east-west heads are derived from the
//! phase, so they can never both show green.

use crate::config::TrafficConfig;
use crate::core::Enumerable;
use crate::machine::{TickAction, Widget};
use crate::render::{lamp, Render};
use crate::table::{BuildError, Outcome, RuleBuilder, Table};
use crate::{state_enum, symbol_enum};
use serde::Serialize;
use std::fmt;

state_enum! {
    /// Controller phase. Only one direction is ever non-red.
    pub enum Phase {
        NsGreen,
        NsYellow,
        EwGreen,
        EwYellow,
    }
}

symbol_enum! {
    pub enum TrafficSignal {
        /// The phase timer ran out
        Expire,
    }
}

/// Color shown by one signal head.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Light {
    Red,
    Yellow,
    Green,
}

impl Phase {
    /// Colors of the (north-south, east-west) heads.
    pub fn lights(&self) -> (Light, Light) {
        match self {
            Self::NsGreen => (Light::Green, Light::Red),
            Self::NsYellow => (Light::Yellow, Light::Red),
            Self::EwGreen => (Light::Red, Light::Green),
            Self::EwYellow => (Light::Red, Light::Yellow),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrafficCounters {
    /// Ticks left in the current phase
    pub remaining: u32,
}

pub struct TrafficLight {
    table: Table<Phase, TrafficSignal, ()>,
    timing: TrafficConfig,
}

impl TrafficLight {
    pub fn new(timing: TrafficConfig) -> Result<Self, BuildError> {
        let cycle = [
            (Phase::NsGreen, Phase::NsYellow),
            (Phase::NsYellow, Phase::EwGreen),
            (Phase::EwGreen, Phase::EwYellow),
            (Phase::EwYellow, Phase::NsGreen),
        ];
        let table = cycle
            .into_iter()
            .try_fold(
                Table::builder().alphabet(TrafficSignal::all().iter().copied()),
                |builder, (from, to)| {
                    builder.rule(RuleBuilder::new().from(from).on(TrafficSignal::Expire).to(to))
                },
            )?
            .build()?;

        Ok(Self { table, timing })
    }

    /// Dwell time of `phase`, in ticks.
    pub fn dwell(&self, phase: &Phase) -> u32 {
        match phase {
            Phase::NsGreen | Phase::EwGreen => self.timing.green_ticks,
            Phase::NsYellow | Phase::EwYellow => self.timing.yellow_ticks,
        }
    }
}

impl Widget for TrafficLight {
    type Table = Table<Phase, TrafficSignal, ()>;
    type Counters = TrafficCounters;

    fn label(&self) -> &str {
        "traffic-light"
    }

    fn table(&self) -> &Self::Table {
        &self.table
    }

    fn initial_state(&self) -> Phase {
        Phase::NsGreen
    }

    fn initial_counters(&self) -> TrafficCounters {
        TrafficCounters {
            remaining: self.dwell(&Phase::NsGreen),
        }
    }

    fn on_tick(&self, _state: &Phase, counters: &mut TrafficCounters) -> TickAction<TrafficSignal> {
        if counters.remaining <= 1 {
            TickAction::Apply(TrafficSignal::Expire)
        } else {
            counters.remaining -= 1;
            TickAction::Wait
        }
    }

    fn after_transition(
        &self,
        counters: &mut TrafficCounters,
        _input: &TrafficSignal,
        _from: &Phase,
        outcome: &Outcome<Phase, ()>,
    ) {
        counters.remaining = self.dwell(&outcome.next);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrafficView {
    pub north_south: Light,
    pub east_west: Light,
    pub remaining: u32,
}

impl Render for TrafficLight {
    type View = TrafficView;

    fn render(&self, state: &Phase, counters: &TrafficCounters) -> TrafficView {
        let (north_south, east_west) = state.lights();
        TrafficView {
            north_south,
            east_west,
            remaining: counters.remaining,
        }
    }
}

fn head(light: Light) -> String {
    [Light::Red, Light::Yellow, Light::Green]
        .iter()
        .map(|l| lamp(*l == light))
        .collect()
}

impl fmt::Display for TrafficView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NS {} EW {} | {}s left",
            head(self.north_south),
            head(self.east_west),
            self.remaining
        )
    }
}
