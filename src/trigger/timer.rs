//! Real-time tick source backed by a tokio task.
//!
//! The task is the single owner of its [`Simulation`]. Commands and timer
//! ticks are handled one at a time by the same loop, so at most one
//! mutation is ever in flight and a stopped runner cannot tick.

use crate::machine::{InputOf, OutputOf, Simulation, Snapshot, StateOf, StepResult, Widget};
use crate::table::TableError;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

const COMMAND_BUFFER: usize = 32;

type SimSnapshot<W> = Snapshot<StateOf<W>, <W as Widget>::Counters>;
type SimResult<W> = StepResult<StateOf<W>, OutputOf<W>>;

/// Errors returned by a [`RunnerHandle`].
#[derive(Debug, Error, PartialEq)]
pub enum RunnerError {
    /// The runner task has shut down
    #[error("runner task is gone")]
    Closed,

    #[error(transparent)]
    Rejected(#[from] TableError),
}

enum Command<W: Widget> {
    Start,
    Stop,
    Press {
        input: InputOf<W>,
        reply: oneshot::Sender<Result<SimResult<W>, TableError>>,
    },
    Snapshot {
        reply: oneshot::Sender<SimSnapshot<W>>,
    },
    Shutdown {
        reply: oneshot::Sender<Simulation<W>>,
    },
}

/// Spawns timed simulations.
pub struct TimedRunner;

impl TimedRunner {
    /// Move `sim` into a new task that ticks it every `period` while
    /// running. The simulation starts stopped.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<W>(sim: Simulation<W>, period: Duration) -> RunnerHandle<W>
    where
        W: Widget + 'static,
    {
        let (commands, inbox) = mpsc::channel(COMMAND_BUFFER);
        let (updates, watcher) = watch::channel(sim.snapshot());

        info!(sim = %sim.id(), widget = sim.widget().label(), period_ms = period.as_millis() as u64, "timed runner spawned");
        tokio::spawn(run(sim, period, inbox, updates));

        RunnerHandle { commands, watcher }
    }
}

/// Cloneable control surface for a spawned runner.
pub struct RunnerHandle<W: Widget> {
    commands: mpsc::Sender<Command<W>>,
    watcher: watch::Receiver<SimSnapshot<W>>,
}

impl<W: Widget> Clone for RunnerHandle<W> {
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
            watcher: self.watcher.clone(),
        }
    }
}

impl<W: Widget> RunnerHandle<W> {
    /// Start ticking. The first tick fires one period from now.
    pub async fn start(&self) -> Result<(), RunnerError> {
        self.send(Command::Start).await
    }

    /// Stop ticking and cancel the pending interval.
    pub async fn stop(&self) -> Result<(), RunnerError> {
        self.send(Command::Stop).await
    }

    /// Deliver a manual input and wait for its result.
    pub async fn press(&self, input: InputOf<W>) -> Result<SimResult<W>, RunnerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Press { input, reply }).await?;
        let result = rx.await.map_err(|_| RunnerError::Closed)?;
        Ok(result?)
    }

    pub async fn snapshot(&self) -> Result<SimSnapshot<W>, RunnerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply }).await?;
        rx.await.map_err(|_| RunnerError::Closed)
    }

    /// Stop the task and take the simulation back.
    pub async fn shutdown(self) -> Result<Simulation<W>, RunnerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Shutdown { reply }).await?;
        rx.await.map_err(|_| RunnerError::Closed)
    }

    /// Receiver that sees a fresh snapshot after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<SimSnapshot<W>> {
        self.watcher.clone()
    }

    async fn send(&self, command: Command<W>) -> Result<(), RunnerError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| RunnerError::Closed)
    }
}

async fn run<W: Widget>(
    mut sim: Simulation<W>,
    period: Duration,
    mut inbox: mpsc::Receiver<Command<W>>,
    updates: watch::Sender<SimSnapshot<W>>,
) {
    let mut ticker: Option<Interval> = None;

    loop {
        tokio::select! {
            command = inbox.recv() => {
                let Some(command) = command else {
                    info!(sim = %sim.id(), "all runner handles dropped");
                    return;
                };
                match command {
                    Command::Start => {
                        sim.start();
                        ticker = Some(interval(period));
                    }
                    Command::Stop => {
                        sim.stop();
                        ticker = None;
                    }
                    Command::Press { input, reply } => {
                        let result = sim.step(input);
                        let _ = reply.send(result);
                    }
                    Command::Snapshot { reply } => {
                        let _ = reply.send(sim.snapshot());
                        continue;
                    }
                    Command::Shutdown { reply } => {
                        sim.stop();
                        info!(sim = %sim.id(), ticks = sim.ticks(), "timed runner shut down");
                        let _ = reply.send(sim);
                        return;
                    }
                }
                updates.send_replace(sim.snapshot());
            }
            _ = next_tick(&mut ticker) => {
                match sim.tick() {
                    Ok(StepResult::Halted) | Ok(StepResult::Paused) => {
                        debug!(sim = %sim.id(), "ticker cancelled");
                        ticker = None;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(sim = %sim.id(), error = %e, "tick rejected, stopping");
                        sim.stop();
                        ticker = None;
                    }
                }
                updates.send_replace(sim.snapshot());
            }
        }
    }
}

fn interval(period: Duration) -> Interval {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrafficConfig;
    use crate::widgets::traffic_light::{Phase, TrafficLight, TrafficSignal};

    const PERIOD: Duration = Duration::from_millis(100);

    fn light() -> Simulation<TrafficLight> {
        Simulation::new(TrafficLight::new(TrafficConfig {
            green_ticks: 2,
            yellow_ticks: 1,
        })
        .unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn runner_stays_idle_until_started() {
        let handle = TimedRunner::spawn(light(), PERIOD);

        time::sleep(PERIOD * 5).await;

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.ticks, 0);
        assert!(!snapshot.running);
        assert_eq!(snapshot.state, Phase::NsGreen);
    }

    #[tokio::test(start_paused = true)]
    async fn started_runner_ticks_on_period() {
        let handle = TimedRunner::spawn(light(), PERIOD);
        handle.start().await.unwrap();

        time::sleep(PERIOD * 2 + PERIOD / 2).await;

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.ticks, 2);
        assert_eq!(snapshot.state, Phase::NsYellow);
        assert!(snapshot.running);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_the_interval() {
        let handle = TimedRunner::spawn(light(), PERIOD);
        handle.start().await.unwrap();
        time::sleep(PERIOD + PERIOD / 2).await;
        handle.stop().await.unwrap();

        time::sleep(PERIOD * 10).await;

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.ticks, 1);
        assert!(!snapshot.running);
    }

    #[tokio::test(start_paused = true)]
    async fn press_applies_manual_input() {
        let handle = TimedRunner::spawn(light(), PERIOD);

        let result = handle.press(TrafficSignal::Expire).await.unwrap();

        assert_eq!(
            result,
            StepResult::Transitioned {
                from: Phase::NsGreen,
                to: Phase::NsYellow,
                outputs: vec![],
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_updates() {
        let handle = TimedRunner::spawn(light(), PERIOD);
        let mut updates = handle.subscribe();

        handle.press(TrafficSignal::Expire).await.unwrap();
        updates.changed().await.unwrap();

        assert_eq!(updates.borrow().state, Phase::NsYellow);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_returns_the_simulation() {
        let handle = TimedRunner::spawn(light(), PERIOD);
        let other = handle.clone();
        handle.start().await.unwrap();
        time::sleep(PERIOD * 3 + PERIOD / 2).await;

        let sim = handle.shutdown().await.unwrap();

        assert_eq!(sim.ticks(), 3);
        assert_eq!(sim.current_state(), &Phase::EwGreen);
        assert!(!sim.is_running());
        assert_eq!(other.snapshot().await, Err(RunnerError::Closed));
    }
}
