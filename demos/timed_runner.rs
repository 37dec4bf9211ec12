//! Timed Runner
//!
//! This example drives the traffic light from a real tokio timer while the
//! main task presses a manual override through the runner handle.
//!
//! Key concepts:
//! - The runner task owns the simulation
//! - Manual inputs and timer ticks share one command queue
//! - Snapshots are broadcast on a watch channel
//! - Shutdown hands the simulation back
//!
//! Run with: cargo run --example timed_runner

use logic_dojo::config::TrafficConfig;
use logic_dojo::core::State;
use logic_dojo::widgets::traffic_light::TrafficSignal;
use logic_dojo::widgets::TrafficLight;
use logic_dojo::{Simulation, TimedRunner};
use std::time::Duration;

#[tokio::main]
async fn main() {
    println!("=== Timed Runner ===\n");

    let timing = TrafficConfig {
        green_ticks: 4,
        yellow_ticks: 2,
    };
    let sim = Simulation::new(TrafficLight::new(timing).unwrap());
    let handle = TimedRunner::spawn(sim, Duration::from_millis(100));
    let mut updates = handle.subscribe();

    let watcher = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            println!(
                "  tick {:>2}: {} ({} left)",
                snapshot.ticks,
                snapshot.state.name(),
                snapshot.counters.remaining
            );
        }
    });

    handle.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(650)).await;

    println!("Manual override:");
    let result = handle.press(TrafficSignal::Expire).await.unwrap();
    println!("  {result:?}");

    tokio::time::sleep(Duration::from_millis(450)).await;
    handle.stop().await.unwrap();

    let sim = handle.shutdown().await.unwrap();
    watcher.await.unwrap();

    println!("\nFinal phase: {}", sim.current_state().name());
    println!("Steps logged: {}", sim.log().len());
    println!("\n=== Example Complete ===");
}
