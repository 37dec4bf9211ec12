//! Traffic Light Widget
//!
//! This example steps the four-phase traffic light through one full cycle
//! with the discrete tick driver.
//!
//! Key concepts:
//! - Table-built widget with configurable dwell times
//! - One transition per clock tick
//! - Pure rendering of every frame
//! - Bounded step log with per-step notes
//!
//! Run with: cargo run --example traffic_light

use logic_dojo::config::TrafficConfig;
use logic_dojo::widgets::traffic_light::TrafficSignal;
use logic_dojo::widgets::TrafficLight;
use logic_dojo::{Simulation, TickDriver};

fn main() {
    println!("=== Traffic Light Widget ===\n");

    let timing = TrafficConfig {
        green_ticks: 3,
        yellow_ticks: 1,
    };
    let mut sim = Simulation::with_log_limit(TrafficLight::new(timing).unwrap(), 16);

    println!("{}", sim.frame());
    TickDriver::run_with(&mut sim, 8, |sim, _| println!("{}", sim.frame())).unwrap();

    println!("\nManual expire skips the rest of the dwell:");
    sim.step(TrafficSignal::Expire).unwrap();
    println!("{}", sim.frame());

    println!("\nStep log:");
    for record in sim.log().records() {
        println!("  tick {:>2}: {:?} -> {:?}", record.tick, record.from, record.to);
    }

    println!("\n=== Example Complete ===");
}
