//! `logic-dojo` command-line front end.
//!
//! Runs one widget per invocation and prints a frame per step.
//!
//! ## Environment Variables
//!
//! - `LOG_FORMAT=json` for structured log output
//! - `RUST_LOG=debug` to see every transition

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use logic_dojo::config::{self, parse_bits, SimConfig};
use logic_dojo::core::State;
use logic_dojo::curriculum::{flatten, neighbors, DIGITAL_DESIGN};
use logic_dojo::gates::{build_from, Gate, Universal};
use logic_dojo::kmap::KMap;
use logic_dojo::machine::InputOf;
use logic_dojo::render::{Frame, Render};
use logic_dojo::signed;
use logic_dojo::telemetry::init_tracing;
use logic_dojo::widgets::counter::CounterInput;
use logic_dojo::widgets::latch::SrInput;
use logic_dojo::widgets::shift_register::RegisterInput;
use logic_dojo::widgets::vending::Coin;
use logic_dojo::widgets::{
    parse_tape, LatchKind, MealyMoore, OutputStyle, ParallelLoadCounter, RegisterMode,
    SequenceDetector, SerialAdder, ShiftCounter, ShiftKind, ShiftRegister, SrLatch, TrafficLight,
    VendingMachine,
};
use logic_dojo::{Simulation, TickDriver, TimedRunner};
use serde::Serialize;
use std::fmt::Display;
use tracing::info;

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let settings = match &cli.config {
        Some(path) => config::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimConfig::default(),
    };
    let out = Printer { json: cli.json };
    info!(command = ?cli.command, "Starting logic-dojo");

    match cli.command {
        Command::Traffic { ticks, live: true } => traffic_live(&settings, ticks, &out),
        Command::Traffic { ticks, live: false } => {
            let sim = simulation(&settings, TrafficLight::new(settings.traffic)?);
            out.frames(&clocked(sim, ticks)?)
        }
        Command::Vending { coins } => {
            let coins = coins
                .iter()
                .map(|c| Coin::parse(c).with_context(|| format!("'{c}' is not a coin (5 or 10)")))
                .collect::<Result<Vec<_>>>()?;
            let sim = simulation(&settings, VendingMachine::new()?);
            out.frames(&manual(sim, coins)?)
        }
        Command::Sequence { tape, ticks } => {
            let text = tape.unwrap_or_else(|| settings.sequence.tape.clone());
            let Some(bits) = parse_tape(&text) else {
                bail!("tape '{text}' may only contain 0 and 1");
            };
            let ticks = ticks.unwrap_or(bits.len() + 1);
            let sim = simulation(&settings, SequenceDetector::new(bits)?);
            out.frames(&clocked(sim, ticks)?)
        }
        Command::Latch { nand, inputs } => {
            let kind = if nand { LatchKind::Nand } else { LatchKind::Nor };
            let inputs = inputs
                .iter()
                .map(|i| SrInput::parse(i).with_context(|| format!("'{i}' is not an S,R pair")))
                .collect::<Result<Vec<_>>>()?;
            let sim = simulation(&settings, SrLatch::new(kind)?);
            out.frames(&manual(sim, inputs)?)
        }
        Command::Counter { load, ticks } => {
            let mut sim = simulation(&settings, ParallelLoadCounter::default());
            let mut frames = vec![sim.frame()];
            if let Some(value) = load {
                sim.step(CounterInput::Load(value))?;
                frames.push(sim.frame());
            }
            TickDriver::run_with(&mut sim, ticks, |s, _| frames.push(s.frame()))?;
            out.frames(&frames)
        }
        Command::Shift { johnson, ticks } => {
            let kind = if johnson { ShiftKind::Johnson } else { ShiftKind::Ring };
            let sim = simulation(&settings, ShiftCounter::new(kind)?);
            out.frames(&clocked(sim, ticks)?)
        }
        Command::ShiftRegister {
            mode,
            serial,
            parallel,
            ticks,
        } => shift_register(&settings, mode.into(), serial, parallel, ticks, &out),
        Command::MealyMoore { mealy, bits } => {
            let style = if mealy { OutputStyle::Mealy } else { OutputStyle::Moore };
            let Some(bits) = parse_tape(&bits.join(",")) else {
                bail!("input levels may only be 0 or 1");
            };
            let sim = simulation(&settings, MealyMoore::new(style)?);
            out.frames(&manual(sim, bits)?)
        }
        Command::SerialAdder { a, b } => {
            let a = a.unwrap_or_else(|| settings.serial_adder.a.clone());
            let b = b.unwrap_or_else(|| settings.serial_adder.b.clone());
            let (Some(a_bits), Some(b_bits)) = (parse_bits(&a), parse_bits(&b)) else {
                bail!("operands may only contain 0 and 1");
            };
            let ticks = a_bits.len().max(b_bits.len()) + 1;
            let sim = simulation(&settings, SerialAdder::new(&a_bits, &b_bits)?);
            out.frames(&clocked(sim, ticks)?)
        }
        Command::Signed { value, width } => {
            let width = width.unwrap_or(settings.signed.width);
            let value = signed::parse_value(&value, width)?;
            out.line(&signed::encode(value, width)?)
        }
        Command::Gates => gates(&out),
        Command::Kmap { ones, dont_care } => {
            let map = KMap::from_minterms(&ones, &dont_care)?;
            let solution = map.solve();
            if out.json {
                return out.json(&solution);
            }
            println!("{map}");
            for group in &solution.groups {
                println!("  {:<8} covers {:?}", group.term, group.minterms);
            }
            println!("{solution}");
            Ok(())
        }
        Command::Nav { slug } => {
            let topics = flatten(DIGITAL_DESIGN);
            let Some(links) = neighbors(&topics, &slug) else {
                bail!("no topic with slug '{slug}'");
            };
            if out.json {
                out.json(&links)
            } else {
                let show = |link: &Option<logic_dojo::curriculum::NavLink>| match link {
                    Some(l) => format!("{} ({})", l.title, l.href),
                    None => "-".to_string(),
                };
                println!("prev: {}", show(&links.prev));
                println!("next: {}", show(&links.next));
                Ok(())
            }
        }
    }
}

fn simulation<W: Render>(settings: &SimConfig, widget: W) -> Simulation<W> {
    Simulation::with_log_limit(widget, settings.history_limit)
}

/// Run `ticks` clock ticks, collecting the initial frame and one per tick.
fn clocked<W: Render>(mut sim: Simulation<W>, ticks: usize) -> Result<Vec<Frame<W::View>>> {
    let mut frames = vec![sim.frame()];
    TickDriver::run_with(&mut sim, ticks, |s, _| frames.push(s.frame()))?;
    Ok(frames)
}

/// Apply each input in order, collecting the initial frame and one per input.
fn manual<W: Render>(
    mut sim: Simulation<W>,
    inputs: Vec<InputOf<W>>,
) -> Result<Vec<Frame<W::View>>> {
    let mut frames = vec![sim.frame()];
    for input in inputs {
        sim.step(input)?;
        frames.push(sim.frame());
    }
    for note in sim.log().notes() {
        info!(note, "step");
    }
    Ok(frames)
}

fn shift_register(
    settings: &SimConfig,
    mode: RegisterMode,
    serial: Option<String>,
    parallel: Option<String>,
    ticks: Option<usize>,
    out: &Printer,
) -> Result<()> {
    let serial = match serial {
        Some(text) if !mode.serial_input() => bail!("{mode} has no serial input ('{text}')"),
        Some(text) => parse_bits(&text)
            .with_context(|| format!("serial input '{text}' may only contain 0 and 1"))?,
        None => Vec::new(),
    };
    let word = match parallel {
        Some(text) if !mode.parallel_input() => bail!("{mode} has no parallel input ('{text}')"),
        Some(text) => match parse_bits(&text) {
            Some(bits) if bits.len() == 4 => bits
                .iter()
                .fold(0u8, |acc, bit| (acc << 1) | u8::from(*bit)),
            _ => bail!("parallel input '{text}' must be four 0/1 digits"),
        },
        None => 0,
    };

    let mut sim = simulation(settings, ShiftRegister::new(mode)?);
    sim.adjust(|c| c.parallel_in = word);
    let mut frames = vec![sim.frame()];
    if mode == RegisterMode::Piso {
        sim.step(RegisterInput::Load(word))?;
        frames.push(sim.frame());
    }

    sim.start();
    for tick in 0..ticks.unwrap_or(serial.len().max(4)) {
        if let Some(&bit) = serial.get(tick) {
            sim.adjust(|c| c.serial_in = bit);
        }
        sim.tick()?;
        frames.push(sim.frame());
    }
    out.frames(&frames)
}

fn traffic_live(settings: &SimConfig, ticks: usize, out: &Printer) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let view = TrafficLight::new(settings.traffic)?;
        let sim = simulation(settings, TrafficLight::new(settings.traffic)?);
        let handle = TimedRunner::spawn(sim, settings.tick_period());
        let mut updates = handle.subscribe();
        handle.start().await?;

        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            out.line(&Frame {
                tick: snapshot.ticks,
                state: snapshot.state.name().to_string(),
                running: snapshot.running,
                view: view.render(&snapshot.state, &snapshot.counters),
            })?;
            if snapshot.ticks >= ticks as u64 {
                break;
            }
        }

        handle.shutdown().await?;
        Ok::<(), anyhow::Error>(())
    })
}

#[derive(Serialize)]
struct GateReport {
    gate: Gate,
    description: &'static str,
    truth_table: Vec<(bool, bool, bool)>,
    nand_only: String,
    nor_only: String,
}

fn gates(out: &Printer) -> Result<()> {
    for gate in Gate::ALL {
        let report = GateReport {
            gate,
            description: gate.description(),
            truth_table: gate.truth_table(),
            nand_only: build_from(Universal::Nand, gate).to_string(),
            nor_only: build_from(Universal::Nor, gate).to_string(),
        };
        if out.json {
            out.json(&report)?;
            continue;
        }
        println!("{gate}: {}", report.description);
        for (a, b, y) in &report.truth_table {
            let row: Vec<u8> = [*a, *b, *y].into_iter().map(u8::from).collect();
            if gate == Gate::Not {
                println!("  A={} | Y={}", row[0], row[2]);
            } else {
                println!("  A={} B={} | Y={}", row[0], row[1], row[2]);
            }
        }
        println!("  NAND only: {}", report.nand_only);
        println!("  NOR only:  {}", report.nor_only);
    }
    Ok(())
}

struct Printer {
    json: bool,
}

impl Printer {
    fn json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string(value)?);
        Ok(())
    }

    fn line<T: Serialize + Display>(&self, value: &T) -> Result<()> {
        if self.json {
            self.json(value)
        } else {
            println!("{value}");
            Ok(())
        }
    }

    fn frames<V: Serialize + Display>(&self, frames: &[Frame<V>]) -> Result<()> {
        frames.iter().try_for_each(|frame| self.line(frame))
    }
}
