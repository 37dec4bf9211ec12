//! Simulation settings loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) gives
//! the textbook values: a one-second clock, an 8/3 tick traffic light and
//! the stock detector tape.
//!
//! ```toml
//! tick_period_ms = 500
//! history_limit = 64
//!
//! [traffic]
//! green_ticks = 5
//! yellow_ticks = 2
//!
//! [sequence]
//! tape = "10110"
//! ```

mod loader;

pub use loader::{load_from_file, load_from_str, ConfigError};

use crate::validation::checks::{binary, in_range};
use crate::validation::{Checks, Violation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Widest operand a serial adder register accepts.
pub const MAX_OPERAND_BITS: usize = 16;

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Period of the real-time tick source, in milliseconds
    pub tick_period_ms: u64,
    /// Maximum number of records kept in each step log
    pub history_limit: usize,
    pub traffic: TrafficConfig,
    pub sequence: SequenceConfig,
    pub serial_adder: SerialAdderConfig,
    pub signed: SignedConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 1000,
            history_limit: crate::core::DEFAULT_LOG_LIMIT,
            traffic: TrafficConfig::default(),
            sequence: SequenceConfig::default(),
            serial_adder: SerialAdderConfig::default(),
            signed: SignedConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// Run every semantic check, accumulating ALL violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<Violation>> {
        checks().check(self)
    }
}

fn checks() -> Checks<SimConfig> {
    Checks::new()
        .require_pred(|c: &SimConfig| c.tick_period_ms > 0, "tick_period_ms", "must be greater than zero")
        .require_pred(|c: &SimConfig| c.history_limit > 0, "history_limit", "must be greater than zero")
        .require_pred(|c: &SimConfig| c.traffic.green_ticks > 0, "traffic.green_ticks", "must be greater than zero")
        .require_pred(|c: &SimConfig| c.traffic.yellow_ticks > 0, "traffic.yellow_ticks", "must be greater than zero")
        .require(|c: &SimConfig| binary("sequence.tape", &c.sequence.tape))
        .require(|c: &SimConfig| binary("serial_adder.a", &c.serial_adder.a))
        .require(|c: &SimConfig| binary("serial_adder.b", &c.serial_adder.b))
        .require(|c: &SimConfig| {
            in_range("serial_adder.a", c.serial_adder.a.len() as i64, 1, MAX_OPERAND_BITS as i64)
        })
        .require(|c: &SimConfig| {
            in_range("serial_adder.b", c.serial_adder.b.len() as i64, 1, MAX_OPERAND_BITS as i64)
        })
        .require(|c: &SimConfig| {
            in_range(
                "signed.width",
                i64::from(c.signed.width),
                i64::from(crate::signed::MIN_WIDTH),
                i64::from(crate::signed::MAX_WIDTH),
            )
        })
}

/// Phase dwell times of the traffic light, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficConfig {
    pub green_ticks: u32,
    pub yellow_ticks: u32,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            green_ticks: 8,
            yellow_ticks: 3,
        }
    }
}

/// Bit tape fed to the sequence detector, oldest bit first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    pub tape: String,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            tape: "1011010111".to_string(),
        }
    }
}

/// Operands of the serial adder, written most significant bit first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialAdderConfig {
    pub a: String,
    pub b: String,
}

impl Default for SerialAdderConfig {
    fn default() -> Self {
        Self {
            a: "0101".to_string(),
            b: "0011".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignedConfig {
    pub width: u8,
}

impl Default for SignedConfig {
    fn default() -> Self {
        Self { width: 8 }
    }
}

/// Parse a `0`/`1` string into levels, in the order written.
pub fn parse_bits(bits: &str) -> Option<Vec<bool>> {
    bits.chars()
        .map(|c| match c {
            '0' => Some(false),
            '1' => Some(true),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SimConfig::default();

        assert!(config.validate().is_success());
        assert_eq!(config.tick_period(), Duration::from_secs(1));
        assert_eq!(config.traffic.green_ticks, 8);
        assert_eq!(config.traffic.yellow_ticks, 3);
        assert_eq!(config.sequence.tape, "1011010111");
    }

    #[test]
    fn validation_accumulates_every_violation() {
        let config = SimConfig {
            tick_period_ms: 0,
            history_limit: 0,
            traffic: TrafficConfig {
                green_ticks: 0,
                yellow_ticks: 3,
            },
            sequence: SequenceConfig {
                tape: "10201".to_string(),
            },
            serial_adder: SerialAdderConfig::default(),
            signed: SignedConfig { width: 40 },
        };

        match config.validate() {
            Validation::Failure(errors) => {
                let fields: Vec<_> = errors.iter().map(Violation::field).collect();
                assert_eq!(
                    fields,
                    vec![
                        "tick_period_ms",
                        "history_limit",
                        "traffic.green_ticks",
                        "sequence.tape",
                        "signed.width",
                    ]
                );
            }
            Validation::Success(_) => panic!("expected violations"),
        }
    }

    #[test]
    fn overlong_operand_is_rejected() {
        let config = SimConfig {
            serial_adder: SerialAdderConfig {
                a: "1".repeat(17),
                b: "1".to_string(),
            },
            ..SimConfig::default()
        };

        assert!(config.validate().is_failure());
    }

    #[test]
    fn parse_bits_keeps_written_order() {
        assert_eq!(parse_bits("110"), Some(vec![true, true, false]));
        assert_eq!(parse_bits("1x"), None);
        assert_eq!(parse_bits(""), Some(vec![]));
    }
}
