//! Signed number representations: sign-magnitude, 1's complement and
//! 2's complement at a fixed bit width.
//!
//! Sign-magnitude and 1's complement have two zeros and cannot represent
//! the most negative 2's complement value, so those encodings are
//! optional.

use crate::validation::checks::in_range;
use crate::validation::{summarize, Checks, Violation};
use serde::Serialize;
use std::fmt;
use stillwater::validation::Validation;
use thiserror::Error;

pub const MIN_WIDTH: u8 = 2;
pub const MAX_WIDTH: u8 = 16;
pub const DEFAULT_WIDTH: u8 = 8;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SignedError {
    #[error("Value must be between {min} and {max} for {width}-bit representation.")]
    OutOfRange {
        value: i64,
        min: i64,
        max: i64,
        width: u8,
    },

    #[error("Bit width {0} is not supported (use {MIN_WIDTH}..={MAX_WIDTH})")]
    UnsupportedWidth(u8),

    #[error("'{0}' is not a binary string")]
    InvalidBits(String),

    #[error("Invalid input: {}", summarize(.0))]
    Invalid(Vec<Violation>),
}

/// Range of 2's complement values at `width` bits.
pub fn range(width: u8) -> (i64, i64) {
    let half = 1i64 << (width.clamp(MIN_WIDTH, MAX_WIDTH) - 1);
    (-half, half - 1)
}

fn check_width(width: u8) -> Result<(), SignedError> {
    if (MIN_WIDTH..=MAX_WIDTH).contains(&width) {
        Ok(())
    } else {
        Err(SignedError::UnsupportedWidth(width))
    }
}

fn check_range(value: i64, width: u8) -> Result<(), SignedError> {
    check_width(width)?;
    let (min, max) = range(width);
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(SignedError::OutOfRange {
            value,
            min,
            max,
            width,
        })
    }
}

fn binary(magnitude: u64, width: u8) -> String {
    format!("{:0width$b}", magnitude, width = usize::from(width))
}

fn invert(bits: &str) -> String {
    bits.chars()
        .map(|c| if c == '0' { '1' } else { '0' })
        .collect()
}

/// 2's complement encoding of `value`.
pub fn twos_complement(value: i64, width: u8) -> Result<String, SignedError> {
    check_range(value, width)?;
    let mask = (1u64 << width) - 1;
    Ok(binary((value as u64) & mask, width))
}

/// 1's complement encoding, `None` for the most negative value.
pub fn ones_complement(value: i64, width: u8) -> Result<Option<String>, SignedError> {
    check_range(value, width)?;
    let (min, _) = range(width);
    Ok(match value {
        v if v == min => None,
        v if v < 0 => Some(invert(&binary(v.unsigned_abs(), width))),
        v => Some(binary(v.unsigned_abs(), width)),
    })
}

/// Sign-magnitude encoding, `None` for the most negative value.
pub fn sign_magnitude(value: i64, width: u8) -> Result<Option<String>, SignedError> {
    check_range(value, width)?;
    let (min, _) = range(width);
    if value == min {
        return Ok(None);
    }
    let sign = if value < 0 { '1' } else { '0' };
    Ok(Some(format!("{sign}{}", binary(value.unsigned_abs(), width - 1))))
}

fn parse_bits(bits: &str) -> Result<(u64, u8), SignedError> {
    if !bits.chars().all(|c| c == '0' || c == '1') {
        return Err(SignedError::InvalidBits(bits.to_string()));
    }
    let width = u8::try_from(bits.len()).map_err(|_| SignedError::InvalidBits(bits.to_string()))?;
    check_width(width)?;
    let raw = u64::from_str_radix(bits, 2).map_err(|_| SignedError::InvalidBits(bits.to_string()))?;
    Ok((raw, width))
}

/// Decode a 2's complement bit string; the width is the string length.
pub fn decode_twos(bits: &str) -> Result<i64, SignedError> {
    let (raw, width) = parse_bits(bits)?;
    let sign = 1u64 << (width - 1);
    Ok(if raw & sign == 0 {
        raw as i64
    } else {
        raw as i64 - (1i64 << width)
    })
}

/// Decode a 1's complement bit string. All-ones decodes to (negative) zero.
pub fn decode_ones(bits: &str) -> Result<i64, SignedError> {
    let (raw, width) = parse_bits(bits)?;
    let sign = 1u64 << (width - 1);
    Ok(if raw & sign == 0 {
        raw as i64
    } else {
        let mask = (1u64 << width) - 1;
        -((!raw & mask) as i64)
    })
}

/// Decode a sign-magnitude bit string. `100..0` decodes to (negative) zero.
pub fn decode_sign_magnitude(bits: &str) -> Result<i64, SignedError> {
    let (raw, width) = parse_bits(bits)?;
    let sign = 1u64 << (width - 1);
    let magnitude = (raw & (sign - 1)) as i64;
    Ok(if raw & sign == 0 { magnitude } else { -magnitude })
}

/// All three encodings of one value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Representations {
    pub value: i64,
    pub width: u8,
    pub sign_magnitude: Option<String>,
    pub ones_complement: Option<String>,
    pub twos_complement: String,
}

pub fn encode(value: i64, width: u8) -> Result<Representations, SignedError> {
    Ok(Representations {
        value,
        width,
        sign_magnitude: sign_magnitude(value, width)?,
        ones_complement: ones_complement(value, width)?,
        twos_complement: twos_complement(value, width)?,
    })
}

impl fmt::Display for Representations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let or_na = |bits: &Option<String>| bits.clone().unwrap_or_else(|| "n/a".to_string());
        writeln!(f, "{} ({}-bit)", self.value, self.width)?;
        writeln!(f, "  sign-magnitude   {}", or_na(&self.sign_magnitude))?;
        writeln!(f, "  1's complement   {}", or_na(&self.ones_complement))?;
        write!(f, "  2's complement   {}", self.twos_complement)
    }
}

struct SignedInput {
    number: Option<i64>,
    width: u8,
}

/// Parse user-entered text as a value representable at `width` bits.
///
/// Every problem is reported at once: a bad width and a non-numeric
/// value yield two violations.
pub fn parse_value(text: &str, width: u8) -> Result<i64, SignedError> {
    let input = SignedInput {
        number: text.trim().parse().ok(),
        width,
    };
    let checks = Checks::new()
        .require(|i: &SignedInput| {
            in_range(
                "width",
                i64::from(i.width),
                i64::from(MIN_WIDTH),
                i64::from(MAX_WIDTH),
            )
        })
        .require_pred(|i: &SignedInput| i.number.is_some(), "value", "must be a whole number")
        .require(|i: &SignedInput| match (i.number, check_width(i.width)) {
            (Some(n), Ok(())) => match check_range(n, i.width) {
                Ok(()) => Validation::success(()),
                Err(e) => Validation::fail(Violation::invalid("value", e.to_string())),
            },
            _ => Validation::success(()),
        });

    checks.into_result(&input).map_err(SignedError::Invalid)?;
    input
        .number
        .ok_or_else(|| SignedError::Invalid(vec![Violation::invalid("value", "must be a whole number")]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minus_five_in_eight_bits() {
        let reps = encode(-5, 8).unwrap();

        assert_eq!(reps.sign_magnitude.as_deref(), Some("10000101"));
        assert_eq!(reps.ones_complement.as_deref(), Some("11111010"));
        assert_eq!(reps.twos_complement, "11111011");
    }

    #[test]
    fn positive_values_agree_across_formats() {
        let reps = encode(42, 8).unwrap();

        assert_eq!(reps.sign_magnitude.as_deref(), Some("00101010"));
        assert_eq!(reps.ones_complement.as_deref(), Some("00101010"));
        assert_eq!(reps.twos_complement, "00101010");
    }

    #[test]
    fn most_negative_value_is_twos_only() {
        let reps = encode(-128, 8).unwrap();

        assert_eq!(reps.sign_magnitude, None);
        assert_eq!(reps.ones_complement, None);
        assert_eq!(reps.twos_complement, "10000000");
    }

    #[test]
    fn out_of_range_message() {
        let err = encode(128, 8).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Value must be between -128 and 127 for 8-bit representation."
        );
    }

    #[test]
    fn other_widths() {
        assert_eq!(range(4), (-8, 7));
        assert_eq!(twos_complement(-1, 4).unwrap(), "1111");
        assert_eq!(decode_twos("1000").unwrap(), -8);
        assert_eq!(range(16), (-32768, 32767));
        assert!(matches!(encode(0, 1), Err(SignedError::UnsupportedWidth(1))));
    }

    #[test]
    fn legacy_formats_have_two_zeros() {
        assert_eq!(decode_ones("11111111").unwrap(), 0);
        assert_eq!(decode_ones("00000000").unwrap(), 0);
        assert_eq!(decode_sign_magnitude("10000000").unwrap(), 0);
        assert_eq!(decode_sign_magnitude("10000101").unwrap(), -5);
        assert_eq!(decode_ones("11111010").unwrap(), -5);
    }

    #[test]
    fn decode_rejects_non_binary() {
        assert_eq!(
            decode_twos("10201"),
            Err(SignedError::InvalidBits("10201".to_string()))
        );
    }

    #[test]
    fn parse_value_accepts_in_range_text() {
        assert_eq!(parse_value(" -5 ", 8), Ok(-5));
    }

    #[test]
    fn parse_value_reports_range() {
        match parse_value("200", 8) {
            Err(SignedError::Invalid(violations)) => {
                assert_eq!(violations.len(), 1);
                assert_eq!(
                    violations[0].to_string(),
                    "value: Value must be between -128 and 127 for 8-bit representation."
                );
            }
            other => panic!("expected range violation, got {other:?}"),
        }
    }

    #[test]
    fn parse_value_accumulates_violations() {
        match parse_value("abc", 40) {
            Err(SignedError::Invalid(violations)) => {
                let fields: Vec<_> = violations.iter().map(Violation::field).collect();
                assert_eq!(fields, vec!["width", "value"]);
            }
            other => panic!("expected violations, got {other:?}"),
        }
    }
}
