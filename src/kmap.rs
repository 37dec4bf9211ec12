//! Four-variable Karnaugh map with a sum-of-products minimizer.
//!
//! Variables are `A B C D`, `A` most significant. Rows are labelled `AB`
//! and columns `CD`, both in Gray-code order, so neighbouring cells differ
//! in one variable and groups may wrap around either edge.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of cells (minterms) in the map.
pub const CELLS: usize = 16;

/// Minterm shown at each `[row][column]` position.
pub const GRID: [[u8; 4]; 4] = [[0, 1, 3, 2], [4, 5, 7, 6], [12, 13, 15, 14], [8, 9, 11, 10]];

/// Row and column labels in Gray-code order.
const GRAY: [&str; 4] = ["00", "01", "11", "10"];

/// Variable names with the minterm bit each one selects.
const VARIABLES: [(char, u8); 4] = [('A', 8), ('B', 4), ('C', 2), ('D', 1)];

const SIDES: [usize; 3] = [1, 2, 4];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Zero,
    One,
    DontCare,
}

impl Cell {
    /// The value a click cycles to: `0 -> 1 -> X -> 0`.
    pub fn next(self) -> Self {
        match self {
            Self::Zero => Self::One,
            Self::One => Self::DontCare,
            Self::DontCare => Self::Zero,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Zero => "0",
            Self::One => "1",
            Self::DontCare => "X",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KMapError {
    #[error("minterm {0} is outside 0..=15")]
    OutOfRange(u8),

    #[error("minterm {0} is listed as both a one and a don't-care")]
    Conflict(u8),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KMap {
    cells: [Cell; CELLS],
}

impl KMap {
    /// An all-zero map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map with the listed minterms set to 1 and don't-care.
    pub fn from_minterms(ones: &[u8], dont_cares: &[u8]) -> Result<Self, KMapError> {
        let mut map = Self::new();
        for &m in ones {
            map.set(m, Cell::One)?;
        }
        for &m in dont_cares {
            if map.get(m) == Some(Cell::One) {
                return Err(KMapError::Conflict(m));
            }
            map.set(m, Cell::DontCare)?;
        }
        Ok(map)
    }

    pub fn get(&self, minterm: u8) -> Option<Cell> {
        self.cells.get(usize::from(minterm)).copied()
    }

    pub fn set(&mut self, minterm: u8, cell: Cell) -> Result<(), KMapError> {
        let slot = self
            .cells
            .get_mut(usize::from(minterm))
            .ok_or(KMapError::OutOfRange(minterm))?;
        *slot = cell;
        Ok(())
    }

    /// Advance one cell through `0 -> 1 -> X`, returning its new value.
    pub fn toggle(&mut self, minterm: u8) -> Result<Cell, KMapError> {
        let next = self
            .get(minterm)
            .ok_or(KMapError::OutOfRange(minterm))?
            .next();
        self.set(minterm, next)?;
        Ok(next)
    }

    pub fn clear(&mut self) {
        self.cells = [Cell::Zero; CELLS];
    }

    fn mask(&self, wanted: Cell) -> u16 {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == wanted)
            .fold(0, |mask, (m, _)| mask | (1u16 << m))
    }

    /// Minimal sum-of-products cover of the 1 cells.
    ///
    /// Candidate groups are the prime implicants: rectangles of 1, 2, 4, 8
    /// or 16 cells (wrapping) that hold no 0 and at least one 1, and that
    /// no larger such rectangle contains. Essential primes are taken
    /// first, the rest greedily by new 1s covered, and any group made
    /// redundant along the way is dropped.
    pub fn solve(&self) -> Solution {
        let ones = self.mask(Cell::One);
        let zeros = self.mask(Cell::Zero);

        let valid: Vec<u16> = rectangles()
            .into_iter()
            .filter(|g| g & zeros == 0 && g & ones != 0)
            .collect();
        let primes: Vec<u16> = valid
            .iter()
            .copied()
            .filter(|&g| !valid.iter().any(|&o| o != g && o & g == g))
            .collect();

        let mut chosen: Vec<u16> = Vec::new();
        for m in (0..CELLS).filter(|m| ones & (1u16 << m) != 0) {
            let mut covering = primes.iter().filter(|&&p| p & (1u16 << m) != 0);
            if let (Some(&only), None) = (covering.next(), covering.next()) {
                if !chosen.contains(&only) {
                    chosen.push(only);
                }
            }
        }

        let covered = |groups: &[u16]| groups.iter().fold(0u16, |acc, g| acc | g);
        loop {
            let uncovered = ones & !covered(&chosen);
            if uncovered == 0 {
                break;
            }
            let mut best: Option<(u32, u32, u16)> = None;
            for &p in &primes {
                let gain = (p & uncovered).count_ones();
                let key = (gain, p.count_ones(), p);
                if gain > 0 && best.map_or(true, |(g, s, _)| (gain, key.1) > (g, s)) {
                    best = Some(key);
                }
            }
            match best {
                Some((_, _, p)) => chosen.push(p),
                None => break,
            }
        }

        chosen.sort_by_key(|g| (g.count_ones(), g.trailing_zeros()));
        let mut i = 0;
        while i < chosen.len() {
            let mut rest = chosen.clone();
            rest.remove(i);
            if ones & !covered(&rest) == 0 {
                chosen = rest;
            } else {
                i += 1;
            }
        }

        chosen.sort_by_key(|g| (std::cmp::Reverse(g.count_ones()), g.trailing_zeros()));
        Solution {
            groups: chosen.into_iter().map(Group::from_mask).collect(),
        }
    }
}

/// Every distinct wrapping rectangle, as a minterm bit mask.
fn rectangles() -> Vec<u16> {
    let mut masks = Vec::new();
    for row in 0..4 {
        for col in 0..4 {
            for height in SIDES {
                for width in SIDES {
                    let mut mask = 0u16;
                    for i in 0..height {
                        for j in 0..width {
                            mask |= 1u16 << GRID[(row + i) % 4][(col + j) % 4];
                        }
                    }
                    if !masks.contains(&mask) {
                        masks.push(mask);
                    }
                }
            }
        }
    }
    masks
}

impl fmt::Display for KMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AB\\CD")?;
        for label in GRAY {
            write!(f, " {label}")?;
        }
        for (row, minterms) in GRID.iter().enumerate() {
            write!(f, "\n   {}", GRAY[row])?;
            for &m in minterms {
                write!(f, "  {}", self.cells[usize::from(m)])?;
            }
        }
        Ok(())
    }
}

/// One product term of the cover.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Group {
    /// Covered minterms in ascending order
    pub minterms: Vec<u8>,
    pub term: String,
}

impl Group {
    fn from_mask(mask: u16) -> Self {
        let minterms: Vec<u8> = (0..CELLS as u8)
            .filter(|m| mask & (1u16 << m) != 0)
            .collect();
        Self {
            term: product_term(&minterms),
            minterms,
        }
    }

    pub fn contains(&self, minterm: u8) -> bool {
        self.minterms.contains(&minterm)
    }
}

/// Literals shared by every minterm; `1` when none are.
fn product_term(minterms: &[u8]) -> String {
    let mut term = String::new();
    for (name, bit) in VARIABLES {
        if minterms.iter().all(|m| m & bit != 0) {
            term.push(name);
        } else if minterms.iter().all(|m| m & bit == 0) {
            term.push(name);
            term.push('\'');
        }
    }
    if term.is_empty() {
        term.push('1');
    }
    term
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Solution {
    pub groups: Vec<Group>,
}

impl Solution {
    /// The terms joined with `+`; `0` when the function has no 1s.
    pub fn expression(&self) -> String {
        if self.groups.is_empty() {
            return "0".to_string();
        }
        let terms: Vec<&str> = self.groups.iter().map(|g| g.term.as_str()).collect();
        terms.join(" + ")
    }

    /// Output of the minimized function for one minterm.
    pub fn evaluate(&self, minterm: u8) -> bool {
        self.groups.iter().any(|g| g.contains(minterm))
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F = {}", self.expression())
    }
}
