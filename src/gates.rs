//! Two-input logic gates, universal-gate constructions and De Morgan
//! equivalence checks. Purely combinational: no state, no stepper.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gate {
    And,
    Or,
    Not,
    Nand,
    Nor,
    Xor,
    Xnor,
}

impl Gate {
    pub const ALL: [Gate; 7] = [
        Gate::And,
        Gate::Or,
        Gate::Not,
        Gate::Nand,
        Gate::Nor,
        Gate::Xor,
        Gate::Xnor,
    ];

    /// Output for inputs `a`, `b`. `Not` ignores `b`.
    pub fn eval(&self, a: bool, b: bool) -> bool {
        match self {
            Self::And => a && b,
            Self::Or => a || b,
            Self::Not => !a,
            Self::Nand => !(a && b),
            Self::Nor => !(a || b),
            Self::Xor => a ^ b,
            Self::Xnor => !(a ^ b),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::And => "Output is 1 only if BOTH inputs are 1.",
            Self::Or => "Output is 1 if AT LEAST ONE input is 1.",
            Self::Not => "Inverter. Output is opposite of input.",
            Self::Nand => "Inverted AND. Output is 0 only if BOTH inputs are 1.",
            Self::Nor => "Inverted OR. Output is 1 only if BOTH inputs are 0.",
            Self::Xor => "Exclusive OR. Output is 1 if inputs are DIFFERENT.",
            Self::Xnor => "Equivalence. Output is 1 if inputs are the SAME.",
        }
    }

    /// Rows `(a, b, out)`. The inverter has only the two `a` rows.
    pub fn truth_table(&self) -> Vec<(bool, bool, bool)> {
        let rows: &[(bool, bool)] = match self {
            Self::Not => &[(false, false), (true, false)],
            _ => &INPUTS,
        };
        rows.iter().map(|&(a, b)| (a, b, self.eval(a, b))).collect()
    }

    /// De Morgan dual: `g.dual()(a, b) == !g(!a, !b)`.
    pub fn dual(&self) -> Gate {
        match self {
            Self::And => Self::Or,
            Self::Or => Self::And,
            Self::Not => Self::Not,
            Self::Nand => Self::Nor,
            Self::Nor => Self::Nand,
            Self::Xor => Self::Xnor,
            Self::Xnor => Self::Xor,
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Nand => "NAND",
            Self::Nor => "NOR",
            Self::Xor => "XOR",
            Self::Xnor => "XNOR",
        };
        f.write_str(name)
    }
}

const INPUTS: [(bool, bool); 4] = [(false, false), (false, true), (true, false), (true, true)];

/// Gate family that can build every other gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Universal {
    Nand,
    Nor,
}

/// A circuit over inputs `A` and `B`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Circuit {
    A,
    B,
    Not(Box<Circuit>),
    And(Box<Circuit>, Box<Circuit>),
    Or(Box<Circuit>, Box<Circuit>),
    Nand(Box<Circuit>, Box<Circuit>),
    Nor(Box<Circuit>, Box<Circuit>),
}

impl Circuit {
    pub fn nand(x: Circuit, y: Circuit) -> Self {
        Self::Nand(Box::new(x), Box::new(y))
    }

    pub fn nor(x: Circuit, y: Circuit) -> Self {
        Self::Nor(Box::new(x), Box::new(y))
    }

    pub fn eval(&self, a: bool, b: bool) -> bool {
        match self {
            Self::A => a,
            Self::B => b,
            Self::Not(x) => !x.eval(a, b),
            Self::And(x, y) => x.eval(a, b) && y.eval(a, b),
            Self::Or(x, y) => x.eval(a, b) || y.eval(a, b),
            Self::Nand(x, y) => !(x.eval(a, b) && y.eval(a, b)),
            Self::Nor(x, y) => !(x.eval(a, b) || y.eval(a, b)),
        }
    }

    /// Number of gates in the tree (shared subcircuits count once per use).
    pub fn gate_count(&self) -> usize {
        match self {
            Self::A | Self::B => 0,
            Self::Not(x) => 1 + x.gate_count(),
            Self::And(x, y) | Self::Or(x, y) | Self::Nand(x, y) | Self::Nor(x, y) => {
                1 + x.gate_count() + y.gate_count()
            }
        }
    }

    /// Check that every gate belongs to `family`.
    pub fn uses_only(&self, family: Universal) -> bool {
        match (self, family) {
            (Self::A | Self::B, _) => true,
            (Self::Nand(x, y), Universal::Nand) | (Self::Nor(x, y), Universal::Nor) => {
                x.uses_only(family) && y.uses_only(family)
            }
            _ => false,
        }
    }

    /// Swap NAND with NOR (and AND with OR) throughout. The dual circuit
    /// computes `!f(!a, !b)`.
    pub fn dual(&self) -> Circuit {
        let both = |x: &Circuit, y: &Circuit| (Box::new(x.dual()), Box::new(y.dual()));
        match self {
            Self::A => Self::A,
            Self::B => Self::B,
            Self::Not(x) => Self::Not(Box::new(x.dual())),
            Self::And(x, y) => {
                let (x, y) = both(x, y);
                Self::Or(x, y)
            }
            Self::Or(x, y) => {
                let (x, y) = both(x, y);
                Self::And(x, y)
            }
            Self::Nand(x, y) => {
                let (x, y) = both(x, y);
                Self::Nor(x, y)
            }
            Self::Nor(x, y) => {
                let (x, y) = both(x, y);
                Self::Nand(x, y)
            }
        }
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
            Self::Not(x) => write!(f, "NOT({x})"),
            Self::And(x, y) => write!(f, "AND({x}, {y})"),
            Self::Or(x, y) => write!(f, "OR({x}, {y})"),
            Self::Nand(x, y) => write!(f, "NAND({x}, {y})"),
            Self::Nor(x, y) => write!(f, "NOR({x}, {y})"),
        }
    }
}

fn nand_only(target: Gate) -> Circuit {
    use Circuit::{A, B};
    let not = |x: Circuit| Circuit::nand(x.clone(), x);
    match target {
        Gate::Not => not(A),
        Gate::Nand => Circuit::nand(A, B),
        Gate::And => not(Circuit::nand(A, B)),
        Gate::Or => Circuit::nand(not(A), not(B)),
        Gate::Nor => not(Circuit::nand(not(A), not(B))),
        Gate::Xor => {
            let shared = Circuit::nand(A, B);
            Circuit::nand(Circuit::nand(A, shared.clone()), Circuit::nand(B, shared))
        }
        Gate::Xnor => not(nand_only(Gate::Xor)),
    }
}

/// Rebuild `target` from a single universal gate family.
///
/// NOR constructions are the De Morgan duals of the NAND constructions
/// of the dual gate.
pub fn build_from(family: Universal, target: Gate) -> Circuit {
    match family {
        Universal::Nand => nand_only(target),
        Universal::Nor => nand_only(target.dual()).dual(),
    }
}

/// Check that a circuit matches a gate on every input combination.
pub fn implements(circuit: &Circuit, gate: Gate) -> bool {
    INPUTS
        .iter()
        .all(|&(a, b)| circuit.eval(a, b) == gate.eval(a, b))
}

/// Check that two circuits agree on every input combination.
pub fn equivalent(x: &Circuit, y: &Circuit) -> bool {
    INPUTS.iter().all(|&(a, b)| x.eval(a, b) == y.eval(a, b))
}

/// Bubble-pushing identities: a NAND is an OR with inverted inputs, and a
/// NOR is an AND with inverted inputs.
pub fn bubble_pushed(gate: Gate) -> Option<Circuit> {
    use Circuit::{A, B};
    let inv = |x: Circuit| Circuit::Not(Box::new(x));
    match gate {
        Gate::Nand => Some(Circuit::Or(Box::new(inv(A)), Box::new(inv(B)))),
        Gate::Nor => Some(Circuit::And(Box::new(inv(A)), Box::new(inv(B)))),
        Gate::And => Some(inv(Circuit::Or(Box::new(inv(A)), Box::new(inv(B))))),
        Gate::Or => Some(inv(Circuit::And(Box::new(inv(A)), Box::new(inv(B))))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truth_tables_match_textbook() {
        let outputs = |g: Gate| -> Vec<bool> { g.truth_table().iter().map(|r| r.2).collect() };

        assert_eq!(outputs(Gate::And), vec![false, false, false, true]);
        assert_eq!(outputs(Gate::Or), vec![false, true, true, true]);
        assert_eq!(outputs(Gate::Nand), vec![true, true, true, false]);
        assert_eq!(outputs(Gate::Nor), vec![true, false, false, false]);
        assert_eq!(outputs(Gate::Xor), vec![false, true, true, false]);
        assert_eq!(outputs(Gate::Xnor), vec![true, false, false, true]);
        assert_eq!(outputs(Gate::Not), vec![true, false]);
    }

    #[test]
    fn every_gate_builds_from_nand_alone() {
        for gate in Gate::ALL {
            let circuit = build_from(Universal::Nand, gate);
            assert!(circuit.uses_only(Universal::Nand), "{gate}: {circuit}");
            assert!(implements(&circuit, gate), "{gate}: {circuit}");
        }
    }

    #[test]
    fn every_gate_builds_from_nor_alone() {
        for gate in Gate::ALL {
            let circuit = build_from(Universal::Nor, gate);
            assert!(circuit.uses_only(Universal::Nor), "{gate}: {circuit}");
            assert!(implements(&circuit, gate), "{gate}: {circuit}");
        }
    }

    #[test]
    fn classic_gate_counts() {
        assert_eq!(build_from(Universal::Nand, Gate::Not).gate_count(), 1);
        assert_eq!(build_from(Universal::Nand, Gate::And).gate_count(), 2);
        assert_eq!(build_from(Universal::Nand, Gate::Or).gate_count(), 3);
        assert_eq!(build_from(Universal::Nor, Gate::And).gate_count(), 3);
    }

    #[test]
    fn bubble_pushing_preserves_function() {
        for gate in [Gate::And, Gate::Or, Gate::Nand, Gate::Nor] {
            let pushed = bubble_pushed(gate).unwrap();
            assert!(implements(&pushed, gate), "{gate}: {pushed}");
        }
        assert!(bubble_pushed(Gate::Xor).is_none());
    }

    #[test]
    fn de_morgan_duals() {
        for gate in Gate::ALL {
            if gate == Gate::Not {
                continue;
            }
            for (a, b) in INPUTS {
                assert_eq!(gate.dual().eval(a, b), !gate.eval(!a, !b), "{gate}");
            }
        }
    }

    #[test]
    fn equivalent_circuits() {
        let nand = Circuit::nand(Circuit::A, Circuit::B);
        let pushed = bubble_pushed(Gate::Nand).unwrap();

        assert!(equivalent(&nand, &pushed));
        assert!(!equivalent(&nand, &Circuit::A));
    }

    #[test]
    fn circuits_print_as_expressions() {
        assert_eq!(
            build_from(Universal::Nand, Gate::Not).to_string(),
            "NAND(A, A)"
        );
    }
}
