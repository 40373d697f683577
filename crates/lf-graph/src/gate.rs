//! Gate kinds and their boolean semantics.
//!
//! Every gate type is a variant of [`GateKind`]; evaluation and arity
//! handling are exhaustive matches, so adding a gate type is a
//! compile-checked change across the simulator and the synthesizer.

use std::fmt;
use std::str::FromStr;

use lf_core::NodeId;
use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Logic gate type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateKind {
    And,
    Or,
    Not,
    Xor,
    Nand,
    Nor,
    Xnor,
}

/// Number of operands a gate type needs to be well-defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// A gate whose input count does not match its arity.
///
/// The gate still evaluates: extra operands are ignored, missing operands
/// of fixed-arity gates read as `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArityWarning {
    pub node: NodeId,
    pub kind: GateKind,
    pub expected: Arity,
    pub actual: usize,
}

impl fmt::Display for ArityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} gate {} has {} input(s), expected {}",
            self.kind, self.node, self.actual, self.expected
        )
    }
}

impl GateKind {
    pub const ALL: [GateKind; 7] = [
        GateKind::And,
        GateKind::Or,
        GateKind::Not,
        GateKind::Xor,
        GateKind::Nand,
        GateKind::Nor,
        GateKind::Xnor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GateKind::And => "AND",
            GateKind::Or => "OR",
            GateKind::Not => "NOT",
            GateKind::Xor => "XOR",
            GateKind::Nand => "NAND",
            GateKind::Nor => "NOR",
            GateKind::Xnor => "XNOR",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            GateKind::Not => Arity::Exactly(1),
            GateKind::Xor | GateKind::Xnor => Arity::Exactly(2),
            GateKind::And | GateKind::Or | GateKind::Nand | GateKind::Nor => Arity::AtLeast(1),
        }
    }

    /// Fit `inputs` to this gate's arity.
    ///
    /// Fixed-arity gates keep the first N operands and pad with `pad` when
    /// short. Returns the operands and whether an adjustment was needed.
    pub fn fit_operands<T: Clone>(self, inputs: &[T], pad: T) -> (Vec<T>, bool) {
        let arity = self.arity();
        let mismatch = !arity.accepts(inputs.len());
        let operands = match arity {
            Arity::AtLeast(_) => inputs.to_vec(),
            Arity::Exactly(n) => {
                let mut ops: Vec<T> = inputs.iter().take(n).cloned().collect();
                ops.resize(n, pad);
                ops
            }
        };
        (operands, mismatch)
    }

    /// Evaluate the gate on concrete operands.
    ///
    /// A gate with no inputs evaluates to `false`.
    pub fn evaluate(self, inputs: &[bool]) -> bool {
        if inputs.is_empty() {
            return false;
        }
        let (ops, _) = self.fit_operands(inputs, false);
        match self {
            GateKind::And => ops.iter().all(|&v| v),
            GateKind::Or => ops.iter().any(|&v| v),
            GateKind::Not => !ops[0],
            GateKind::Xor => ops[0] ^ ops[1],
            GateKind::Nand => !ops.iter().all(|&v| v),
            GateKind::Nor => !ops.iter().any(|&v| v),
            GateKind::Xnor => ops[0] == ops[1],
        }
    }

    /// Check an input count against the arity, producing a warning on mismatch.
    pub fn check_arity(self, node: NodeId, actual: usize) -> Option<ArityWarning> {
        let expected = self.arity();
        (!expected.accepts(actual)).then_some(ArityWarning {
            node,
            kind: self,
            expected,
            actual,
        })
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GateKind {
    type Err = GraphError;

    /// Parse a gate class name, case-insensitively (`"and"`, `"Nand"`, `"XNOR"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        GateKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| GraphError::UnknownGate {
                name: trimmed.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(kind: GateKind) -> [bool; 4] {
        [
            kind.evaluate(&[false, false]),
            kind.evaluate(&[false, true]),
            kind.evaluate(&[true, false]),
            kind.evaluate(&[true, true]),
        ]
    }

    #[test]
    fn two_input_truth_tables() {
        assert_eq!(table(GateKind::And), [false, false, false, true]);
        assert_eq!(table(GateKind::Or), [false, true, true, true]);
        assert_eq!(table(GateKind::Nand), [true, true, true, false]);
        assert_eq!(table(GateKind::Nor), [true, false, false, false]);
        assert_eq!(table(GateKind::Xor), [false, true, true, false]);
        assert_eq!(table(GateKind::Xnor), [true, false, false, true]);
    }

    #[test]
    fn all_ones_inputs() {
        let ones = [true, true];
        let outs: Vec<bool> = [GateKind::And, GateKind::Or, GateKind::Nand, GateKind::Nor]
            .iter()
            .map(|k| k.evaluate(&ones))
            .collect();
        assert_eq!(outs, vec![true, true, false, false]);
    }

    #[test]
    fn not_gate() {
        assert!(!GateKind::Not.evaluate(&[true]));
        assert!(GateKind::Not.evaluate(&[false]));
    }

    #[test]
    fn zero_inputs_evaluate_low() {
        for kind in GateKind::ALL {
            assert!(!kind.evaluate(&[]), "{kind} with no inputs");
        }
    }

    #[test]
    fn arity_mismatch_uses_leading_operands() {
        // NOT with two inputs negates the first
        assert!(!GateKind::Not.evaluate(&[true, false]));
        // XOR with three inputs ignores the third
        assert!(!GateKind::Xor.evaluate(&[true, true, true]));
        // XOR with one input pads with 0
        assert!(GateKind::Xor.evaluate(&[true]));
        assert!(!GateKind::Xnor.evaluate(&[true]));
    }

    #[test]
    fn check_arity_flags_mismatch() {
        let node = NodeId::from_index(4);
        assert!(GateKind::And.check_arity(node, 3).is_none());
        let warning = GateKind::Not.check_arity(node, 2).unwrap();
        assert_eq!(warning.expected, Arity::Exactly(1));
        assert_eq!(warning.actual, 2);
        assert!(GateKind::Xor.check_arity(node, 2).is_none());
        assert!(GateKind::Or.check_arity(node, 0).is_some());
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("and".parse::<GateKind>().unwrap(), GateKind::And);
        assert_eq!(" Xnor ".parse::<GateKind>().unwrap(), GateKind::Xnor);
        assert!("buffer".parse::<GateKind>().is_err());
    }
}
