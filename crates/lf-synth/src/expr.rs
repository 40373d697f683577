//! Boolean expression tree.
//!
//! Text form uses `~`, `&`, `^`, `|` with that precedence (tightest
//! first), constants `0`/`1`, and identifiers for variables. Compound
//! operands are always parenthesized when printed, so printed text parses
//! back to an equivalent tree.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{SynthError, SynthResult};

/// Variable assignment used for evaluation.
pub type Assignment = BTreeMap<String, bool>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Const(bool),
    Var(String),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Xor(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Expr) -> Self {
        Expr::Not(Box::new(inner))
    }

    pub fn xor(lhs: Expr, rhs: Expr) -> Self {
        Expr::Xor(Box::new(lhs), Box::new(rhs))
    }

    /// Negate, cancelling an outer `~` instead of stacking another one.
    pub fn negated(self) -> Self {
        match self {
            Expr::Not(inner) => *inner,
            other => Expr::not(other),
        }
    }

    /// Evaluate under `env`. An empty AND is `1`, an empty OR is `0`.
    pub fn eval(&self, env: &Assignment) -> SynthResult<bool> {
        Ok(match self {
            Expr::Const(v) => *v,
            Expr::Var(name) => *env
                .get(name)
                .ok_or_else(|| SynthError::UnboundVariable { name: name.clone() })?,
            Expr::Not(inner) => !inner.eval(env)?,
            Expr::And(ops) => {
                for op in ops {
                    if !op.eval(env)? {
                        return Ok(false);
                    }
                }
                true
            }
            Expr::Or(ops) => {
                for op in ops {
                    if op.eval(env)? {
                        return Ok(true);
                    }
                }
                false
            }
            Expr::Xor(lhs, rhs) => lhs.eval(env)? ^ rhs.eval(env)?,
        })
    }

    /// Free variables, sorted.
    pub fn variables(&self) -> BTreeSet<String> {
        let mut vars = BTreeSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables(&self, vars: &mut BTreeSet<String>) {
        match self {
            Expr::Const(_) => {}
            Expr::Var(name) => {
                vars.insert(name.clone());
            }
            Expr::Not(inner) => inner.collect_variables(vars),
            Expr::And(ops) | Expr::Or(ops) => {
                for op in ops {
                    op.collect_variables(vars);
                }
            }
            Expr::Xor(lhs, rhs) => {
                lhs.collect_variables(vars);
                rhs.collect_variables(vars);
            }
        }
    }

    /// Whether the printed form needs parentheses when used as an operand.
    /// A single-operand AND/OR prints as its operand.
    fn is_compound(&self) -> bool {
        match self {
            Expr::And(ops) | Expr::Or(ops) => match ops.as_slice() {
                [] => false,
                [only] => only.is_compound(),
                _ => true,
            },
            Expr::Xor(..) => true,
            Expr::Const(_) | Expr::Var(_) | Expr::Not(_) => false,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_compound() {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }

    fn fmt_joined(ops: &[Expr], sep: &str, empty: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match ops {
            [] => return f.write_str(empty),
            [only] => return write!(f, "{only}"),
            _ => {}
        }
        for (i, op) in ops.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            op.fmt_operand(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(v) => f.write_str(if *v { "1" } else { "0" }),
            Expr::Var(name) => f.write_str(name),
            Expr::Not(inner) => {
                f.write_str("~")?;
                inner.fmt_operand(f)
            }
            Expr::And(ops) => Expr::fmt_joined(ops, " & ", "1", f),
            Expr::Or(ops) => Expr::fmt_joined(ops, " | ", "0", f),
            Expr::Xor(lhs, rhs) => {
                lhs.fmt_operand(f)?;
                f.write_str(" ^ ")?;
                rhs.fmt_operand(f)
            }
        }
    }
}
