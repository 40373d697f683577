//! Logical-identity transformation table.
//!
//! Each row is a standard rewrite of the source expression. Rows whose
//! rewrite would print the same as the source are left out.

use serde::Serialize;

use crate::error::SynthResult;
use crate::expr::Expr;
use crate::parse::parse_expression;
use crate::table::{SynthOptions, TruthTable, truth_table_for};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformRow {
    pub rule: &'static str,
    pub expression: String,
}

/// Push negations down to literals. `negate` is the pending negation.
pub fn negation_normal_form(expr: &Expr, negate: bool) -> Expr {
    match expr {
        Expr::Const(v) => Expr::Const(*v ^ negate),
        Expr::Var(_) if negate => Expr::not(expr.clone()),
        Expr::Var(_) => expr.clone(),
        Expr::Not(inner) => negation_normal_form(inner, !negate),
        Expr::And(ops) => {
            let ops = ops.iter().map(|op| negation_normal_form(op, negate)).collect();
            if negate { Expr::Or(ops) } else { Expr::And(ops) }
        }
        Expr::Or(ops) => {
            let ops = ops.iter().map(|op| negation_normal_form(op, negate)).collect();
            if negate { Expr::And(ops) } else { Expr::Or(ops) }
        }
        // ~(a ^ b) == ~a ^ b
        Expr::Xor(lhs, rhs) => Expr::xor(
            negation_normal_form(lhs, negate),
            negation_normal_form(rhs, false),
        ),
    }
}

/// Apply De Morgan's law once at the top of the expression.
pub fn de_morgan(expr: &Expr) -> Option<Expr> {
    let flip = |ops: &[Expr]| ops.iter().cloned().map(Expr::negated).collect::<Vec<_>>();
    match expr {
        Expr::And(ops) if ops.len() > 1 => Some(Expr::not(Expr::Or(flip(ops)))),
        Expr::Or(ops) if ops.len() > 1 => Some(Expr::not(Expr::And(flip(ops)))),
        Expr::Not(inner) => match inner.as_ref() {
            Expr::And(ops) if ops.len() > 1 => Some(Expr::Or(flip(ops))),
            Expr::Or(ops) if ops.len() > 1 => Some(Expr::And(flip(ops))),
            _ => None,
        },
        _ => None,
    }
}

/// Remove every `~~`.
pub fn eliminate_double_negation(expr: &Expr) -> Expr {
    match expr {
        Expr::Not(inner) => match inner.as_ref() {
            Expr::Not(x) => eliminate_double_negation(x),
            other => Expr::not(eliminate_double_negation(other)),
        },
        Expr::And(ops) => Expr::And(ops.iter().map(eliminate_double_negation).collect()),
        Expr::Or(ops) => Expr::Or(ops.iter().map(eliminate_double_negation).collect()),
        Expr::Xor(lhs, rhs) => Expr::xor(
            eliminate_double_negation(lhs),
            eliminate_double_negation(rhs),
        ),
        leaf => leaf.clone(),
    }
}

/// Rewrite every `a ^ b` as `(a & ~b) | (~a & b)`.
pub fn expand_xor(expr: &Expr) -> Expr {
    match expr {
        Expr::Xor(lhs, rhs) => {
            let a = expand_xor(lhs);
            let b = expand_xor(rhs);
            Expr::Or(vec![
                Expr::And(vec![a.clone(), b.clone().negated()]),
                Expr::And(vec![a.negated(), b]),
            ])
        }
        Expr::Not(inner) => Expr::not(expand_xor(inner)),
        Expr::And(ops) => Expr::And(ops.iter().map(expand_xor).collect()),
        Expr::Or(ops) => Expr::Or(ops.iter().map(expand_xor).collect()),
        leaf => leaf.clone(),
    }
}

/// Reverse the operands of every commutative operator.
pub fn commute(expr: &Expr) -> Expr {
    match expr {
        Expr::And(ops) => Expr::And(ops.iter().rev().map(commute).collect()),
        Expr::Or(ops) => Expr::Or(ops.iter().rev().map(commute).collect()),
        Expr::Xor(lhs, rhs) => Expr::xor(commute(rhs), commute(lhs)),
        Expr::Not(inner) => Expr::not(commute(inner)),
        leaf => leaf.clone(),
    }
}

fn literal(name: &str, positive: bool) -> Expr {
    if positive {
        Expr::var(name)
    } else {
        Expr::not(Expr::var(name))
    }
}

/// Canonical sum of minterms; `0` if the expression is never true.
pub fn sum_of_products(table: &TruthTable) -> Expr {
    let terms: Vec<Expr> = table
        .minterms()
        .map(|row| {
            Expr::And(
                table
                    .variables
                    .iter()
                    .zip(&row.inputs)
                    .map(|(v, &b)| literal(v, b))
                    .collect(),
            )
        })
        .collect();
    match terms.len() {
        0 => Expr::Const(false),
        _ if table.variables.is_empty() => Expr::Const(true),
        _ => Expr::Or(terms),
    }
}

/// Canonical product of maxterms; `1` if the expression is never false.
pub fn product_of_sums(table: &TruthTable) -> Expr {
    let terms: Vec<Expr> = table
        .maxterms()
        .map(|row| {
            Expr::Or(
                table
                    .variables
                    .iter()
                    .zip(&row.inputs)
                    .map(|(v, &b)| literal(v, !b))
                    .collect(),
            )
        })
        .collect();
    match terms.len() {
        0 => Expr::Const(true),
        _ if table.variables.is_empty() => Expr::Const(false),
        _ => Expr::And(terms),
    }
}

/// Transformation table of expression text, with default limits.
pub fn transformation_table(expression: &str) -> SynthResult<Vec<TransformRow>> {
    transformation_table_with(expression, &SynthOptions::default())
}

pub fn transformation_table_with(
    expression: &str,
    opts: &SynthOptions,
) -> SynthResult<Vec<TransformRow>> {
    let expr = parse_expression(expression)?;
    Ok(transformation_table_for(&expr, opts))
}

/// Every applicable rewrite of `expr`, starting with the expression itself.
///
/// Canonical forms are only listed when the variable count is within
/// `opts.max_variables`.
pub fn transformation_table_for(expr: &Expr, opts: &SynthOptions) -> Vec<TransformRow> {
    let original = expr.to_string();
    let mut rows = vec![TransformRow {
        rule: "Original",
        expression: original.clone(),
    }];
    let mut push = |rule: &'static str, rewritten: Expr| {
        let expression = rewritten.to_string();
        if expression != original {
            rows.push(TransformRow { rule, expression });
        }
    };

    let cleaned = eliminate_double_negation(expr);
    if cleaned != *expr {
        push("Double negation elimination", cleaned);
    } else {
        push("Double negation", Expr::not(Expr::not(expr.clone())));
    }
    if let Some(dual) = de_morgan(expr) {
        push("De Morgan", dual);
    }
    push("Negation normal form", negation_normal_form(expr, false));
    push("XOR expansion", expand_xor(expr));
    push("Commutativity", commute(expr));

    if let Ok(table) = truth_table_for(expr, opts) {
        push("Sum of products", sum_of_products(&table));
        push("Product of sums", product_of_sums(&table));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::truth_table;

    fn rule<'a>(rows: &'a [TransformRow], name: &str) -> Option<&'a str> {
        rows.iter()
            .find(|r| r.rule == name)
            .map(|r| r.expression.as_str())
    }

    #[test]
    fn de_morgan_rows() {
        let rows = transformation_table("A & B").unwrap();
        assert_eq!(rule(&rows, "Original"), Some("A & B"));
        assert_eq!(rule(&rows, "De Morgan"), Some("~(~A | ~B)"));
        assert_eq!(rule(&rows, "Commutativity"), Some("B & A"));
        // identical to the original, so omitted
        assert_eq!(rule(&rows, "Sum of products"), None);
        assert_eq!(rule(&rows, "Negation normal form"), None);

        let rows = transformation_table("A | B").unwrap();
        assert_eq!(
            rule(&rows, "Sum of products"),
            Some("(~A & B) | (A & ~B) | (A & B)")
        );

        let rows = transformation_table("~(A | ~B)").unwrap();
        assert_eq!(rule(&rows, "De Morgan"), Some("~A & B"));
        assert_eq!(rule(&rows, "Negation normal form"), Some("~A & B"));
    }

    #[test]
    fn xor_rows() {
        let rows = transformation_table("A ^ B").unwrap();
        assert_eq!(rule(&rows, "XOR expansion"), Some("(A & ~B) | (~A & B)"));
        assert_eq!(rule(&rows, "Sum of products"), Some("(~A & B) | (A & ~B)"));
        assert_eq!(rule(&rows, "Product of sums"), Some("(A | B) & (~A | ~B)"));
    }

    #[test]
    fn double_negation_rows() {
        let rows = transformation_table("~~A").unwrap();
        assert_eq!(rule(&rows, "Double negation elimination"), Some("A"));
        let rows = transformation_table("A").unwrap();
        assert_eq!(rule(&rows, "Double negation"), Some("~~A"));
    }

    #[test]
    fn canonical_forms_of_constants() {
        let rows = transformation_table("A & ~A").unwrap();
        assert_eq!(rule(&rows, "Sum of products"), Some("0"));
        let rows = transformation_table("A | ~A").unwrap();
        assert_eq!(rule(&rows, "Product of sums"), Some("1"));
    }

    #[test]
    fn every_row_is_equivalent() {
        for src in ["~(A & B) ^ C", "A | (B ^ ~C)", "~(~A ^ B)", "A"] {
            let reference = truth_table(src).unwrap();
            for row in transformation_table(src).unwrap() {
                let t = truth_table(&row.expression).unwrap();
                let outputs: Vec<bool> = t.rows.iter().map(|r| r.output).collect();
                let expected: Vec<bool> = reference.rows.iter().map(|r| r.output).collect();
                assert_eq!(outputs, expected, "{} via {}", row.expression, row.rule);
            }
        }
    }
}
