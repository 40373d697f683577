//! Truth tables.

use serde::Serialize;

use crate::error::{SynthError, SynthResult};
use crate::expr::{Assignment, Expr};
use crate::parse::parse_expression;

/// Options bounding table enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthOptions {
    /// Largest variable count enumerated (2^N rows).
    pub max_variables: usize,
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self { max_variables: 16 }
    }
}

/// One row: input bits in variable order, and the expression's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TruthRow {
    pub inputs: Vec<bool>,
    pub output: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TruthTable {
    /// Free variables, sorted.
    pub variables: Vec<String>,
    /// All 2^N assignments in ascending binary order, first variable most significant.
    pub rows: Vec<TruthRow>,
}

impl TruthTable {
    /// Variable assignment of a row.
    pub fn assignment(&self, row: &TruthRow) -> Assignment {
        self.variables
            .iter()
            .cloned()
            .zip(row.inputs.iter().copied())
            .collect()
    }

    /// Rows where the expression is `1`.
    pub fn minterms(&self) -> impl Iterator<Item = &TruthRow> {
        self.rows.iter().filter(|r| r.output)
    }

    /// Rows where the expression is `0`.
    pub fn maxterms(&self) -> impl Iterator<Item = &TruthRow> {
        self.rows.iter().filter(|r| !r.output)
    }

    /// Comma-separated export: header of variables then `output_name`, one line per row.
    pub fn to_csv(&self, output_name: &str) -> String {
        let bit = |b: bool| if b { "1" } else { "0" };
        let mut header: Vec<&str> = self.variables.iter().map(String::as_str).collect();
        header.push(output_name);

        let mut csv = header.join(",");
        csv.push('\n');
        for row in &self.rows {
            let mut cells: Vec<&str> = row.inputs.iter().map(|&b| bit(b)).collect();
            cells.push(bit(row.output));
            csv.push_str(&cells.join(","));
            csv.push('\n');
        }
        csv
    }
}

/// Truth table of expression text, with default limits.
pub fn truth_table(expression: &str) -> SynthResult<TruthTable> {
    truth_table_with(expression, &SynthOptions::default())
}

pub fn truth_table_with(expression: &str, opts: &SynthOptions) -> SynthResult<TruthTable> {
    let expr = parse_expression(expression)?;
    truth_table_for(&expr, opts)
}

/// Every input pattern over `n` variables, in ascending binary order with
/// the first variable most significant.
///
/// Fails with `TooManyVariables` when `n` is above `opts.max_variables`.
pub fn input_rows(n: usize, opts: SynthOptions) -> SynthResult<impl Iterator<Item = Vec<bool>>> {
    if n > opts.max_variables || n >= usize::BITS as usize {
        return Err(SynthError::TooManyVariables {
            count: n,
            max: opts.max_variables,
        });
    }
    Ok((0..(1usize << n))
        .map(move |index| (0..n).map(|j| (index >> (n - 1 - j)) & 1 == 1).collect()))
}

/// Enumerate every assignment of `expr`'s free variables and evaluate it.
pub fn truth_table_for(expr: &Expr, opts: &SynthOptions) -> SynthResult<TruthTable> {
    let variables: Vec<String> = expr.variables().into_iter().collect();

    let patterns = input_rows(variables.len(), *opts)?;

    let mut rows = Vec::with_capacity(1 << variables.len());
    let mut env = Assignment::new();
    for inputs in patterns {
        for (name, &value) in variables.iter().zip(&inputs) {
            env.insert(name.clone(), value);
        }
        let output = expr.eval(&env)?;
        rows.push(TruthRow { inputs, output });
    }

    Ok(TruthTable { variables, rows })
}
