//! lf-synth: symbolic analysis of logicflow circuits.
//!
//! Provides:
//! - Boolean expression tree, printer and parser (`~ & ^ |`, `0`/`1`)
//! - Per-sink expression synthesis from a circuit graph
//! - Truth tables and CSV export
//! - Logical-identity transformation tables
//!
//! # Example
//!
//! ```
//! use lf_synth::truth_table;
//!
//! let table = truth_table("~A").unwrap();
//! assert_eq!(table.variables, vec!["A"]);
//! assert_eq!(table.rows[0].output, true);
//! assert_eq!(table.rows[1].output, false);
//! ```

pub mod error;
pub mod expr;
pub mod parse;
pub mod synth;
pub mod table;
pub mod transform;

pub use error::{SynthError, SynthResult};
pub use expr::{Assignment, Expr};
pub use parse::parse_expression;
pub use synth::{
    MAX_EXPRESSION_NODES, SinkExpression, Synthesis, gate_expression, synthesize_expression,
};
pub use table::{
    SynthOptions, TruthRow, TruthTable, input_rows, truth_table, truth_table_for, truth_table_with,
};
pub use transform::{
    TransformRow, transformation_table, transformation_table_for, transformation_table_with,
};
