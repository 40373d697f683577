use thiserror::Error;

pub type LfResult<T> = Result<T, LfError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LfError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}
