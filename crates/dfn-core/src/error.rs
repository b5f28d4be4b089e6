use thiserror::Error;

pub type DfnResult<T> = Result<T, DfnError>;

#[derive(Error, Debug)]
pub enum DfnError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Ill-posed system: {what}")]
    IllPosed { what: String },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}
