#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("variable {variable} has an invalid {field}: {value}")]
    InvalidVariable {
        variable: usize,
        field: &'static str,
        value: f64,
    },

    #[error("constraint {left} -> {right} is invalid: {reason}")]
    InvalidConstraint {
        left: usize,
        right: usize,
        reason: &'static str,
    },

    #[error("unknown variable index {index} (solver has {len} variables)")]
    UnknownVariable { index: usize, len: usize },

    #[error(
        "non-finite block sums for the block containing variable {variable} \
         (sum_ad={sum_ad}, sum_ab={sum_ab}, sum_a2={sum_a2})"
    )]
    NonFiniteBlockSums {
        variable: usize,
        sum_ad: f64,
        sum_ab: f64,
        sum_a2: f64,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
