use thiserror::Error;

/// Errors raised while grouping DIMMs into interleave sets.
///
/// Every variant aborts the whole grouping request. Goals appended to the
/// caller's output before the failure are left in place.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InterleaveError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(
        "Interleaving match not found: no known topology matches the remaining \
         {remaining} DIMM(s) (population {population:#b})"
    )]
    Aborted { remaining: usize, population: u64 },

    #[error("Out of resources: region goal could not be created after {created} goal(s)")]
    OutOfResources { created: usize },

    #[error("Bad buffer size: {consumed} DIMMs consumed but only {available} supplied")]
    BadBufferSize { consumed: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, InterleaveError>;
