use thiserror::Error;

/// Which neighbour constraint a rejected absorption block broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOrder {
    /// Absorption time is equal to or larger than the one of the following block.
    Before,
    /// Absorption time is equal to or less than the one of the previous block.
    After,
    /// Absorption time is not strictly between the previous and the following block.
    Between,
}

#[derive(Debug, Error)]
pub enum FpuError {
    #[error("Maximum FPU value already exists: {0}")]
    DuplicateThreshold(f64),

    #[error("{}", time_order_message(.0))]
    TimeOrderViolation(TimeOrder),

    #[error("At least one absorption block required")]
    MinimumBlocksViolation,

    #[error("Invalid input: {0}")]
    InvalidNumericInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

fn time_order_message(order: &TimeOrder) -> &'static str {
    match order {
        TimeOrder::Before => {
            "Absorption time is equals or larger than the one of the following absorption block"
        }
        TimeOrder::After => "Absorption time is equals or less than the one of the block before",
        TimeOrder::Between => "Absorption time must be between previous and following block",
    }
}

pub type Result<T> = std::result::Result<T, FpuError>;
