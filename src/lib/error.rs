use rust_decimal::Decimal;
use thiserror::Error;

pub type SplitResult<T> = Result<T, SplitError>;

/// Failures at the edges of the engine: reading expenses, writing reports, loading config.
///
/// The balance and settlement computations themselves never fail.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: '{value}' is not a valid amount")]
    InvalidAmount { line: u64, value: String },

    #[error("line {line}: amount {amount} is negative")]
    NegativeAmount { line: u64, amount: Decimal },

    #[error("line {line}: amount {amount} exceeds the largest accepted amount {max}")]
    AmountTooLarge {
        line: u64,
        amount: Decimal,
        max: Decimal,
    },

    #[error("line {line}: expense has no payer")]
    MissingPayer { line: u64 },

    #[error("line {line}: split list contains an empty name")]
    EmptyParticipantName { line: u64 },

    #[error("report is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("could not flush report writer: {0}")]
    IntoInner(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("tolerance must be greater than zero, got {0}")]
    InvalidTolerance(Decimal),
}

impl SplitError {
    /// Errors caused by the contents of the expense file rather than the environment.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Csv(_)
                | Self::InvalidAmount { .. }
                | Self::NegativeAmount { .. }
                | Self::AmountTooLarge { .. }
                | Self::MissingPayer { .. }
                | Self::EmptyParticipantName { .. }
        )
    }
}
