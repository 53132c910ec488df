use thiserror::Error;

use crate::calendar::MonthYear;
use crate::models::Unit;

pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("{entity} {id} not found")]
    InvalidReference { entity: &'static str, id: String },

    #[error("payment for {unit} in {month} is already recorded")]
    DuplicatePayment { unit: Unit, month: MonthYear },

    #[error("{unit} has already won a draw in this committee")]
    DuplicateWinner { unit: Unit },

    #[error("malformed input: {0}")]
    MalformedInput(String),
}

impl LedgerError {
    pub fn missing(entity: &'static str, id: impl ToString) -> Self {
        Self::InvalidReference {
            entity,
            id: id.to_string(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }
}
