use thiserror::Error;

use crate::domain::{format_amount, Amount, UserId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Invalid identifier '{0}': must be exactly 8 digits")]
    InvalidIdentifier(String),

    #[error("Invalid name '{0}': use at least 2 letters and spaces only")]
    InvalidName(String),

    #[error(
        "Invalid opening balance{}: must be a non-negative number",
        opening(.0)
    )]
    InvalidBalance(Option<Amount>),

    #[error("A user with identifier {0} is already registered")]
    DuplicateIdentifier(UserId),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("No user registered with identifier {0}")]
    UserNotFound(UserId),

    #[error("Cannot transfer to the same account ({0})")]
    SameAccount(UserId),

    #[error(
        "Insufficient balance for user {user}: balance {}, required {}",
        money(.balance),
        money(.required)
    )]
    InsufficientBalance {
        user: UserId,
        balance: Amount,
        required: Amount,
    },
}

fn money(amount: &Amount) -> String {
    format_amount(*amount)
}

fn opening(balance: &Option<Amount>) -> String {
    balance.map(|b| format!(" {}", b)).unwrap_or_default()
}

/// Fieldless mirror of `AppError`, for comparing failures by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidIdentifier,
    InvalidName,
    InvalidBalance,
    DuplicateIdentifier,
    InvalidAmount,
    UserNotFound,
    SameAccount,
    InsufficientBalance,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidIdentifier(_) => ErrorKind::InvalidIdentifier,
            AppError::InvalidName(_) => ErrorKind::InvalidName,
            AppError::InvalidBalance(_) => ErrorKind::InvalidBalance,
            AppError::DuplicateIdentifier(_) => ErrorKind::DuplicateIdentifier,
            AppError::InvalidAmount(_) => ErrorKind::InvalidAmount,
            AppError::UserNotFound(_) => ErrorKind::UserNotFound,
            AppError::SameAccount(_) => ErrorKind::SameAccount,
            AppError::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
        }
    }
}
