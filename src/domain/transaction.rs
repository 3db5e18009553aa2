use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Amount, UserId};

pub type TransactionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money entering a user's account from outside the ledger
    Deposit,
    /// Money leaving a user's account to outside the ledger
    Withdrawal,
    /// Money moving between two registered users
    Transfer,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
            TransactionKind::Transfer => "transfer",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One completed ledger operation.
/// Records are immutable: there are no setters, and the only constructors are the
/// three per-kind ones, so `destination` is present exactly for transfers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    id: TransactionId,
    /// Position in the history, starting at 1. Assigned by the ledger on append.
    sequence: u64,
    kind: TransactionKind,
    /// Always positive
    amount: Amount,
    timestamp: DateTime<Utc>,
    source: UserId,
    destination: Option<UserId>,
}

impl TransactionRecord {
    fn new(
        kind: TransactionKind,
        amount: Amount,
        source: UserId,
        destination: Option<UserId>,
    ) -> Self {
        assert!(amount > Amount::ZERO, "Transaction amount must be positive");
        Self {
            id: Uuid::new_v4(),
            sequence: 0, // Will be set by the ledger
            kind,
            amount,
            timestamp: Utc::now(),
            source,
            destination,
        }
    }

    pub fn deposit(user: impl Into<UserId>, amount: Amount) -> Self {
        Self::new(TransactionKind::Deposit, amount, user.into(), None)
    }

    pub fn withdrawal(user: impl Into<UserId>, amount: Amount) -> Self {
        Self::new(TransactionKind::Withdrawal, amount, user.into(), None)
    }

    pub fn transfer(
        source: impl Into<UserId>,
        destination: impl Into<UserId>,
        amount: Amount,
    ) -> Self {
        Self::new(
            TransactionKind::Transfer,
            amount,
            source.into(),
            Some(destination.into()),
        )
    }

    pub(crate) fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    /// Returns true if `user` is the source or the destination of this record
    pub fn involves(&self, user: &str) -> bool {
        self.source == user || self.destination.as_deref() == Some(user)
    }
}
