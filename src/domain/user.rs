use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Amount;

/// Eight-digit national identifier, unique per user.
pub type UserId = String;

/// A registered account holder.
///
/// Fields are only readable from outside the crate; balances change exclusively
/// through the ledger service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    balance: Amount,
    /// Balance at registration time, kept for integrity checks
    opening_balance: Amount,
    registered_at: DateTime<Utc>,
}

impl User {
    pub(crate) fn new(id: impl Into<UserId>, name: impl Into<String>, balance: Amount) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            balance,
            opening_balance: balance,
            registered_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn opening_balance(&self) -> Amount {
        self.opening_balance
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Store a balance the ledger has already computed with checked arithmetic.
    pub(crate) fn set_balance(&mut self, balance: Amount) {
        self.balance = balance;
    }
}
