use tracing::{debug, info, warn};

use crate::domain::validation::{has_sufficient_balance, is_positive_amount, parse_amount};
use crate::domain::{
    build_integrity_report, Amount, IntegrityReport, TransactionRecord, User, UserId,
};

use super::{AppError, UserRegistry};

/// Application service providing the ledger operations.
/// This is the primary interface for any client (menu session, scripts, tests).
///
/// The service owns the transaction history and borrows the user registry:
/// users are resolved by index and mutated in place, never copied.
pub struct LedgerService<'r> {
    users: &'r mut UserRegistry,
    history: Vec<TransactionRecord>,
}

/// Result of a transfer
#[derive(Debug, Clone)]
pub struct TransferResult {
    pub record: TransactionRecord,
    pub source_balance: Amount,
    pub destination_balance: Amount,
    pub source_name: String,
    pub destination_name: String,
}

/// Balance snapshot for a single user
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceEntry {
    pub id: UserId,
    pub name: String,
    pub balance: Amount,
}

/// Parse amount text entered by a client, mapping bad input to `InvalidAmount`.
pub fn amount_from_input(text: &str) -> Result<Amount, AppError> {
    parse_amount(text).ok_or_else(|| {
        AppError::InvalidAmount(format!("'{}' is not a valid number", text.trim()))
    })
}

fn reject(operation: &'static str, err: AppError) -> AppError {
    warn!(operation, kind = ?err.kind(), "{}", err);
    err
}

fn out_of_range(operation: &'static str, id: &str, amount: Amount) -> AppError {
    reject(
        operation,
        AppError::InvalidAmount(format!(
            "{} would take the balance of user {} out of range",
            amount, id
        )),
    )
}

fn require_positive(operation: &'static str, amount: Amount) -> Result<(), AppError> {
    if is_positive_amount(Some(amount)) {
        Ok(())
    } else {
        Err(reject(
            operation,
            AppError::InvalidAmount(format!("{} must be greater than zero", amount)),
        ))
    }
}

impl<'r> LedgerService<'r> {
    /// Create a new ledger service with an empty history.
    pub fn new(users: &'r mut UserRegistry) -> Self {
        Self {
            users,
            history: Vec::new(),
        }
    }

    /// Read-only access to the registered users.
    pub fn users(&self) -> &UserRegistry {
        self.users
    }

    /// Register a new user through the borrowed registry.
    pub fn register_user(
        &mut self,
        id: &str,
        name: &str,
        initial_balance: Option<Amount>,
    ) -> Result<User, AppError> {
        self.users.register(id, name, initial_balance)
    }

    fn resolve(&self, operation: &'static str, id: &str) -> Result<usize, AppError> {
        self.users
            .position(id)
            .ok_or_else(|| reject(operation, AppError::UserNotFound(id.to_string())))
    }

    fn append(&mut self, record: TransactionRecord) -> &TransactionRecord {
        let sequence = self.history.len() as u64 + 1;
        self.history.push(record.with_sequence(sequence));
        &self.history[self.history.len() - 1]
    }

    // ========================
    // Balance operations
    // ========================

    /// Add funds to a user's account. Returns the new balance.
    pub fn deposit(&mut self, id: &str, amount: Amount) -> Result<Amount, AppError> {
        require_positive("deposit", amount)?;
        let index = self.resolve("deposit", id)?;

        let new_balance = self
            .users
            .get(index)
            .balance()
            .checked_add(amount)
            .ok_or_else(|| out_of_range("deposit", id, amount))?;

        self.users.get_mut(index).set_balance(new_balance);
        let record = self.append(TransactionRecord::deposit(id, amount));

        info!(
            user = id,
            %amount,
            %new_balance,
            sequence = record.sequence(),
            "deposit recorded"
        );
        Ok(new_balance)
    }

    /// Take funds out of a user's account. Returns the new balance.
    pub fn withdraw(&mut self, id: &str, amount: Amount) -> Result<Amount, AppError> {
        require_positive("withdraw", amount)?;
        let index = self.resolve("withdraw", id)?;

        let balance = self.users.get(index).balance();
        if !has_sufficient_balance(balance, amount) {
            return Err(reject(
                "withdraw",
                AppError::InsufficientBalance {
                    user: id.to_string(),
                    balance,
                    required: amount,
                },
            ));
        }

        let new_balance = balance
            .checked_sub(amount)
            .ok_or_else(|| out_of_range("withdraw", id, amount))?;

        self.users.get_mut(index).set_balance(new_balance);
        let record = self.append(TransactionRecord::withdrawal(id, amount));

        info!(
            user = id,
            %amount,
            %new_balance,
            sequence = record.sequence(),
            "withdrawal recorded"
        );
        Ok(new_balance)
    }

    /// Move funds between two users.
    /// The source is resolved before the destination; the destination balance has
    /// no upper bound.
    pub fn transfer(
        &mut self,
        source_id: &str,
        destination_id: &str,
        amount: Amount,
    ) -> Result<TransferResult, AppError> {
        require_positive("transfer", amount)?;

        if source_id == destination_id {
            return Err(reject(
                "transfer",
                AppError::SameAccount(source_id.to_string()),
            ));
        }

        let source_index = self.resolve("transfer", source_id)?;
        let destination_index = self.resolve("transfer", destination_id)?;

        let balance = self.users.get(source_index).balance();
        if !has_sufficient_balance(balance, amount) {
            return Err(reject(
                "transfer",
                AppError::InsufficientBalance {
                    user: source_id.to_string(),
                    balance,
                    required: amount,
                },
            ));
        }

        let source_balance = balance
            .checked_sub(amount)
            .ok_or_else(|| out_of_range("transfer", source_id, amount))?;
        let destination_balance = self
            .users
            .get(destination_index)
            .balance()
            .checked_add(amount)
            .ok_or_else(|| out_of_range("transfer", destination_id, amount))?;

        let (source, destination) = self.users.pair_mut(source_index, destination_index);
        source.set_balance(source_balance);
        destination.set_balance(destination_balance);
        let source_name = source.name().to_string();
        let destination_name = destination.name().to_string();

        let record = self
            .append(TransactionRecord::transfer(source_id, destination_id, amount))
            .clone();

        info!(
            source = source_id,
            destination = destination_id,
            %amount,
            %source_balance,
            sequence = record.sequence(),
            "transfer recorded"
        );

        Ok(TransferResult {
            record,
            source_balance,
            destination_balance,
            source_name,
            destination_name,
        })
    }

    /// Get the balance snapshot for a single user.
    pub fn balance_of(&self, id: &str) -> Result<BalanceEntry, AppError> {
        let index = self.resolve("balance", id)?;
        let user = self.users.get(index);
        Ok(BalanceEntry {
            id: user.id().to_string(),
            name: user.name().to_string(),
            balance: user.balance(),
        })
    }

    // ========================
    // History operations
    // ========================

    /// All recorded transactions, oldest first.
    pub fn history(&self) -> &[TransactionRecord] {
        &self.history
    }

    /// Transactions where `id` is the source or the destination, oldest first.
    /// An unregistered identifier is an error; a registered user with no
    /// activity yields an empty list.
    pub fn history_for(&self, id: &str) -> Result<Vec<&TransactionRecord>, AppError> {
        if !self.users.exists(id) {
            return Err(reject("history", AppError::UserNotFound(id.to_string())));
        }

        let records: Vec<&TransactionRecord> =
            self.history.iter().filter(|r| r.involves(id)).collect();
        debug!(user = id, count = records.len(), "filtered history");
        Ok(records)
    }

    // ========================
    // Integrity operations
    // ========================

    /// Check stored balances against the history and return a report.
    pub fn check_integrity(&self) -> IntegrityReport {
        let report = build_integrity_report(self.users.list_all(), &self.history);
        if !report.is_healthy() {
            warn!(issues = report.issues.len(), "ledger integrity check failed");
        }
        report
    }
}
