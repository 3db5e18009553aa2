use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;

use super::{format_amount, Amount, TransactionKind, TransactionRecord, User, UserId};

/// Compute net flows for every user mentioned in the history.
/// Returns a map of user id -> net flow. Flows saturate at the decimal range.
pub fn compute_all_net_flows(history: &[TransactionRecord]) -> HashMap<UserId, Amount> {
    let mut flows: HashMap<UserId, Amount> = HashMap::new();

    for record in history {
        let source = flows.entry(record.source().to_string()).or_default();
        *source = match record.kind() {
            TransactionKind::Deposit => source.saturating_add(record.amount()),
            TransactionKind::Withdrawal | TransactionKind::Transfer => {
                source.saturating_sub(record.amount())
            }
        };
        if let Some(destination) = record.destination() {
            let flow = flows.entry(destination.to_string()).or_default();
            *flow = flow.saturating_add(record.amount());
        }
    }

    flows
}

/// Result of checking the stored balances against the transaction history.
#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    pub user_count: usize,
    pub transaction_count: usize,
    /// Sum of all current balances, `None` if it exceeds the decimal range
    pub total_holdings: Option<Amount>,
    /// Opening balances + deposits - withdrawals, `None` if out of range
    pub expected_holdings: Option<Amount>,
    pub has_sequence_gaps: bool,
    pub negative_balances: Vec<UserId>,
    pub unknown_references: Vec<UserId>,
    pub issues: Vec<String>,
}

impl IntegrityReport {
    pub fn is_balanced(&self) -> bool {
        self.total_holdings.is_some() && self.total_holdings == self.expected_holdings
    }

    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}

fn checked_sum(mut amounts: impl Iterator<Item = Amount>) -> Option<Amount> {
    amounts.try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
}

pub fn build_integrity_report(users: &[User], history: &[TransactionRecord]) -> IntegrityReport {
    let mut issues = Vec::new();

    let has_sequence_gaps = history
        .iter()
        .enumerate()
        .any(|(i, record)| record.sequence() != i as u64 + 1);
    if has_sequence_gaps {
        issues.push("Transaction sequence numbers are not contiguous".to_string());
    }

    let known: HashSet<&str> = users.iter().map(|u| u.id()).collect();
    let mut unknown_references: Vec<UserId> = Vec::new();
    for record in history {
        for id in std::iter::once(record.source()).chain(record.destination()) {
            if !known.contains(id) && !unknown_references.iter().any(|u| u == id) {
                unknown_references.push(id.to_string());
            }
        }
    }
    for id in &unknown_references {
        issues.push(format!("History references unregistered user {}", id));
    }

    let negative_balances: Vec<UserId> = users
        .iter()
        .filter(|u| u.balance() < Decimal::ZERO)
        .map(|u| u.id().to_string())
        .collect();
    for id in &negative_balances {
        issues.push(format!("User {} has a negative balance", id));
    }

    let flows = compute_all_net_flows(history);
    for user in users {
        let flow = flows.get(user.id()).copied().unwrap_or_default();
        match user.opening_balance().checked_add(flow) {
            Some(expected) if expected == user.balance() => {}
            Some(expected) => issues.push(format!(
                "User {} balance {} does not match history ({})",
                user.id(),
                format_amount(user.balance()),
                format_amount(expected)
            )),
            None => issues.push(format!(
                "User {} history exceeds the representable range",
                user.id()
            )),
        }
    }

    let total_holdings = checked_sum(users.iter().map(|u| u.balance()));
    let opening = checked_sum(users.iter().map(|u| u.opening_balance()));
    let external = checked_sum(history.iter().map(|r| match r.kind() {
        TransactionKind::Deposit => r.amount(),
        TransactionKind::Withdrawal => -r.amount(),
        TransactionKind::Transfer => Decimal::ZERO,
    }));
    let expected_holdings = opening
        .zip(external)
        .and_then(|(opening, external)| opening.checked_add(external));

    match (total_holdings, expected_holdings) {
        (Some(total), Some(expected)) if total != expected => issues.push(format!(
            "Total holdings {} differ from opening balances plus net deposits ({})",
            format_amount(total),
            format_amount(expected)
        )),
        (Some(_), Some(_)) => {}
        _ => issues.push("Total holdings exceed the representable range".to_string()),
    }

    IntegrityReport {
        user_count: users.len(),
        transaction_count: history.len(),
        total_holdings,
        expected_holdings,
        has_sequence_gaps,
        negative_balances,
        unknown_references,
        issues,
    }
}
