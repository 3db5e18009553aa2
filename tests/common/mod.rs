// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use rust_decimal_macros::dec;
use saldo::application::{ErrorKind, LedgerService};
use saldo::domain::Amount;

pub const ANA: &str = "12345678";
pub const LUIS: &str = "87654321";
pub const CARLA: &str = "11223344";
pub const UNKNOWN: &str = "99999999";

/// Test fixture: Standard user setup
pub struct StandardUsers;

impl StandardUsers {
    /// Register Ana Torres (100.00) and Luis Paz (0.00)
    pub fn register(ledger: &mut LedgerService<'_>) -> Result<()> {
        ledger.register_user(ANA, "Ana Torres", Some(dec!(100.00)))?;
        ledger.register_user(LUIS, "Luis Paz", Some(dec!(0.00)))?;
        Ok(())
    }

    /// Standard users plus Carla Núñez (250.50)
    pub fn register_three(ledger: &mut LedgerService<'_>) -> Result<()> {
        Self::register(ledger)?;
        ledger.register_user(CARLA, "Carla Núñez", Some(dec!(250.50)))?;
        Ok(())
    }
}

/// Current balance of a registered user
pub fn balance(ledger: &LedgerService<'_>, id: &str) -> Amount {
    ledger.balance_of(id).expect("user should exist").balance
}

/// Unwrap the error kind of a failed operation
pub fn kind_of<T: std::fmt::Debug>(result: Result<T, saldo::application::AppError>) -> ErrorKind {
    result.expect_err("operation should fail").kind()
}
