use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::domain::validation::{is_valid_identifier, is_valid_name};
use crate::domain::{Amount, User};

use super::AppError;

/// In-memory set of registered users, in registration order.
///
/// The registry is the single owner of every `User`. Other components read
/// through shared borrows and mutate through the index-based handles below.
#[derive(Debug, Default)]
pub struct UserRegistry {
    users: Vec<User>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new user.
    /// Checks run in order: identifier format, name format, opening balance,
    /// then uniqueness. Nothing is stored unless every check passes.
    pub fn register(
        &mut self,
        id: &str,
        name: &str,
        initial_balance: Option<Amount>,
    ) -> Result<User, AppError> {
        let result = self.try_register(id, name, initial_balance);
        match &result {
            Ok(user) => info!(user = user.id(), balance = %user.balance(), "registered user"),
            Err(err) => warn!(user = id, kind = ?err.kind(), "registration rejected"),
        }
        result
    }

    fn try_register(
        &mut self,
        id: &str,
        name: &str,
        initial_balance: Option<Amount>,
    ) -> Result<User, AppError> {
        if !is_valid_identifier(id) {
            return Err(AppError::InvalidIdentifier(id.to_string()));
        }

        if !is_valid_name(name) {
            return Err(AppError::InvalidName(name.to_string()));
        }

        let balance = match initial_balance {
            Some(balance) if balance >= Decimal::ZERO => balance,
            other => return Err(AppError::InvalidBalance(other)),
        };

        if self.exists(id) {
            return Err(AppError::DuplicateIdentifier(id.to_string()));
        }

        let user = User::new(id, name.trim(), balance);
        self.users.push(user.clone());
        Ok(user)
    }

    /// Find a user by identifier.
    pub fn find_by_id(&self, id: &str) -> Option<&User> {
        debug!(user = id, "looking up user");
        self.users.iter().find(|u| u.id() == id)
    }

    pub fn exists(&self, id: &str) -> bool {
        self.find_by_id(id).is_some()
    }

    /// All users in registration order. The slice is read-only.
    pub fn list_all(&self) -> &[User] {
        &self.users
    }

    pub fn count(&self) -> usize {
        self.users.len()
    }

    /// Index of the user with the given identifier.
    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.users.iter().position(|u| u.id() == id)
    }

    pub(crate) fn get(&self, index: usize) -> &User {
        &self.users[index]
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> &mut User {
        &mut self.users[index]
    }

    /// Mutable handles to two distinct users at once.
    pub(crate) fn pair_mut(&mut self, first: usize, second: usize) -> (&mut User, &mut User) {
        assert_ne!(first, second, "pair_mut requires two distinct users");
        if first < second {
            let (head, tail) = self.users.split_at_mut(second);
            (&mut head[first], &mut tail[0])
        } else {
            let (head, tail) = self.users.split_at_mut(first);
            (&mut tail[0], &mut head[second])
        }
    }
}
