mod ledger;
mod money;
mod transaction;
mod user;
pub mod validation;

pub use ledger::*;
pub use money::*;
pub use transaction::*;
pub use user::*;
