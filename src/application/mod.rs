// Application layer - use cases and orchestration.
// The registry owns users, the ledger service owns the history and
// borrows the registry to move money between users.

pub mod error;
pub mod registry;
pub mod service;

pub use error::*;
pub use registry::*;
pub use service::*;
