//! Service interfaces for Tabula
//!
//! Every sheet-scoped operation takes the caller's `UserId` and checks it
//! against the owner of the addressed sheet. Which error an ownership failure
//! produces (`NotFound` or `Forbidden`) is fixed per operation and documented
//! on the trait method.
//!
//! Multi-statement writes (row + cells, reorders, record writes) are atomic:
//! implementations must apply them in a single transaction.

mod identity;
mod record;
mod sheet;

pub use identity::*;
pub use record::*;
pub use sheet::*;
