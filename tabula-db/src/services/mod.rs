//! Tabula service implementations
//!
//! Implements the `tabula_core::store` traits on top of `SheetDatabase`.
//! Every multi-statement write runs inside one `SheetDatabase::transact`
//! transaction on tokio's blocking pool.

mod access;
mod cell_service;
mod field_service;
mod identity_service;
mod record_service;
mod row_service;
mod sheet_service;

pub use access::OnForeign;
pub use cell_service::*;
pub use field_service::*;
pub use identity_service::*;
pub use record_service::*;
pub use row_service::*;
pub use sheet_service::*;
