//! Tabula Core
//!
//! Core types and service interfaces for Tabula, a multi-tenant
//! "table-as-a-service" backend. Users own named sheets; each sheet has typed
//! columns (fields), ordered rows and one cell per (row, field).
//!
//! Storage lives in `tabula-db`, the HTTP surface in `tabula-api`. This crate
//! only knows about the domain:
//! - `types` - identifiers, sheets, fields, rows, cells, users and sessions
//! - `record` - the flattened `{ _id, <fieldName>: value }` projection
//! - `store` - async traits implemented by the storage services
//! - `error` - the error taxonomy shared by every layer

pub mod constants;
pub mod error;
pub mod record;
pub mod store;
pub mod types;

pub use constants::*;
pub use error::*;
pub use record::*;
pub use types::*;
