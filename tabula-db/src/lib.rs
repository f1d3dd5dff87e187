//! Tabula Database Layer
//!
//! SQLite storage for Tabula sheets and the services implementing the
//! `tabula_core::store` traits on top of it.
//!
//! - `schema` - table definitions with foreign keys and cascade deletes
//! - `entities` - row mapping between SQLite and core types
//! - `repos` - `SheetDatabase` plus one repository per table
//! - `services` - ownership checks, validation and transactions
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use tabula_db::{SheetDatabase, SheetService};
//!
//! let database = Arc::new(SheetDatabase::open_in_memory()?);
//! database.init_schema()?;
//! let sheets = SheetService::new(database.clone());
//! ```

pub mod entities;
pub mod error;
pub mod repos;
pub mod schema;
pub mod services;

pub use error::*;
pub use repos::*;
pub use schema::TABULA_SCHEMA;
pub use services::{
    CellService, FieldService, IdentityService, RecordService, RowService, SheetService,
};
