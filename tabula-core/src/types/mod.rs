//! Core types for Tabula

pub mod cell;
pub mod common;
pub mod field;
pub mod row;
pub mod sheet;
pub mod user;

pub use cell::*;
pub use common::*;
pub use field::*;
pub use row::*;
pub use sheet::*;
pub use user::*;
