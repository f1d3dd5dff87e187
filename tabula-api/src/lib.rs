//! Tabula API Server
//!
//! REST APIs for Tabula sheets. Every endpoint except the health check
//! requires `Authorization: Bearer <session-token>`.
//!
//! ## Endpoints
//!
//! ### Health
//! - GET /api/health - Service and database status
//!
//! ### Sheets
//! - GET /api/sheets - List the caller's sheets
//! - POST /api/sheets - Create sheet
//! - GET /api/sheets/:id - Sheet with fields, rows and cells
//! - PATCH /api/sheets/:id - Update name/description
//! - DELETE /api/sheets/:id - Delete sheet
//!
//! ### Fields
//! - POST /api/sheets/:id/fields - Create field
//! - PATCH /api/sheets/:id/fields/:field_id - Update field
//! - DELETE /api/sheets/:id/fields/:field_id - Delete field
//! - PATCH /api/sheets/:id/fields/reorder - Reorder fields
//!
//! ### Rows and cells
//! - POST /api/sheets/:id/rows - Create row
//! - PATCH /api/sheets/:id/rows/reorder - Reorder rows
//! - DELETE /api/rows/:id - Delete row
//! - PATCH /api/cells/:id - Update cell value
//!
//! ### Records
//! - GET /api/user/:user_id/sheet/:sheet_name - List records
//! - POST /api/user/:user_id/sheet/:sheet_name - Create record
//! - GET /api/user/:user_id/sheet/:sheet_name/:row_id - Get record
//! - PUT /api/user/:user_id/sheet/:sheet_name/:row_id - Update record
//! - DELETE /api/user/:user_id/sheet/:sheet_name/:row_id - Delete record

pub mod auth;
pub mod dto;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use auth::*;
pub use dto::*;
pub use error::*;
pub use routes::*;
pub use server::*;
pub use state::*;
pub use telemetry::*;
