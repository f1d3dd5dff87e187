//! API route handlers

pub mod cells;
pub mod fields;
pub mod health;
pub mod records;
pub mod rows;
pub mod sheets;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::str::FromStr;

use crate::auth::require_session;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Sheet endpoints
        .route("/api/sheets", get(sheets::list_sheets).post(sheets::create_sheet))
        .route(
            "/api/sheets/:id",
            get(sheets::get_sheet)
                .patch(sheets::update_sheet)
                .delete(sheets::delete_sheet),
        )
        // Field endpoints
        .route("/api/sheets/:id/fields", post(fields::create_field))
        .route("/api/sheets/:id/fields/reorder", patch(fields::reorder_fields))
        .route(
            "/api/sheets/:id/fields/:field_id",
            patch(fields::update_field).delete(fields::delete_field),
        )
        // Row endpoints
        .route("/api/sheets/:id/rows", post(rows::create_row))
        .route("/api/sheets/:id/rows/reorder", patch(rows::reorder_rows))
        .route("/api/rows/:id", axum::routing::delete(rows::delete_row))
        // Cell endpoints
        .route("/api/cells/:id", patch(cells::update_cell))
        // Public record endpoints
        .route(
            "/api/user/:user_id/sheet/:sheet_name",
            get(records::list_records).post(records::create_record),
        )
        .route(
            "/api/user/:user_id/sheet/:sheet_name/:row_id",
            get(records::get_record)
                .put(records::update_record)
                .delete(records::delete_record),
        )
        // Everything above needs a session
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session))
        // Health endpoint
        .route("/api/health", get(health::health_check))
        // State
        .with_state(state)
}

/// Parse a path id; a malformed id cannot name an existing resource
pub(crate) fn parse_id<T: FromStr>(raw: &str, what: &str) -> ApiResult<T> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("{} not found", what)))
}
