//! Row endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tabula_core::store::RowStore;
use tabula_core::{RowId, SheetId};

use super::parse_id;
use crate::auth::AuthUser;
use crate::dto::{JsonBody, ReorderRequest, ReorderResponse, RowResponse, SuccessResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// Append a row with one empty cell per field
pub async fn create_row(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<(StatusCode, Json<RowResponse>)> {
    let sheet_id: SheetId = parse_id(&id, "Sheet")?;
    let row = state.rows.create_row(user.id(), &sheet_id).await?;

    Ok((StatusCode::CREATED, Json(RowResponse { row: row.into() })))
}

/// Delete a row and its cells
pub async fn delete_row(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessResponse>> {
    let row_id: RowId = parse_id(&id, "Row")?;
    state.rows.delete_row(user.id(), &row_id).await?;

    Ok(Json(SuccessResponse::ok()))
}

/// Apply a batch of row order updates
pub async fn reorder_rows(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<ReorderRequest>,
) -> ApiResult<Json<ReorderResponse>> {
    let sheet_id: SheetId = parse_id(&id, "Sheet")?;
    let updated = state
        .rows
        .reorder_rows(user.id(), &sheet_id, &req.updates())
        .await?;

    Ok(Json(ReorderResponse {
        success: true,
        updated,
    }))
}
