//! Cell endpoint

use axum::{
    extract::{Path, State},
    Json,
};
use tabula_core::store::CellStore;
use tabula_core::CellId;

use super::parse_id;
use crate::auth::AuthUser;
use crate::dto::{CellResponse, JsonBody, UpdateCellRequest};
use crate::error::ApiResult;
use crate::state::AppState;

/// Overwrite a cell value
pub async fn update_cell(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateCellRequest>,
) -> ApiResult<Json<CellResponse>> {
    let cell_id: CellId = parse_id(&id, "Cell")?;
    let value = req.cell_value()?;
    let cell = state.cells.update_cell(user.id(), &cell_id, value).await?;

    Ok(Json(CellResponse { cell: cell.into() }))
}
