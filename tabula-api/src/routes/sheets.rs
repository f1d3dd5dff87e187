//! Sheet endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tabula_core::store::SheetStore;
use tabula_core::SheetId;

use super::parse_id;
use crate::auth::AuthUser;
use crate::dto::{
    CreateSheetRequest, JsonBody, SheetDetailResponse, SheetResponse, SheetsResponse,
    SuccessResponse, UpdateSheetRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// List the caller's sheets
pub async fn list_sheets(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<SheetsResponse>> {
    let sheets = state.sheets.list_sheets(user.id()).await?;

    Ok(Json(SheetsResponse {
        sheets: sheets.into_iter().map(Into::into).collect(),
    }))
}

/// Create a sheet
pub async fn create_sheet(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(req): JsonBody<CreateSheetRequest>,
) -> ApiResult<(StatusCode, Json<SheetResponse>)> {
    let sheet = state
        .sheets
        .create_sheet(user.id(), req.into_new_sheet())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SheetResponse {
            sheet: sheet.into(),
        }),
    ))
}

/// Get a sheet with its fields, rows and cells
pub async fn get_sheet(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<SheetDetailResponse>> {
    let sheet_id: SheetId = parse_id(&id, "Sheet")?;
    let detail = state.sheets.get_sheet(user.id(), &sheet_id).await?;

    Ok(Json(detail.into()))
}

/// Update name and/or description
pub async fn update_sheet(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateSheetRequest>,
) -> ApiResult<Json<SheetResponse>> {
    let sheet_id: SheetId = parse_id(&id, "Sheet")?;
    let sheet = state
        .sheets
        .update_sheet(user.id(), &sheet_id, req.into())
        .await?;

    Ok(Json(SheetResponse {
        sheet: sheet.into(),
    }))
}

/// Delete a sheet and everything in it
pub async fn delete_sheet(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessResponse>> {
    let sheet_id: SheetId = parse_id(&id, "Sheet")?;
    state.sheets.delete_sheet(user.id(), &sheet_id).await?;

    Ok(Json(SuccessResponse::ok()))
}
