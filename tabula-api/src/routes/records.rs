//! Public record endpoints
//!
//! Rows of `/api/user/:user_id/sheet/:sheet_name` as flat JSON objects:
//! `{ "_id": <rowId>, "<fieldName>": value, ... }`. A caller other than
//! `:user_id` is refused before the row id or body is validated.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tabula_core::store::{RecordStore, SheetAddress};
use tabula_core::{Record, RecordInput, RowId};

use super::parse_id;
use crate::auth::AuthUser;
use crate::dto::{JsonBody, SuccessResponse};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// List all records of a sheet
pub async fn list_records(
    State(state): State<AppState>,
    user: AuthUser,
    Path((user_id, sheet_name)): Path<(String, String)>,
) -> ApiResult<Json<Vec<Record>>> {
    let address = SheetAddress::new(user_id, sheet_name);
    address.authorize(user.id())?;
    let records = state.records.list_records(user.id(), &address).await?;

    Ok(Json(records))
}

/// Create a record from a `{fieldName: value}` object
pub async fn create_record(
    State(state): State<AppState>,
    user: AuthUser,
    Path((user_id, sheet_name)): Path<(String, String)>,
    body: Result<JsonBody<Value>, ApiError>,
) -> ApiResult<(StatusCode, Json<Record>)> {
    let address = SheetAddress::new(user_id, sheet_name);
    address.authorize(user.id())?;
    let JsonBody(body) = body?;
    let input = RecordInput::from_json(body)?;
    let record = state
        .records
        .create_record(user.id(), &address, input)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Get one record
pub async fn get_record(
    State(state): State<AppState>,
    user: AuthUser,
    Path((user_id, sheet_name, row_id)): Path<(String, String, String)>,
) -> ApiResult<Json<Record>> {
    let address = SheetAddress::new(user_id, sheet_name);
    address.authorize(user.id())?;
    let row_id: RowId = parse_id(&row_id, "Row")?;
    let record = state
        .records
        .get_record(user.id(), &address, &row_id)
        .await?;

    Ok(Json(record))
}

/// Write the fields named in the body and return the updated record
pub async fn update_record(
    State(state): State<AppState>,
    user: AuthUser,
    Path((user_id, sheet_name, row_id)): Path<(String, String, String)>,
    body: Result<JsonBody<Value>, ApiError>,
) -> ApiResult<Json<Record>> {
    let address = SheetAddress::new(user_id, sheet_name);
    address.authorize(user.id())?;
    let row_id: RowId = parse_id(&row_id, "Row")?;
    let JsonBody(body) = body?;
    let input = RecordInput::from_json(body)?;
    let record = state
        .records
        .update_record(user.id(), &address, &row_id, input)
        .await?;

    Ok(Json(record))
}

/// Delete a record
pub async fn delete_record(
    State(state): State<AppState>,
    user: AuthUser,
    Path((user_id, sheet_name, row_id)): Path<(String, String, String)>,
) -> ApiResult<Json<SuccessResponse>> {
    let address = SheetAddress::new(user_id, sheet_name);
    address.authorize(user.id())?;
    let row_id: RowId = parse_id(&row_id, "Row")?;
    state
        .records
        .delete_record(user.id(), &address, &row_id)
        .await?;

    Ok(Json(SuccessResponse::ok()))
}
