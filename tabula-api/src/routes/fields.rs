//! Field endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tabula_core::store::FieldStore;
use tabula_core::{FieldId, SheetId};

use super::parse_id;
use crate::auth::AuthUser;
use crate::dto::{
    CreateFieldRequest, FieldResponse, JsonBody, ReorderRequest, ReorderResponse,
    SuccessResponse, UpdateFieldRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// Append a field to a sheet
pub async fn create_field(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<CreateFieldRequest>,
) -> ApiResult<(StatusCode, Json<FieldResponse>)> {
    let sheet_id: SheetId = parse_id(&id, "Sheet")?;
    let input = req.into_new_field()?;
    let field = state
        .fields
        .create_field(user.id(), &sheet_id, input)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(FieldResponse {
            field: field.into(),
        }),
    ))
}

/// Rename, retype or change the options of a field
pub async fn update_field(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, field_id)): Path<(String, String)>,
    JsonBody(req): JsonBody<UpdateFieldRequest>,
) -> ApiResult<Json<FieldResponse>> {
    let sheet_id: SheetId = parse_id(&id, "Sheet")?;
    let field_id: FieldId = parse_id(&field_id, "Field")?;
    let field = state
        .fields
        .update_field(user.id(), &sheet_id, &field_id, req.into_patch()?)
        .await?;

    Ok(Json(FieldResponse {
        field: field.into(),
    }))
}

/// Delete a field and its cells
pub async fn delete_field(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, field_id)): Path<(String, String)>,
) -> ApiResult<Json<SuccessResponse>> {
    let sheet_id: SheetId = parse_id(&id, "Sheet")?;
    let field_id: FieldId = parse_id(&field_id, "Field")?;
    state
        .fields
        .delete_field(user.id(), &sheet_id, &field_id)
        .await?;

    Ok(Json(SuccessResponse::ok()))
}

/// Apply a batch of field order updates
pub async fn reorder_fields(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<ReorderRequest>,
) -> ApiResult<Json<ReorderResponse>> {
    let sheet_id: SheetId = parse_id(&id, "Sheet")?;
    let updated = state
        .fields
        .reorder_fields(user.id(), &sheet_id, &req.updates())
        .await?;

    Ok(Json(ReorderResponse {
        success: true,
        updated,
    }))
}
