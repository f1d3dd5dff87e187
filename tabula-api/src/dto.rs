//! Data Transfer Objects for API requests/responses

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tabula_core::{
    Cell, CellId, CellValue, Field, FieldId, FieldOptions, FieldPatch, FieldType, NewField,
    NewSheet, OrderUpdate, Row, RowId, Sheet, SheetDetail, SheetId, SheetPatch, SheetResult,
    UserId,
};

use crate::error::ApiError;

/// JSON body extractor that answers malformed bodies with 400
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Rejected request body");
                Err(ApiError::BadRequest("Invalid request body".to_string()))
            }
        }
    }
}

/// Distinguish an explicit `null` (`Some(None)`) from an absent key (`None`)
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ============ Sheets ============

/// Create sheet request
#[derive(Debug, Deserialize)]
pub struct CreateSheetRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CreateSheetRequest {
    pub fn into_new_sheet(self) -> NewSheet {
        NewSheet {
            name: self.name.unwrap_or_default(),
            description: self.description,
        }
    }
}

/// Update sheet request
#[derive(Debug, Deserialize)]
pub struct UpdateSheetRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

impl From<UpdateSheetRequest> for SheetPatch {
    fn from(req: UpdateSheetRequest) -> Self {
        SheetPatch {
            name: req.name,
            description: req.description,
        }
    }
}

/// Sheet response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetDto {
    pub id: SheetId,
    pub name: String,
    pub description: Option<String>,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Sheet> for SheetDto {
    fn from(sheet: Sheet) -> Self {
        Self {
            id: sheet.id,
            name: sheet.name,
            description: sheet.description,
            user_id: sheet.user_id,
            created_at: sheet.created_at,
            updated_at: sheet.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SheetsResponse {
    pub sheets: Vec<SheetDto>,
}

#[derive(Debug, Serialize)]
pub struct SheetResponse {
    pub sheet: SheetDto,
}

/// Sheet with fields, rows and cells
#[derive(Debug, Serialize)]
pub struct SheetDetailResponse {
    pub sheet: SheetDto,
    pub fields: Vec<FieldDto>,
    pub rows: Vec<RowDto>,
    pub cells: Vec<CellDto>,
}

impl From<SheetDetail> for SheetDetailResponse {
    fn from(detail: SheetDetail) -> Self {
        Self {
            sheet: detail.sheet.into(),
            fields: detail.fields.into_iter().map(Into::into).collect(),
            rows: detail.rows.into_iter().map(Into::into).collect(),
            cells: detail.cells.into_iter().map(Into::into).collect(),
        }
    }
}

// ============ Fields ============

/// Create field request
#[derive(Debug, Deserialize)]
pub struct CreateFieldRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    pub options: Option<FieldOptions>,
}

impl CreateFieldRequest {
    /// Parse the type name; unknown types are a validation error
    pub fn into_new_field(self) -> SheetResult<NewField> {
        Ok(NewField {
            name: self.name.unwrap_or_default(),
            field_type: self.field_type.as_deref().map(str::parse).transpose()?,
            options: self.options,
        })
    }
}

/// Update field request
#[derive(Debug, Deserialize)]
pub struct UpdateFieldRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub options: Option<Option<FieldOptions>>,
}

impl UpdateFieldRequest {
    pub fn into_patch(self) -> SheetResult<FieldPatch> {
        Ok(FieldPatch {
            name: self.name,
            field_type: self.field_type.as_deref().map(str::parse).transpose()?,
            options: self.options,
        })
    }
}

/// Field response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDto {
    pub id: FieldId,
    pub sheet_id: SheetId,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub options: Option<FieldOptions>,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Field> for FieldDto {
    fn from(field: Field) -> Self {
        Self {
            id: field.id,
            sheet_id: field.sheet_id,
            name: field.name,
            field_type: field.field_type,
            options: field.options,
            order: field.order,
            created_at: field.created_at,
            updated_at: field.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FieldResponse {
    pub field: FieldDto,
}

// ============ Rows ============

/// Row response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowDto {
    pub id: RowId,
    pub sheet_id: SheetId,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Row> for RowDto {
    fn from(row: Row) -> Self {
        Self {
            id: row.id,
            sheet_id: row.sheet_id,
            order: row.order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RowResponse {
    pub row: RowDto,
}

// ============ Reordering ============

/// One entry of a reorder request
#[derive(Debug, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub order: i64,
}

/// Reorder request for fields or rows
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub orders: Vec<OrderItem>,
}

impl ReorderRequest {
    /// Typed updates. Ids that are not UUIDs cannot belong to the sheet and
    /// are dropped here, like any other foreign id.
    pub fn updates<Id: std::str::FromStr>(&self) -> Vec<OrderUpdate<Id>> {
        self.orders
            .iter()
            .filter_map(|item| {
                item.id.parse().ok().map(|id| OrderUpdate {
                    id,
                    order: item.order,
                })
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct ReorderResponse {
    pub success: bool,
    pub updated: usize,
}

// ============ Cells ============

/// Update cell request. A missing `value` clears the cell.
#[derive(Debug, Deserialize)]
pub struct UpdateCellRequest {
    #[serde(default)]
    pub value: Value,
}

impl UpdateCellRequest {
    pub fn cell_value(&self) -> SheetResult<Option<CellValue>> {
        CellValue::from_json(&self.value)
    }
}

/// Cell response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellDto {
    pub id: CellId,
    pub row_id: RowId,
    pub field_id: FieldId,
    pub value: Option<CellValue>,
    pub updated_at: DateTime<Utc>,
}

impl From<Cell> for CellDto {
    fn from(cell: Cell) -> Self {
        Self {
            id: cell.id,
            row_id: cell.row_id,
            field_id: cell.field_id,
            value: cell.value,
            updated_at: cell.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CellResponse {
    pub cell: CellDto,
}

// ============ Common ============

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_description_null_vs_absent() {
        let absent: UpdateSheetRequest = serde_json::from_value(json!({"name": "x"})).unwrap();
        assert_eq!(absent.description, None);

        let cleared: UpdateSheetRequest =
            serde_json::from_value(json!({"description": null})).unwrap();
        assert_eq!(cleared.description, Some(None));
    }

    #[test]
    fn test_unknown_field_type_rejected() {
        let req: CreateFieldRequest =
            serde_json::from_value(json!({"name": "a", "type": "checkbox"})).unwrap();
        assert!(req.into_new_field().is_err());

        let req: CreateFieldRequest =
            serde_json::from_value(json!({"name": "a", "type": "multiSelect"})).unwrap();
        assert_eq!(
            req.into_new_field().unwrap().field_type,
            Some(FieldType::MultiSelect)
        );
    }

    #[test]
    fn test_reorder_drops_unparsable_ids() {
        let id = FieldId::generate();
        let req: ReorderRequest = serde_json::from_value(json!({
            "orders": [{"id": id.to_string(), "order": 2}, {"id": "nope", "order": 1}]
        }))
        .unwrap();
        let updates: Vec<OrderUpdate<FieldId>> = req.updates();
        assert_eq!(updates, vec![OrderUpdate { id, order: 2 }]);
    }

    #[test]
    fn test_field_dto_uses_type_key() {
        let now = Utc::now();
        let dto = FieldDto::from(Field {
            id: FieldId::generate(),
            sheet_id: SheetId::generate(),
            name: "age".into(),
            field_type: FieldType::Number,
            options: None,
            order: 0,
            created_at: now,
            updated_at: now,
        });
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["type"], "number");
        assert!(json.get("sheetId").is_some());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_missing_cell_value_is_null() {
        let req: UpdateCellRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(req.cell_value().unwrap(), None);

        let req: UpdateCellRequest = serde_json::from_value(json!({"value": true})).unwrap();
        assert!(req.cell_value().is_err());
    }
}
