//! Sheet, field, row and cell operations used by the UI-facing API

use async_trait::async_trait;

use crate::error::SheetResult;
use crate::types::{
    Cell, CellId, CellValue, Field, FieldId, FieldPatch, NewField, NewSheet, OrderUpdate, Row,
    RowId, Sheet, SheetDetail, SheetId, SheetPatch, UserId,
};

/// Sheet CRUD
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// All sheets owned by `owner`, oldest first
    async fn list_sheets(&self, owner: &UserId) -> SheetResult<Vec<Sheet>>;

    /// Create a sheet. Fails with `Validation` when the name is empty.
    async fn create_sheet(&self, owner: &UserId, input: NewSheet) -> SheetResult<Sheet>;

    /// Sheet with ordered fields, ordered rows and all cells.
    /// `NotFound` when absent or owned by someone else.
    async fn get_sheet(&self, owner: &UserId, sheet_id: &SheetId) -> SheetResult<SheetDetail>;

    /// Partial update. `NotFound` when absent or not owned.
    async fn update_sheet(
        &self,
        owner: &UserId,
        sheet_id: &SheetId,
        patch: SheetPatch,
    ) -> SheetResult<Sheet>;

    /// Delete with cascade. `NotFound` when absent or not owned.
    async fn delete_sheet(&self, owner: &UserId, sheet_id: &SheetId) -> SheetResult<()>;
}

/// Field CRUD and ordering
#[async_trait]
pub trait FieldStore: Send + Sync {
    /// Append a field with `order = max + 1`. Existing rows get no cells.
    /// `NotFound` when the sheet is absent or not owned.
    async fn create_field(
        &self,
        owner: &UserId,
        sheet_id: &SheetId,
        input: NewField,
    ) -> SheetResult<Field>;

    /// `NotFound` for a missing sheet or field, `Forbidden` for a foreign sheet
    async fn update_field(
        &self,
        owner: &UserId,
        sheet_id: &SheetId,
        field_id: &FieldId,
        patch: FieldPatch,
    ) -> SheetResult<Field>;

    /// Delete a field and its cells. Same errors as `update_field`.
    async fn delete_field(
        &self,
        owner: &UserId,
        sheet_id: &SheetId,
        field_id: &FieldId,
    ) -> SheetResult<()>;

    /// Apply all order updates atomically; ids outside the sheet are
    /// skipped. Returns the number of fields updated.
    /// `NotFound` for a missing sheet, `Forbidden` for a foreign sheet.
    async fn reorder_fields(
        &self,
        owner: &UserId,
        sheet_id: &SheetId,
        orders: &[OrderUpdate<FieldId>],
    ) -> SheetResult<usize>;
}

/// Row CRUD and ordering
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Append a row with `order = max + 1` and one null cell per field.
    /// `NotFound` when the sheet is absent or not owned.
    async fn create_row(&self, owner: &UserId, sheet_id: &SheetId) -> SheetResult<Row>;

    /// Delete a row and its cells. `NotFound` when absent, `Forbidden` when
    /// the row's sheet belongs to someone else.
    async fn delete_row(&self, owner: &UserId, row_id: &RowId) -> SheetResult<()>;

    /// Same contract as `FieldStore::reorder_fields`
    async fn reorder_rows(
        &self,
        owner: &UserId,
        sheet_id: &SheetId,
        orders: &[OrderUpdate<RowId>],
    ) -> SheetResult<usize>;
}

/// Single cell writes
#[async_trait]
pub trait CellStore: Send + Sync {
    /// Overwrite a cell's value and bump `updated_at`.
    /// `NotFound` when absent, `Forbidden` when owned by someone else.
    async fn update_cell(
        &self,
        owner: &UserId,
        cell_id: &CellId,
        value: Option<CellValue>,
    ) -> SheetResult<Cell>;
}
