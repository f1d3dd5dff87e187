//! Public record API operations
//!
//! Sheets are addressed by `(user id, sheet name)`; the first sheet with that
//! name wins. The caller must be the addressed user, otherwise `Forbidden`.

use async_trait::async_trait;

use crate::error::{SheetError, SheetResult};
use crate::record::{Record, RecordInput};
use crate::types::{RowId, UserId};

/// Sheet address in the public API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetAddress {
    pub user_id: UserId,
    pub sheet_name: String,
}

impl SheetAddress {
    pub fn new(user_id: impl Into<String>, sheet_name: impl Into<String>) -> Self {
        Self {
            user_id: UserId::new(user_id),
            sheet_name: sheet_name.into(),
        }
    }

    /// Only the addressed user may use the address. Checked before anything
    /// else about the request is looked at.
    pub fn authorize(&self, caller: &UserId) -> SheetResult<()> {
        if caller != &self.user_id {
            return Err(SheetError::forbidden());
        }
        Ok(())
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All rows flattened, in row order
    async fn list_records(&self, caller: &UserId, address: &SheetAddress) -> SheetResult<Vec<Record>>;

    /// Create a row with one cell per field, taking values from `input`
    async fn create_record(
        &self,
        caller: &UserId,
        address: &SheetAddress,
        input: RecordInput,
    ) -> SheetResult<Record>;

    /// `NotFound` when the row is not in the addressed sheet
    async fn get_record(
        &self,
        caller: &UserId,
        address: &SheetAddress,
        row_id: &RowId,
    ) -> SheetResult<Record>;

    /// Upsert cells for the fields named in `input` and return the re-read row
    async fn update_record(
        &self,
        caller: &UserId,
        address: &SheetAddress,
        row_id: &RowId,
        input: RecordInput,
    ) -> SheetResult<Record>;

    async fn delete_record(
        &self,
        caller: &UserId,
        address: &SheetAddress,
        row_id: &RowId,
    ) -> SheetResult<()>;
}
