//! Sheet Service Implementation
//!
//! Implements `SheetStore`. Foreign sheets are reported as missing.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tabula_core::store::SheetStore;
use tabula_core::{
    NewSheet, Sheet, SheetDetail, SheetError, SheetId, SheetPatch, SheetResult, UserId,
};
use tracing::{debug, info};

use super::access::{owned_sheet, OnForeign};
use crate::repos::SheetDatabase;

/// Sheet Service
pub struct SheetService {
    database: Arc<SheetDatabase>,
}

impl SheetService {
    pub fn new(database: Arc<SheetDatabase>) -> Self {
        Self { database }
    }
}

#[async_trait]
impl SheetStore for SheetService {
    async fn list_sheets(&self, owner: &UserId) -> SheetResult<Vec<Sheet>> {
        let owner = owner.clone();
        self.database
            .query(move |db, conn| Ok(db.sheets.list_by_owner(conn, &owner)?))
            .await
    }

    async fn create_sheet(&self, owner: &UserId, input: NewSheet) -> SheetResult<Sheet> {
        let input = input.validated()?;
        let now = Utc::now();
        let sheet = Sheet {
            id: SheetId::generate(),
            name: input.name,
            description: input.description,
            user_id: owner.clone(),
            created_at: now,
            updated_at: now,
        };

        let sheet = self
            .database
            .transact(move |db, tx| {
                db.sheets.insert(tx, &sheet)?;
                Ok::<_, SheetError>(sheet)
            })
            .await?;

        info!(sheet_id = %sheet.id, user_id = %owner, name = %sheet.name, "Sheet created");
        Ok(sheet)
    }

    async fn get_sheet(&self, owner: &UserId, sheet_id: &SheetId) -> SheetResult<SheetDetail> {
        let (owner, sheet_id) = (owner.clone(), *sheet_id);
        self.database
            .query(move |db, conn| {
                let sheet = owned_sheet(db, conn, &owner, &sheet_id, OnForeign::Conceal)?;
                let fields = db.fields.list_by_sheet(conn, &sheet_id)?;
                let rows = db.rows.list_by_sheet(conn, &sheet_id)?;
                let cells = db.cells.list_by_sheet(conn, &sheet_id)?;
                debug!(
                    sheet_id = %sheet_id,
                    fields = fields.len(),
                    rows = rows.len(),
                    cells = cells.len(),
                    "Sheet loaded"
                );
                Ok(SheetDetail {
                    sheet,
                    fields,
                    rows,
                    cells,
                })
            })
            .await
    }

    async fn update_sheet(
        &self,
        owner: &UserId,
        sheet_id: &SheetId,
        patch: SheetPatch,
    ) -> SheetResult<Sheet> {
        let (caller, id) = (owner.clone(), *sheet_id);
        let sheet = self
            .database
            .transact(move |db, tx| {
                let mut sheet = owned_sheet(db, tx, &caller, &id, OnForeign::Conceal)?;
                patch.apply_to(&mut sheet);
                sheet.updated_at = Utc::now();
                db.sheets.update(tx, &sheet)?;
                Ok::<_, SheetError>(sheet)
            })
            .await?;

        info!(sheet_id = %sheet_id, user_id = %owner, "Sheet updated");
        Ok(sheet)
    }

    async fn delete_sheet(&self, owner: &UserId, sheet_id: &SheetId) -> SheetResult<()> {
        let (caller, id) = (owner.clone(), *sheet_id);
        self.database
            .transact(move |db, tx| {
                owned_sheet(db, tx, &caller, &id, OnForeign::Conceal)?;
                db.sheets.delete(tx, &id)?;
                Ok::<_, SheetError>(())
            })
            .await?;

        info!(sheet_id = %sheet_id, user_id = %owner, "Sheet deleted");
        Ok(())
    }
}
