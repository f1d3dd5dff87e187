//! Row Service Implementation
//!
//! Implements `RowStore`. A row is always created together with one cell
//! per field of its sheet.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::Connection;
use std::sync::Arc;
use tabula_core::store::RowStore;
use tabula_core::{
    check_order, next_order, Cell, CellId, CellValue, FieldId, OrderUpdate, Row, RowId,
    SheetError, SheetId, SheetResult, UserId,
};
use tracing::{debug, info};

use super::access::{owned_sheet, require_owner, OnForeign};
use crate::repos::SheetDatabase;

/// Append a row to `sheet_id` with the given cell values, one per field.
/// Must run inside a write transaction.
pub(crate) fn append_row(
    database: &SheetDatabase,
    conn: &Connection,
    sheet_id: &SheetId,
    values: Vec<(FieldId, Option<CellValue>)>,
) -> SheetResult<Row> {
    let now = Utc::now();
    let row = Row {
        id: RowId::generate(),
        sheet_id: *sheet_id,
        order: next_order(database.rows.max_order(conn, sheet_id)?)?,
        created_at: now,
        updated_at: now,
    };
    database.rows.insert(conn, &row)?;

    let cells: Vec<Cell> = values
        .into_iter()
        .map(|(field_id, value)| Cell {
            id: CellId::generate(),
            row_id: row.id,
            field_id,
            value,
            updated_at: now,
        })
        .collect();
    database.cells.insert_many(conn, &cells)?;

    debug!(sheet_id = %sheet_id, row_id = %row.id, cells = cells.len(), "Row appended");
    Ok(row)
}

/// Row Service
pub struct RowService {
    database: Arc<SheetDatabase>,
}

impl RowService {
    pub fn new(database: Arc<SheetDatabase>) -> Self {
        Self { database }
    }
}

#[async_trait]
impl RowStore for RowService {
    async fn create_row(&self, owner: &UserId, sheet_id: &SheetId) -> SheetResult<Row> {
        let (caller, id) = (owner.clone(), *sheet_id);
        let row = self
            .database
            .transact(move |db, tx| {
                owned_sheet(db, tx, &caller, &id, OnForeign::Conceal)?;
                let values = db
                    .fields
                    .list_by_sheet(tx, &id)?
                    .into_iter()
                    .map(|field| (field.id, None))
                    .collect();
                append_row(db, tx, &id, values)
            })
            .await?;

        info!(sheet_id = %sheet_id, row_id = %row.id, order = row.order, "Row created");
        Ok(row)
    }

    async fn delete_row(&self, owner: &UserId, row_id: &RowId) -> SheetResult<()> {
        let (caller, id) = (owner.clone(), *row_id);
        self.database
            .transact(move |db, tx| {
                let row_owner = db
                    .rows
                    .owner_of(tx, &id)?
                    .ok_or_else(|| SheetError::not_found("Row"))?;
                require_owner(&row_owner, &caller)?;
                db.rows.delete(tx, &id)?;
                Ok::<_, SheetError>(())
            })
            .await?;

        info!(row_id = %row_id, user_id = %owner, "Row deleted");
        Ok(())
    }

    async fn reorder_rows(
        &self,
        owner: &UserId,
        sheet_id: &SheetId,
        orders: &[OrderUpdate<RowId>],
    ) -> SheetResult<usize> {
        for update in orders {
            check_order(update.order)?;
        }

        let (caller, id, batch) = (owner.clone(), *sheet_id, orders.to_vec());
        let updated = self
            .database
            .transact(move |db, tx| {
                owned_sheet(db, tx, &caller, &id, OnForeign::Deny)?;
                let now = Utc::now();
                let mut updated = 0;
                for update in &batch {
                    updated += db.rows.set_order(tx, &id, &update.id, update.order, now)?;
                }
                Ok::<_, SheetError>(updated)
            })
            .await?;

        if updated < orders.len() {
            debug!(
                sheet_id = %sheet_id,
                skipped = orders.len() - updated,
                "Ignored order updates for rows outside the sheet"
            );
        }
        info!(sheet_id = %sheet_id, count = updated, "Rows reordered");
        Ok(updated)
    }
}
