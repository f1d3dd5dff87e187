//! Record Service Implementation
//!
//! Implements `RecordStore`, the flattened per-sheet view used by the public
//! API. Rows are read and written as name-keyed records; the normalized
//! field/row/cell tables stay the source of truth.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::Connection;
use std::sync::Arc;
use tabula_core::store::{RecordStore, SheetAddress};
use tabula_core::{
    project_row, project_rows, Field, Record, RecordInput, Row, RowId, Sheet, SheetError,
    SheetResult, UserId,
};
use tracing::{debug, info};

use super::row_service::append_row;
use crate::repos::SheetDatabase;

/// Record Service
pub struct RecordService {
    database: Arc<SheetDatabase>,
}

impl RecordService {
    pub fn new(database: Arc<SheetDatabase>) -> Self {
        Self { database }
    }
}

/// Resolve an address to a sheet and its ordered fields. The caller must
/// already be authorized for the address.
fn resolve(
    database: &SheetDatabase,
    conn: &Connection,
    address: &SheetAddress,
) -> SheetResult<(Sheet, Vec<Field>)> {
    let sheet = database
        .sheets
        .find_by_name(conn, &address.user_id, &address.sheet_name)?
        .ok_or_else(|| SheetError::not_found("Sheet"))?;
    let fields = database.fields.list_by_sheet(conn, &sheet.id)?;
    Ok((sheet, fields))
}

fn row_in_sheet(
    database: &SheetDatabase,
    conn: &Connection,
    sheet: &Sheet,
    row_id: &RowId,
) -> SheetResult<Row> {
    database
        .rows
        .get_in_sheet(conn, &sheet.id, row_id)?
        .ok_or_else(|| SheetError::not_found("Row"))
}

fn read_record(
    database: &SheetDatabase,
    conn: &Connection,
    fields: &[Field],
    row_id: RowId,
) -> SheetResult<Record> {
    let cells = database.cells.list_by_row(conn, &row_id)?;
    Ok(project_row(row_id, fields, &cells))
}

#[async_trait]
impl RecordStore for RecordService {
    async fn list_records(&self, caller: &UserId, address: &SheetAddress) -> SheetResult<Vec<Record>> {
        address.authorize(caller)?;
        let address = address.clone();
        self.database
            .query(move |db, conn| {
                let (sheet, fields) = resolve(db, conn, &address)?;
                let rows = db.rows.list_by_sheet(conn, &sheet.id)?;
                let cells = db.cells.list_by_sheet(conn, &sheet.id)?;
                debug!(sheet_id = %sheet.id, rows = rows.len(), "Records listed");
                Ok(project_rows(&rows, &fields, &cells))
            })
            .await
    }

    async fn create_record(
        &self,
        caller: &UserId,
        address: &SheetAddress,
        input: RecordInput,
    ) -> SheetResult<Record> {
        address.authorize(caller)?;
        let address = address.clone();
        let (sheet_id, record) = self
            .database
            .transact(move |db, tx| {
                let (sheet, fields) = resolve(db, tx, &address)?;
                let values = input.values_for_all(&fields)?;
                let row = append_row(db, tx, &sheet.id, values)?;
                let record = read_record(db, tx, &fields, row.id)?;
                Ok::<_, SheetError>((sheet.id, record))
            })
            .await?;

        info!(sheet_id = %sheet_id, row_id = %record.id, "Record created");
        Ok(record)
    }

    async fn get_record(
        &self,
        caller: &UserId,
        address: &SheetAddress,
        row_id: &RowId,
    ) -> SheetResult<Record> {
        address.authorize(caller)?;
        let (address, row_id) = (address.clone(), *row_id);
        self.database
            .query(move |db, conn| {
                let (sheet, fields) = resolve(db, conn, &address)?;
                let row = row_in_sheet(db, conn, &sheet, &row_id)?;
                read_record(db, conn, &fields, row.id)
            })
            .await
    }

    async fn update_record(
        &self,
        caller: &UserId,
        address: &SheetAddress,
        row_id: &RowId,
        input: RecordInput,
    ) -> SheetResult<Record> {
        address.authorize(caller)?;
        let (address, id) = (address.clone(), *row_id);
        let (written, record) = self
            .database
            .transact(move |db, tx| {
                let (sheet, fields) = resolve(db, tx, &address)?;
                let row = row_in_sheet(db, tx, &sheet, &id)?;
                let values = input.values_for_present(&fields)?;
                let now = Utc::now();
                for (field_id, value) in &values {
                    db.cells.upsert(tx, &row.id, field_id, value.as_ref(), now)?;
                }
                let record = read_record(db, tx, &fields, row.id)?;
                Ok::<_, SheetError>((values.len(), record))
            })
            .await?;

        info!(row_id = %row_id, cells = written, "Record updated");
        Ok(record)
    }

    async fn delete_record(
        &self,
        caller: &UserId,
        address: &SheetAddress,
        row_id: &RowId,
    ) -> SheetResult<()> {
        address.authorize(caller)?;
        let (address, id) = (address.clone(), *row_id);
        self.database
            .transact(move |db, tx| {
                let (sheet, _) = resolve(db, tx, &address)?;
                row_in_sheet(db, tx, &sheet, &id)?;
                db.rows.delete(tx, &id)?;
                Ok::<_, SheetError>(())
            })
            .await?;

        info!(row_id = %row_id, "Record deleted");
        Ok(())
    }
}
