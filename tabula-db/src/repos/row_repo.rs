//! Row repository

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tabula_core::{Row, RowId, SheetId, UserId};

use crate::entities::{query_all, query_one};
use crate::error::DbResult;

/// Row repository
#[derive(Debug, Clone, Copy, Default)]
pub struct RowRepo;

impl RowRepo {
    pub fn insert(&self, conn: &Connection, row: &Row) -> DbResult<()> {
        conn.execute(
            "INSERT INTO \"rows\" (id, sheet_id, \"order\", created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                row.id.to_string(),
                row.sheet_id.to_string(),
                row.order,
                row.created_at,
                row.updated_at
            ],
        )?;
        Ok(())
    }

    pub fn get(&self, conn: &Connection, row_id: &RowId) -> DbResult<Option<Row>> {
        query_one(conn, "WHERE id = ?1", params![row_id.to_string()])
    }

    /// Row by id, only if it belongs to `sheet_id`
    pub fn get_in_sheet(
        &self,
        conn: &Connection,
        sheet_id: &SheetId,
        row_id: &RowId,
    ) -> DbResult<Option<Row>> {
        query_one(
            conn,
            "WHERE id = ?1 AND sheet_id = ?2",
            params![row_id.to_string(), sheet_id.to_string()],
        )
    }

    /// Rows of a sheet, top to bottom
    pub fn list_by_sheet(&self, conn: &Connection, sheet_id: &SheetId) -> DbResult<Vec<Row>> {
        query_all(
            conn,
            "WHERE sheet_id = ?1 ORDER BY \"order\", created_at, rowid",
            params![sheet_id.to_string()],
        )
    }

    pub fn max_order(&self, conn: &Connection, sheet_id: &SheetId) -> DbResult<Option<i64>> {
        let max = conn
            .query_row(
                "SELECT MAX(\"order\") FROM \"rows\" WHERE sheet_id = ?1",
                params![sheet_id.to_string()],
                |r| r.get::<_, Option<i64>>(0),
            )
            .optional()?;
        Ok(max.flatten())
    }

    /// Owner of the sheet holding `row_id`
    pub fn owner_of(&self, conn: &Connection, row_id: &RowId) -> DbResult<Option<UserId>> {
        let owner = conn
            .query_row(
                "SELECT s.user_id FROM \"rows\" r JOIN sheets s ON r.sheet_id = s.id WHERE r.id = ?1",
                params![row_id.to_string()],
                |r| r.get::<_, String>(0),
            )
            .optional()?;
        Ok(owner.map(UserId))
    }

    /// Set the order of one row of `sheet_id`; 0 when the row is elsewhere
    pub fn set_order(
        &self,
        conn: &Connection,
        sheet_id: &SheetId,
        row_id: &RowId,
        order: i64,
        now: DateTime<Utc>,
    ) -> DbResult<usize> {
        Ok(conn.execute(
            "UPDATE \"rows\" SET \"order\" = ?3, updated_at = ?4 WHERE id = ?1 AND sheet_id = ?2",
            params![row_id.to_string(), sheet_id.to_string(), order, now],
        )?)
    }

    /// Delete a row; its cells cascade
    pub fn delete(&self, conn: &Connection, row_id: &RowId) -> DbResult<usize> {
        Ok(conn.execute(
            "DELETE FROM \"rows\" WHERE id = ?1",
            params![row_id.to_string()],
        )?)
    }
}
