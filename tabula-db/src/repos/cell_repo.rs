//! Cell repository

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tabula_core::{Cell, CellId, CellValue, FieldId, RowId, SheetId, UserId};

use crate::entities::{query_all, query_one, to_json_text};
use crate::error::DbResult;

/// Cell repository
#[derive(Debug, Clone, Copy, Default)]
pub struct CellRepo;

impl CellRepo {
    pub fn insert(&self, conn: &Connection, cell: &Cell) -> DbResult<()> {
        self.insert_many(conn, std::slice::from_ref(cell))
    }

    /// Insert several cells with one prepared statement
    pub fn insert_many(&self, conn: &Connection, cells: &[Cell]) -> DbResult<()> {
        if cells.is_empty() {
            return Ok(());
        }
        let mut stmt = conn.prepare_cached(
            "INSERT INTO cells (id, row_id, field_id, value, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for cell in cells {
            stmt.execute(params![
                cell.id.to_string(),
                cell.row_id.to_string(),
                cell.field_id.to_string(),
                to_json_text(cell.value.as_ref())?,
                cell.updated_at
            ])?;
        }
        Ok(())
    }

    pub fn get(&self, conn: &Connection, cell_id: &CellId) -> DbResult<Option<Cell>> {
        query_one(conn, "WHERE id = ?1", params![cell_id.to_string()])
    }

    pub fn list_by_row(&self, conn: &Connection, row_id: &RowId) -> DbResult<Vec<Cell>> {
        query_all(conn, "WHERE row_id = ?1", params![row_id.to_string()])
    }

    /// All cells of all rows of a sheet
    pub fn list_by_sheet(&self, conn: &Connection, sheet_id: &SheetId) -> DbResult<Vec<Cell>> {
        query_all(
            conn,
            "WHERE row_id IN (SELECT id FROM \"rows\" WHERE sheet_id = ?1)",
            params![sheet_id.to_string()],
        )
    }

    pub fn update_value(
        &self,
        conn: &Connection,
        cell_id: &CellId,
        value: Option<&CellValue>,
        now: DateTime<Utc>,
    ) -> DbResult<usize> {
        Ok(conn.execute(
            "UPDATE cells SET value = ?2, updated_at = ?3 WHERE id = ?1",
            params![cell_id.to_string(), to_json_text(value)?, now],
        )?)
    }

    /// Write the value of (row, field), creating the cell if it is absent
    pub fn upsert(
        &self,
        conn: &Connection,
        row_id: &RowId,
        field_id: &FieldId,
        value: Option<&CellValue>,
        now: DateTime<Utc>,
    ) -> DbResult<()> {
        conn.execute(
            "INSERT INTO cells (id, row_id, field_id, value, updated_at) VALUES (?1, ?2, ?3, ?4, ?5) \
             ON CONFLICT (row_id, field_id) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![
                CellId::generate().to_string(),
                row_id.to_string(),
                field_id.to_string(),
                to_json_text(value)?,
                now
            ],
        )?;
        Ok(())
    }

    /// Owner of the sheet holding `cell_id`, through its row
    pub fn owner_of(&self, conn: &Connection, cell_id: &CellId) -> DbResult<Option<UserId>> {
        let owner = conn
            .query_row(
                "SELECT s.user_id FROM cells c \
                 JOIN \"rows\" r ON c.row_id = r.id \
                 JOIN sheets s ON r.sheet_id = s.id \
                 WHERE c.id = ?1",
                params![cell_id.to_string()],
                |r| r.get::<_, String>(0),
            )
            .optional()?;
        Ok(owner.map(UserId))
    }
}
