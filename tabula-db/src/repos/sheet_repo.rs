//! Sheet repository

use rusqlite::{params, Connection};
use tabula_core::{Sheet, SheetId, UserId};

use crate::entities::{query_all, query_one};
use crate::error::DbResult;

/// Sheet repository
#[derive(Debug, Clone, Copy, Default)]
pub struct SheetRepo;

impl SheetRepo {
    pub fn insert(&self, conn: &Connection, sheet: &Sheet) -> DbResult<()> {
        conn.execute(
            "INSERT INTO sheets (id, name, description, user_id, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                sheet.id.to_string(),
                sheet.name,
                sheet.description,
                sheet.user_id.as_str(),
                sheet.created_at,
                sheet.updated_at
            ],
        )?;
        Ok(())
    }

    pub fn get(&self, conn: &Connection, sheet_id: &SheetId) -> DbResult<Option<Sheet>> {
        query_one(conn, "WHERE id = ?1", params![sheet_id.to_string()])
    }

    /// Sheets of one owner, oldest first
    pub fn list_by_owner(&self, conn: &Connection, owner: &UserId) -> DbResult<Vec<Sheet>> {
        query_all(
            conn,
            "WHERE user_id = ?1 ORDER BY created_at, rowid",
            params![owner.as_str()],
        )
    }

    /// First sheet of `owner` named `name`. Names are not unique.
    pub fn find_by_name(&self, conn: &Connection, owner: &UserId, name: &str) -> DbResult<Option<Sheet>> {
        query_one(
            conn,
            "WHERE user_id = ?1 AND name = ?2 ORDER BY created_at, rowid",
            params![owner.as_str(), name],
        )
    }

    pub fn update(&self, conn: &Connection, sheet: &Sheet) -> DbResult<usize> {
        Ok(conn.execute(
            "UPDATE sheets SET name = ?2, description = ?3, updated_at = ?4 WHERE id = ?1",
            params![
                sheet.id.to_string(),
                sheet.name,
                sheet.description,
                sheet.updated_at
            ],
        )?)
    }

    /// Delete a sheet; fields, rows and cells cascade
    pub fn delete(&self, conn: &Connection, sheet_id: &SheetId) -> DbResult<usize> {
        Ok(conn.execute(
            "DELETE FROM sheets WHERE id = ?1",
            params![sheet_id.to_string()],
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_list_by_owner_is_scoped() {
        let db = database();
        db.read(|conn| {
            let alice = user(conn, "alice");
            let bob = user(conn, "bob");
            let first = sheet(conn, &alice.id, "first");
            let second = sheet(conn, &alice.id, "second");
            sheet(conn, &bob.id, "other");

            let ids: Vec<_> = db
                .sheets
                .list_by_owner(conn, &alice.id)?
                .into_iter()
                .map(|s| s.id)
                .collect();
            assert_eq!(ids, vec![first.id, second.id]);
            Ok::<_, crate::DbError>(())
        })
        .unwrap();
    }

    #[test]
    fn test_find_by_name_takes_first_match() {
        let db = database();
        db.read(|conn| {
            let alice = user(conn, "alice");
            let bob = user(conn, "bob");
            let first = sheet(conn, &alice.id, "people");
            sheet(conn, &alice.id, "people");
            sheet(conn, &bob.id, "people");

            let found = db.sheets.find_by_name(conn, &alice.id, "people")?.unwrap();
            assert_eq!(found.id, first.id);
            assert!(db.sheets.find_by_name(conn, &alice.id, "nope")?.is_none());
            Ok::<_, crate::DbError>(())
        })
        .unwrap();
    }

    #[test]
    fn test_update_and_delete() {
        let db = database();
        db.read(|conn| {
            let alice = user(conn, "alice");
            let mut s = sheet(conn, &alice.id, "draft");
            s.name = "final".into();
            s.description = Some("done".into());
            assert_eq!(db.sheets.update(conn, &s)?, 1);

            let stored = db.sheets.get(conn, &s.id)?.unwrap();
            assert_eq!(stored.name, "final");
            assert_eq!(stored.description.as_deref(), Some("done"));

            assert_eq!(db.sheets.delete(conn, &s.id)?, 1);
            assert!(db.sheets.get(conn, &s.id)?.is_none());
            Ok::<_, crate::DbError>(())
        })
        .unwrap();
    }
}
