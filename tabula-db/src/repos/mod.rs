//! Tabula repository implementations
//!
//! Repositories are stateless; every method takes the connection (or open
//! transaction) to run on, so a service can combine several repository calls
//! inside one `SheetDatabase::write` transaction. Async callers go through
//! `query` and `transact`, which run the same closures on tokio's blocking
//! pool.

mod cell_repo;
mod field_repo;
mod row_repo;
mod sheet_repo;
mod user_repo;

pub use cell_repo::*;
pub use field_repo::*;
pub use row_repo::*;
pub use sheet_repo::*;
pub use user_repo::*;

use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::error::{DbError, DbResult};

/// Path that opens a private in-memory database
pub const MEMORY_PATH: &str = ":memory:";

/// Tabula database - main entry point for storage operations
pub struct SheetDatabase {
    conn: Arc<Mutex<Connection>>,
    pub users: UserRepo,
    pub sessions: SessionRepo,
    pub sheets: SheetRepo,
    pub fields: FieldRepo,
    pub rows: RowRepo,
    pub cells: CellRepo,
}

impl SheetDatabase {
    /// Open a database file, or an in-memory database for `:memory:`
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        let conn = if path.as_os_str() == MEMORY_PATH {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> DbResult<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        // Foreign keys (and with them cascade deletes) are off by default
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            users: UserRepo,
            sessions: SessionRepo,
            sheets: SheetRepo,
            fields: FieldRepo,
            rows: RowRepo,
            cells: CellRepo,
        })
    }

    // A panic inside `read`/`write` drops the open transaction, which rolls
    // it back, so the connection behind a poisoned lock is still consistent.
    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        Ok(self.conn.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Initialize Tabula schema in the database
    pub fn init_schema(&self) -> DbResult<()> {
        let conn = self.lock()?;
        crate::schema::init(&conn)
    }

    /// Check database health
    pub fn health_check(&self) -> DbResult<bool> {
        self.read(select_one)
    }

    /// `health_check` on the blocking pool
    pub async fn ping(self: &Arc<Self>) -> DbResult<bool> {
        self.query(|_, conn| select_one(conn)).await
    }

    /// Run read-only statements on the shared connection
    pub fn read<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<DbError>,
    {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Run statements in an IMMEDIATE transaction. The transaction commits
    /// when `f` returns `Ok` and rolls back otherwise.
    pub fn write<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<DbError>,
    {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(DbError::from)?;
        let out = f(&tx)?;
        tx.commit().map_err(DbError::from)?;
        Ok(out)
    }

    /// `read` on the blocking pool
    pub async fn query<T, E, F>(self: &Arc<Self>, f: F) -> Result<T, E>
    where
        F: FnOnce(&SheetDatabase, &Connection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<DbError> + Send + 'static,
    {
        let database = Arc::clone(self);
        tokio::task::spawn_blocking(move || database.read(|conn| f(&database, conn)))
            .await
            .map_err(|e| DbError::Task(e.to_string()))?
    }

    /// `write` on the blocking pool
    pub async fn transact<T, E, F>(self: &Arc<Self>, f: F) -> Result<T, E>
    where
        F: FnOnce(&SheetDatabase, &Transaction<'_>) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<DbError> + Send + 'static,
    {
        let database = Arc::clone(self);
        tokio::task::spawn_blocking(move || database.write(|tx| f(&database, tx)))
            .await
            .map_err(|e| DbError::Task(e.to_string()))?
    }
}

fn select_one(conn: &Connection) -> DbResult<bool> {
    let one: i64 = conn.query_row("SELECT 1", [], |r| r.get(0))?;
    Ok(one == 1)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::Utc;
    use tabula_core::{Sheet, SheetId, User, UserId};

    pub fn database() -> SheetDatabase {
        let db = SheetDatabase::open_in_memory().unwrap();
        db.init_schema().unwrap();
        db
    }

    pub fn user_record(id: &str) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(id),
            name: id.to_string(),
            email: format!("{}@example.com", id),
            email_verified: false,
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn user(conn: &Connection, id: &str) -> User {
        let user = user_record(id);
        UserRepo.insert(conn, &user).unwrap();
        user
    }

    pub fn sheet(conn: &Connection, owner: &UserId, name: &str) -> Sheet {
        let now = Utc::now();
        let sheet = Sheet {
            id: SheetId::generate(),
            name: name.to_string(),
            description: None,
            user_id: owner.clone(),
            created_at: now,
            updated_at: now,
        };
        SheetRepo.insert(conn, &sheet).unwrap();
        sheet
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use tabula_core::SheetError;

    #[test]
    fn test_health_check() {
        let db = database();
        assert!(db.health_check().unwrap());
    }

    #[test]
    fn test_write_rolls_back_on_error() {
        let db = database();
        let result: Result<(), SheetError> = db.write(|tx| {
            user(tx, "alice");
            Err(SheetError::validation("abort"))
        });
        assert!(result.is_err());

        let users = db
            .read(|conn| db.users.list(conn))
            .unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_panicking_transaction_leaves_database_usable() {
        let db = Arc::new(database());
        let result: Result<(), SheetError> = db
            .transact(|db, tx| {
                db.users.insert(tx, &user_record("alice"))?;
                panic!("statement failed midway");
            })
            .await;
        assert!(matches!(result, Err(SheetError::Storage(_))));

        assert!(db.health_check().unwrap());
        let users = db
            .query(|db, conn| Ok::<_, SheetError>(db.users.list(conn)?))
            .await
            .unwrap();
        assert!(users.is_empty());

        db.transact(|db, tx| Ok::<_, SheetError>(db.users.insert(tx, &user_record("bob"))?))
            .await
            .unwrap();
    }

    #[test]
    fn test_open_memory_path() {
        let db = SheetDatabase::open(MEMORY_PATH).unwrap();
        db.init_schema().unwrap();
        assert!(db.health_check().unwrap());
    }
}
