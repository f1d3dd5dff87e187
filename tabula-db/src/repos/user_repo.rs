//! User and session repositories

use rusqlite::{params, Connection};
use tabula_core::{Session, User, UserId};

use crate::entities::{query_all, query_one};
use crate::error::DbResult;

/// User repository
#[derive(Debug, Clone, Copy, Default)]
pub struct UserRepo;

impl UserRepo {
    pub fn insert(&self, conn: &Connection, user: &User) -> DbResult<()> {
        conn.execute(
            "INSERT INTO \"user\" (id, name, email, email_verified, image, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user.id.as_str(),
                user.name,
                user.email,
                user.email_verified,
                user.image,
                user.created_at,
                user.updated_at
            ],
        )?;
        Ok(())
    }

    pub fn get(&self, conn: &Connection, user_id: &UserId) -> DbResult<Option<User>> {
        query_one(conn, "WHERE id = ?1", params![user_id.as_str()])
    }

    pub fn find_by_email(&self, conn: &Connection, email: &str) -> DbResult<Option<User>> {
        query_one(conn, "WHERE email = ?1", params![email])
    }

    pub fn list(&self, conn: &Connection) -> DbResult<Vec<User>> {
        query_all(conn, "ORDER BY created_at, rowid", [])
    }
}

/// Session repository
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionRepo;

impl SessionRepo {
    pub fn insert(&self, conn: &Connection, session: &Session) -> DbResult<()> {
        conn.execute(
            "INSERT INTO session (id, token, user_id, expires_at, created_at, updated_at, ip_address, user_agent) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                session.id,
                session.token,
                session.user_id.as_str(),
                session.expires_at,
                session.created_at,
                session.updated_at,
                session.ip_address,
                session.user_agent
            ],
        )?;
        Ok(())
    }

    pub fn find_by_token(&self, conn: &Connection, token: &str) -> DbResult<Option<Session>> {
        query_one(conn, "WHERE token = ?1", params![token])
    }
}
