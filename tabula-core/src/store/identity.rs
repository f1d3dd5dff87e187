//! Caller identity
//!
//! Sessions are issued by the external auth provider; Tabula resolves them.
//! `create_user` and `issue_session` exist for operator tooling and tests.

use async_trait::async_trait;
use chrono::Duration;

use crate::error::SheetResult;
use crate::types::{NewUser, Session, User, UserId};

#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// User behind an unexpired session token, `None` otherwise
    async fn resolve_session(&self, token: &str) -> SheetResult<Option<User>>;

    async fn create_user(&self, input: NewUser) -> SheetResult<User>;

    async fn get_user(&self, user_id: &UserId) -> SheetResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> SheetResult<Option<User>>;

    async fn list_users(&self) -> SheetResult<Vec<User>>;

    /// Issue a new session for an existing user. `NotFound` for unknown users.
    async fn issue_session(&self, user_id: &UserId, ttl: Duration) -> SheetResult<Session>;
}
