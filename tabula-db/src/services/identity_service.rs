//! Identity Service Implementation
//!
//! Resolves bearer tokens against the session table. Users and sessions
//! are normally written by the external auth provider; `create_user` and
//! `issue_session` back the operator CLI and tests.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::sync::Arc;
use tabula_core::store::IdentityStore;
use tabula_core::{
    require_name, NewUser, Session, SheetError, SheetResult, User, UserId, SESSION_TOKEN_LEN,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::repos::SheetDatabase;

/// Identity Service
pub struct IdentityService {
    database: Arc<SheetDatabase>,
}

impl IdentityService {
    pub fn new(database: Arc<SheetDatabase>) -> Self {
        Self { database }
    }

    fn generate_token() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_TOKEN_LEN)
            .map(char::from)
            .collect()
    }
}

#[async_trait]
impl IdentityStore for IdentityService {
    async fn resolve_session(&self, token: &str) -> SheetResult<Option<User>> {
        let token = token.to_string();
        self.database
            .query(move |db, conn| {
                let Some(session) = db.sessions.find_by_token(conn, &token)? else {
                    return Ok(None);
                };
                if !session.is_active_at(Utc::now()) {
                    debug!(user_id = %session.user_id, "Session expired");
                    return Ok(None);
                }
                Ok(db.users.get(conn, &session.user_id)?)
            })
            .await
    }

    async fn create_user(&self, input: NewUser) -> SheetResult<User> {
        require_name(&input.name)?;
        if !input.email.contains('@') {
            return Err(SheetError::validation("Invalid email"));
        }

        let user = self
            .database
            .transact(move |db, tx| {
                if db.users.find_by_email(tx, &input.email)?.is_some() {
                    return Err(SheetError::validation(format!(
                        "Email already registered: {}",
                        input.email
                    )));
                }
                let now = Utc::now();
                let user = User {
                    id: UserId::new(Uuid::new_v4().simple().to_string()),
                    name: input.name,
                    email: input.email,
                    email_verified: false,
                    image: None,
                    created_at: now,
                    updated_at: now,
                };
                db.users.insert(tx, &user)?;
                Ok::<_, SheetError>(user)
            })
            .await?;

        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    async fn get_user(&self, user_id: &UserId) -> SheetResult<Option<User>> {
        let user_id = user_id.clone();
        self.database
            .query(move |db, conn| Ok(db.users.get(conn, &user_id)?))
            .await
    }

    async fn find_user_by_email(&self, email: &str) -> SheetResult<Option<User>> {
        let email = email.to_string();
        self.database
            .query(move |db, conn| Ok(db.users.find_by_email(conn, &email)?))
            .await
    }

    async fn list_users(&self) -> SheetResult<Vec<User>> {
        self.database
            .query(|db, conn| Ok(db.users.list(conn)?))
            .await
    }

    async fn issue_session(&self, user_id: &UserId, ttl: Duration) -> SheetResult<Session> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| SheetError::validation("Session lifetime is out of range"))?;

        let owner = user_id.clone();
        let session = self
            .database
            .transact(move |db, tx| {
                if db.users.get(tx, &owner)?.is_none() {
                    return Err(SheetError::not_found("User"));
                }
                let session = Session {
                    id: Uuid::new_v4().simple().to_string(),
                    token: Self::generate_token(),
                    user_id: owner,
                    expires_at,
                    created_at: now,
                    updated_at: now,
                    ip_address: None,
                    user_agent: None,
                };
                db.sessions.insert(tx, &session)?;
                Ok::<_, SheetError>(session)
            })
            .await?;

        info!(user_id = %user_id, expires_at = %session.expires_at, "Session issued");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[tokio::test]
    async fn test_issue_and_resolve_session() {
        let db = database();
        let alice = user(&db, "alice").await;
        let service = IdentityService::new(db);

        let session = service.issue_session(&alice.id, Duration::hours(1)).await.unwrap();
        assert_eq!(session.token.len(), SESSION_TOKEN_LEN);

        let resolved = service.resolve_session(&session.token).await.unwrap();
        assert_eq!(resolved.map(|u| u.id), Some(alice.id));
        assert!(service.resolve_session("bogus").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_does_not_resolve() {
        let db = database();
        let alice = user(&db, "alice").await;
        let service = IdentityService::new(db);

        let session = service
            .issue_session(&alice.id, Duration::seconds(-1))
            .await
            .unwrap();
        assert!(service.resolve_session(&session.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = database();
        user(&db, "alice").await;
        let service = IdentityService::new(db);

        let err = service
            .create_user(NewUser {
                name: "Alice Again".into(),
                email: "alice@example.com".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SheetError::Validation(_)));
        assert_eq!(service.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_session_for_unknown_user() {
        let service = IdentityService::new(database());
        assert!(matches!(
            service
                .issue_session(&UserId::new("ghost"), Duration::hours(1))
                .await,
            Err(SheetError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_session_lifetime_out_of_range() {
        let db = database();
        let alice = user(&db, "alice").await;
        let service = IdentityService::new(db);

        let err = service
            .issue_session(&alice.id, Duration::days(365 * 400_000))
            .await
            .unwrap_err();
        assert!(matches!(err, SheetError::Validation(_)));

        let session = service.issue_session(&alice.id, Duration::hours(1)).await.unwrap();
        assert!(service.resolve_session(&session.token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_find_user_by_email() {
        let db = database();
        let alice = user(&db, "alice").await;
        let service = IdentityService::new(db);

        let found = service.find_user_by_email("alice@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(alice.id.clone()));
        assert!(service.get_user(&alice.id).await.unwrap().is_some());
    }
}
