//! Command handlers for the CLI

use chrono::Duration;
use std::sync::Arc;
use tabula_core::store::IdentityStore;
use tabula_core::{NewUser, User, UserId};
use tabula_db::{IdentityService, SheetDatabase};

use crate::{SessionCommands, UserCommands};

type CmdResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Open the database and make sure the schema exists
pub fn open_database(path: &str) -> Result<Arc<SheetDatabase>, Box<dyn std::error::Error + Send + Sync>> {
    let database = SheetDatabase::open(path)?;
    database.init_schema()?;
    Ok(Arc::new(database))
}

/// Handle user commands
pub async fn handle_user_command(action: UserCommands, db_path: &str) -> CmdResult {
    let identity = IdentityService::new(open_database(db_path)?);

    match action {
        UserCommands::Create { name, email } => {
            let user = identity.create_user(NewUser { name, email }).await?;

            println!("User created successfully!");
            print_user(&user);
        }

        UserCommands::List { json } => {
            let users = identity.list_users().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&users)?);
            } else if users.is_empty() {
                println!("No users.");
            } else {
                println!("Users ({}):", users.len());
                for user in &users {
                    print_user(user);
                }
            }
        }
    }

    Ok(())
}

/// Handle session commands
pub async fn handle_session_command(action: SessionCommands, db_path: &str) -> CmdResult {
    let identity = IdentityService::new(open_database(db_path)?);

    match action {
        SessionCommands::Issue { user, hours } => {
            if hours <= 0 {
                return Err("Session lifetime must be positive".into());
            }
            let ttl = Duration::try_hours(hours).ok_or("Session lifetime is out of range")?;

            let found = match identity.get_user(&UserId::new(user.as_str())).await? {
                Some(found) => Some(found),
                None => identity.find_user_by_email(&user).await?,
            };
            let found = found.ok_or_else(|| format!("User {} not found", user))?;

            let session = identity
                .issue_session(&found.id, ttl)
                .await?;

            println!("Session issued for {} <{}>", found.name, found.email);
            println!("  Token: {}", session.token);
            println!("  Expires: {}", session.expires_at);
            println!();
            println!("Use it as: Authorization: Bearer {}", session.token);
        }
    }

    Ok(())
}

fn print_user(user: &User) {
    println!("  User ID: {}", user.id);
    println!("    Name: {}", user.name);
    println!("    Email: {}", user.email);
    println!("    Created: {}", user.created_at);
}
