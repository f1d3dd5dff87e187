//! Application state and server configuration

use std::sync::Arc;
use tabula_core::SheetResult;
use tabula_db::{
    CellService, FieldService, IdentityService, RecordService, RowService, SheetDatabase,
    SheetService,
};

use crate::telemetry::LogFormat;

/// API server state
#[derive(Clone)]
pub struct AppState {
    pub sheets: Arc<SheetService>,
    pub fields: Arc<FieldService>,
    pub rows: Arc<RowService>,
    pub cells: Arc<CellService>,
    pub records: Arc<RecordService>,
    /// Session resolution for the auth middleware
    pub identity: Arc<IdentityService>,
    /// Shared database, used by the health check
    pub database: Arc<SheetDatabase>,
    /// API version
    pub version: String,
}

impl AppState {
    /// Create app state over an open database, creating the schema if needed
    pub fn new(database: Arc<SheetDatabase>) -> SheetResult<Self> {
        database.init_schema()?;

        Ok(Self {
            sheets: Arc::new(SheetService::new(database.clone())),
            fields: Arc::new(FieldService::new(database.clone())),
            rows: Arc::new(RowService::new(database.clone())),
            cells: Arc::new(CellService::new(database.clone())),
            records: Arc::new(RecordService::new(database.clone())),
            identity: Arc::new(IdentityService::new(database.clone())),
            database,
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// SQLite file, or `:memory:`
    pub database_path: String,
    pub enable_cors: bool,
    pub log_format: LogFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_path: "tabula.db".to_string(),
            enable_cors: true,
            log_format: LogFormat::Pretty,
        }
    }
}

impl ApiConfig {
    /// Create from environment variables, falling back to defaults for
    /// anything unset or unparsable:
    /// - `TABULA_HOST`, `TABULA_PORT`
    /// - `TABULA_DATABASE`: database path
    /// - `TABULA_CORS`: `true`/`1` or `false`/`0`
    /// - `TABULA_LOG_FORMAT`: `pretty`, `compact` or `json`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("TABULA_HOST").unwrap_or(defaults.host),
            port: lookup("TABULA_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            database_path: lookup("TABULA_DATABASE").unwrap_or(defaults.database_path),
            enable_cors: lookup("TABULA_CORS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(defaults.enable_cors),
            log_format: lookup("TABULA_LOG_FORMAT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.log_format),
        }
    }
}
