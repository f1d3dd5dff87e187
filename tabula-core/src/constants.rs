//! Shared constants

/// Key holding the row identifier in a flattened record
pub const RECORD_ID_KEY: &str = "_id";

/// Default session lifetime issued by the operator tooling
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;

/// Length of generated session tokens
pub const SESSION_TOKEN_LEN: usize = 48;

/// Order assigned to the first field or row of a sheet
pub const FIRST_ORDER: i64 = 0;

/// Smallest accepted field or row order
pub const MIN_ORDER: i64 = i32::MIN as i64;

/// Largest accepted field or row order
pub const MAX_ORDER: i64 = i32::MAX as i64;
