//! Identifiers and ordering primitives shared by all sheet types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::constants::{FIRST_ORDER, MAX_ORDER, MIN_ORDER};
use crate::error::{SheetError, SheetResult};

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a fresh random identifier
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            /// Parse an identifier, returning `None` for malformed input
            pub fn parse(s: &str) -> Option<Self> {
                Uuid::parse_str(s).ok().map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Sheet ID
    SheetId
);
uuid_id!(
    /// Field (column) ID
    FieldId
);
uuid_id!(
    /// Row ID
    RowId
);
uuid_id!(
    /// Cell ID
    CellId
);

/// User ID - issued by the external auth provider, opaque text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Requested display position for one field or row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate<Id> {
    pub id: Id,
    pub order: i64,
}

/// Reject orders outside `MIN_ORDER..=MAX_ORDER`
pub fn check_order(order: i64) -> SheetResult<i64> {
    if (MIN_ORDER..=MAX_ORDER).contains(&order) {
        Ok(order)
    } else {
        Err(SheetError::validation(format!(
            "Order must be between {} and {}",
            MIN_ORDER, MAX_ORDER
        )))
    }
}

/// Order for the next appended field or row given the current maximum
pub fn next_order(current_max: Option<i64>) -> SheetResult<i64> {
    match current_max {
        None => Ok(FIRST_ORDER),
        Some(max) => max
            .checked_add(1)
            .filter(|next| *next <= MAX_ORDER)
            .ok_or_else(|| {
                SheetError::validation("Order limit reached, reorder before appending")
            }),
    }
}
