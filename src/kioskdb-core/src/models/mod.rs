//! Record types for the two backend databases.
//!
//! Each record type is also its own model key: implementing [`UacModel`] or
//! [`KioskModel`] is what lets the database factories hand out a service for
//! it, so asking for a table the database does not have is a compile error.

pub mod kiosk;
pub mod uac;

pub use kiosk::{Kiosk, KioskFormData};
pub use uac::{User, UserFormData, UserLevel, UserLevelFormData, UserWithRelations};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A table exposed by the generated backend
pub trait Model: DeserializeOwned + Serialize + Send + Sync + 'static {
    /// Model name as declared; the table name is its lower-cased form
    const NAME: &'static str;

    /// Fields accepted by create/update, without key or audit columns
    type FormData: Serialize + Send + Sync;
}

/// Tables of the user/access-control database
pub trait UacModel: Model {}

/// Tables of the kiosk-management database
pub trait KioskModel: Model {}
