//! KioskDb Core Library
//!
//! Shared types for talking to the PHPMaker-generated kiosk backend:
//! - Entity records and their form-data shapes
//! - The response envelope with its table-keyed payload
//! - Pagination and search parameters
//! - Client configuration

pub mod config;
pub mod envelope;
pub mod models;
pub mod params;

// Re-export commonly used types
pub use config::{AuthScheme, Config, DatabaseConfig};
pub use envelope::{Envelope, RestEnvelope};
pub use models::*;
pub use params::{ExportType, PaginationParams, SortOrder};
