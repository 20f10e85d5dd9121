//! KioskDb Client Library
//!
//! Typed HTTP access to the PHPMaker-generated UAC and KIOSK backends, plus
//! the session/auth store the requests authorize against.

mod auth;
mod databases;
mod http;
mod notify;
mod rest;
mod session;
mod table;
mod transport;

#[cfg(test)]
mod testing;

pub use auth::{AuthStore, LoginCredentials};
pub use databases::{kiosk_db, table_name, uac_db, Databases};
pub use http::{ApiRequest, HttpClient, RequestBody, AUTHORIZATION_HEADER};
pub use kioskdb_core::*;
pub use notify::{Notification, NotificationKind, Notifier, RecordingNotifier, TracingNotifier};
pub use rest::RestService;
pub use session::{FileTokenStore, MemoryTokenStore, Session, TokenStore, TOKEN_KEY};
pub use table::{Page, TableService};
pub use transport::{RawResponse, ReqwestTransport, Transport};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response from server")]
    InvalidResponse,

    #[error("Login failed")]
    LoginFailed,

    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
