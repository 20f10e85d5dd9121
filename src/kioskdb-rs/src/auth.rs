use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use kioskdb_core::Config;

use crate::http::HttpClient;
use crate::notify::{Notification, Notifier, TracingNotifier};
use crate::session::Session;
use crate::{ClientError, Result};

/// Field of the login response carrying the session token
const TOKEN_FIELD: &str = "JWT";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Login/logout against the UAC login endpoint.
///
/// The token itself lives in the client's [`Session`]; this store only drives
/// it and tracks whether a login is in progress.
pub struct AuthStore {
    client: HttpClient,
    login_path: String,
    loading: AtomicBool,
    notifier: Arc<dyn Notifier>,
}

/// Clears `loading` however the login attempt ends
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn engage(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl AuthStore {
    pub fn new(client: HttpClient, login_path: impl Into<String>) -> Self {
        Self {
            client,
            login_path: login_path.into(),
            loading: AtomicBool::new(false),
            notifier: Arc::new(TracingNotifier),
        }
    }

    pub fn from_config(client: HttpClient, config: &Config) -> Self {
        Self::new(client, config.login_path.clone())
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn session(&self) -> &Session {
        self.client.session()
    }

    pub fn token(&self) -> Option<String> {
        self.session().token()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Exchange credentials for a token and make it the session's
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<bool> {
        let _loading = LoadingGuard::engage(&self.loading);

        match self.exchange(credentials).await {
            Ok(()) => {
                tracing::info!(username = %credentials.username, "Logged in");
                self.notifier
                    .notify(Notification::positive("Login successful"));
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(username = %credentials.username, "Login failed: {}", e);
                self.notifier.notify(Notification::negative("Login failed"));
                Err(e)
            }
        }
    }

    async fn exchange(&self, credentials: &LoginCredentials) -> Result<()> {
        let request = self.client.request(Method::POST, &self.login_path).form(vec![
            ("username".to_string(), credentials.username.clone()),
            ("password".to_string(), credentials.password.clone()),
        ]);

        let body: Value = self.client.send_json(request).await?;
        let token = body
            .get(TOKEN_FIELD)
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .ok_or(ClientError::LoginFailed)?;

        self.session().set_token(token)
    }

    /// Forget the token locally and in durable storage
    pub async fn logout(&self) -> Result<bool> {
        if let Err(e) = self.session().clear() {
            tracing::error!("Logout error: {}", e);
            return Err(e);
        }

        tracing::info!("Logged out");
        Ok(true)
    }
}
