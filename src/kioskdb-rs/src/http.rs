use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use kioskdb_core::{AuthScheme, Config};

use crate::session::Session;
use crate::transport::{RawResponse, ReqwestTransport, Transport};
use crate::{ClientError, Result};

/// Header the generated backend reads the session token from
pub const AUTHORIZATION_HEADER: &str = "X-Authorization";

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
    /// `multipart/form-data`, one text part per entry, order kept
    Multipart(Vec<(String, String)>),
}

/// A request as it will go on the wire.
///
/// Headers are fixed when the request is built, so a later login or logout
/// never changes a request that already exists.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(fields);
        self
    }

    pub fn multipart(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Multipart(fields);
        self
    }
}

/// Shared HTTP client: API host, session context and transport
#[derive(Clone)]
pub struct HttpClient {
    base_url: String,
    session: Session,
    transport: Arc<dyn Transport>,
    auth_scheme: AuthScheme,
}

impl HttpClient {
    /// Create a client for the given API host using reqwest
    pub fn new(base_url: impl Into<String>, session: Session) -> Self {
        Self::with_transport(base_url, session, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(
        base_url: impl Into<String>,
        session: Session,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            transport,
            auth_scheme: AuthScheme::default(),
        }
    }

    pub fn from_config(config: &Config, session: Session) -> Self {
        Self::new(config.api_url.clone(), session).with_auth_scheme(config.auth_scheme)
    }

    pub fn with_auth_scheme(mut self, auth_scheme: AuthScheme) -> Self {
        self.auth_scheme = auth_scheme;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Build a request for `path`, authorized with the current session token
    pub fn request(&self, method: Method, path: &str) -> ApiRequest {
        let mut request = ApiRequest::new(method, format!("{}{}", self.base_url, path));
        if let Some(token) = self.session.token() {
            request.headers.push((
                AUTHORIZATION_HEADER.to_string(),
                self.auth_scheme.header_value(&token),
            ));
        }
        request
    }

    /// Send a request; any non-2xx status is an error
    pub async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        tracing::debug!(method = %request.method, url = %request.url, "Sending request");

        let response = self.transport.execute(request).await?;

        if !response.is_success() {
            tracing::debug!(status = response.status, "Request failed");
            return Err(ClientError::Server {
                status: response.status,
                message: response.text(),
            });
        }

        Ok(response)
    }

    /// Send a request and decode the JSON body
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.send(request).await?;
        Ok(serde_json::from_slice(&response.body)?)
    }
}
