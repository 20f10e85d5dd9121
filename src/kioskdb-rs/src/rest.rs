use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::marker::PhantomData;
use std::sync::Arc;

use kioskdb_core::{PaginationParams, RestEnvelope};

use crate::http::{ApiRequest, HttpClient};
use crate::notify::{Notification, Notifier, TracingNotifier};
use crate::{ClientError, Result};

const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

/// Plain REST resource service (`{endpoint}`, `{endpoint}/{id}`).
///
/// Unlike [`TableService`](crate::TableService), failures are reported to the
/// notifier before being returned to the caller.
pub struct RestService<T> {
    client: HttpClient,
    endpoint: String,
    notifier: Arc<dyn Notifier>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for RestService<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            endpoint: self.endpoint.clone(),
            notifier: self.notifier.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> RestService<T> {
    pub fn new(client: HttpClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            notifier: Arc::new(TracingNotifier),
            _record: PhantomData,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.endpoint, id)
    }

    async fn call<R: DeserializeOwned>(&self, request: Result<ApiRequest>) -> Result<R> {
        let outcome = match request {
            Ok(request) => self.client.send_json(request).await,
            Err(e) => Err(e),
        };
        outcome.map_err(|e| self.report(e))
    }

    /// Surface the failure, then hand it back unchanged
    fn report(&self, error: ClientError) -> ClientError {
        self.notifier
            .notify(Notification::negative(error_message(&error)));
        error
    }

    pub async fn get_all(
        &self,
        params: Option<&PaginationParams>,
    ) -> Result<RestEnvelope<Vec<T>>> {
        let mut request = self.client.request(Method::GET, &self.endpoint);
        if let Some(params) = params {
            request = request.query(params.to_query());
        }
        self.call(Ok(request)).await
    }

    pub async fn get_one(&self, id: impl ToString) -> Result<RestEnvelope<T>> {
        let request = self.client.request(Method::GET, &self.item_path(&id.to_string()));
        self.call(Ok(request)).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, data: &B) -> Result<RestEnvelope<T>> {
        let request = self.client.request(Method::POST, &self.endpoint).json(data);
        self.call(request).await
    }

    pub async fn update<B: Serialize + ?Sized>(
        &self,
        id: impl ToString,
        data: &B,
    ) -> Result<RestEnvelope<T>> {
        let request = self
            .client
            .request(Method::PUT, &self.item_path(&id.to_string()))
            .json(data);
        self.call(request).await
    }

    pub async fn delete(&self, id: impl ToString) -> Result<RestEnvelope<Value>> {
        let request = self
            .client
            .request(Method::DELETE, &self.item_path(&id.to_string()));
        self.call(Ok(request)).await
    }

    pub async fn bulk_delete<I: Serialize>(&self, ids: &[I]) -> Result<RestEnvelope<Value>> {
        let request = self
            .client
            .request(Method::POST, &format!("{}/bulk-delete", self.endpoint))
            .json(&json!({ "ids": ids }));
        self.call(request).await
    }
}

/// The server's `message` when the error body carries one
fn error_message(error: &ClientError) -> String {
    if let ClientError::Server { message, .. } = error {
        if let Ok(body) = serde_json::from_str::<Value>(message) {
            if let Some(text) = body.get("message").and_then(Value::as_str) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }
    DEFAULT_ERROR_MESSAGE.to_string()
}
