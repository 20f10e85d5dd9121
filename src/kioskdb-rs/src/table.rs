use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;

use kioskdb_core::{Envelope, ExportType, Model, PaginationParams};

use crate::http::{ApiRequest, HttpClient};
use crate::Result;

/// Multi-value field the backend reads bulk-delete keys from
const BULK_KEY_FIELD: &str = "key_m[]";

/// One page of a listing plus the server-side total
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total: u64,
}

/// CRUD access to one table of a PHPMaker-generated API.
///
/// Every response arrives as an [`Envelope`] with the rows stored under the
/// table name, so unwrapping always goes through a lookup by `self.table`.
/// Errors are passed through untouched; a missing payload is an empty result.
pub struct TableService<T> {
    client: HttpClient,
    base_url: String,
    table: String,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for TableService<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            table: self.table.clone(),
            _record: PhantomData,
        }
    }
}

impl<T> fmt::Debug for TableService<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableService")
            .field("base_url", &self.base_url)
            .field("table", &self.table)
            .finish()
    }
}

impl<T: DeserializeOwned> TableService<T> {
    pub fn new(client: HttpClient, base_url: impl Into<String>, table: &str) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            table: table.to_lowercase(),
            _record: PhantomData,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, endpoint: &str) -> ApiRequest {
        self.client
            .request(method, &format!("{}/{}", self.base_url, endpoint))
    }

    async fn fetch(&self, request: ApiRequest) -> Result<Envelope> {
        self.client.send_json(request).await
    }

    fn list_request(&self, params: Option<&PaginationParams>) -> ApiRequest {
        let request = self.request(Method::GET, &format!("list/{}", self.table));
        match params {
            Some(params) => request.query(params.to_query()),
            None => request,
        }
    }

    /// List rows; an envelope without the table key yields no rows
    #[tracing::instrument(skip(self, params), fields(table = %self.table))]
    pub async fn list(&self, params: Option<&PaginationParams>) -> Result<Vec<T>> {
        let mut envelope = self.fetch(self.list_request(params)).await?;
        Ok(envelope.take_list(&self.table)?)
    }

    /// List rows together with `totalRecordCount`
    pub async fn list_page(&self, params: Option<&PaginationParams>) -> Result<Page<T>> {
        let mut envelope = self.fetch(self.list_request(params)).await?;
        let records: Vec<T> = envelope.take_list(&self.table)?;
        let total = envelope
            .total_record_count
            .unwrap_or(records.len() as u64);
        Ok(Page { records, total })
    }

    pub async fn get(&self, id: i64) -> Result<Option<T>> {
        let request = self.request(Method::GET, &format!("view/{}/{}", self.table, id));
        let mut envelope = self.fetch(request).await?;
        Ok(envelope.take(&self.table)?)
    }

    /// Add a row from any subset of the table's form fields
    pub async fn create<B: Serialize + ?Sized>(&self, data: &B) -> Result<Option<T>> {
        let request = self
            .request(Method::POST, &format!("add/{}", self.table))
            .json(data)?;
        let mut envelope = self.fetch(request).await?;
        Ok(envelope.take(&self.table)?)
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: i64, data: &B) -> Result<Option<T>> {
        let request = self
            .request(Method::POST, &format!("edit/{}/{}", self.table, id))
            .json(data)?;
        let mut envelope = self.fetch(request).await?;
        Ok(envelope.take(&self.table)?)
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let request = self.request(Method::GET, &format!("delete/{}/{}", self.table, id));
        Ok(self.fetch(request).await?.success)
    }

    /// Delete several rows in one request; all or nothing per `success`
    #[tracing::instrument(skip(self, ids), fields(table = %self.table, count = ids.len()))]
    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<bool> {
        let fields = ids
            .iter()
            .map(|id| (BULK_KEY_FIELD.to_string(), id.to_string()))
            .collect();
        let request = self
            .request(Method::POST, &format!("delete/{}", self.table))
            .multipart(fields);
        Ok(self.fetch(request).await?.success)
    }

    /// Ask the server to render the table; returns the stored file id
    pub async fn export(
        &self,
        export_type: ExportType,
        filename: Option<&str>,
    ) -> Result<Option<String>> {
        let mut query = Vec::new();
        if let Some(filename) = filename {
            query.push(("filename".to_string(), filename.to_string()));
        }
        query.push(("save".to_string(), "1".to_string()));
        query.push(("output".to_string(), "0".to_string()));

        let request = self
            .request(
                Method::GET,
                &format!("export/{}/{}", export_type.as_str(), self.table),
            )
            .query(query);
        Ok(self.fetch(request).await?.file_id())
    }

    /// Per-field filter query over the list endpoint
    pub async fn search(&self, search: &PaginationParams) -> Result<Vec<T>> {
        self.list(Some(search)).await
    }
}

impl<M: Model> TableService<M> {
    /// Add a row from the model's full form
    pub async fn create_form(&self, form: &M::FormData) -> Result<Option<M>> {
        self.create(form).await
    }

    pub async fn update_form(&self, id: i64, form: &M::FormData) -> Result<Option<M>> {
        self.update(id, form).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{RequestBody, AUTHORIZATION_HEADER};
    use crate::session::Session;
    use crate::testing::MockTransport;
    use crate::transport::RawResponse;
    use crate::ClientError;
    use kioskdb_core::{Kiosk, KioskFormData, SortOrder};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn service<T: DeserializeOwned>(table: &str) -> (TableService<T>, Arc<MockTransport>, Session) {
        let transport = Arc::new(MockTransport::new());
        let session = Session::in_memory();
        let client = HttpClient::with_transport("http://kiosk.local", session.clone(), transport.clone());
        (TableService::new(client, "/KIOSK/api", table), transport, session)
    }

    fn kiosk_json(id: i64, name: &str) -> Value {
        json!({
            "kiosk_id": id,
            "name": name,
            "location_name": "Lobby",
            "address": "1 Main St",
            "latitude": 14.6,
            "longitude": 121.0,
            "marker_id": null,
            "background_image": null,
            "logo_image": null,
            "video": null,
            "assistant_id": null,
            "weather_api_key": null,
            "weather_location_id": null,
            "is_active": true,
            "created_at": "2024-01-01T00:00:00Z",
            "created_by": 1,
            "updated_at": null,
            "updated_by": null,
            "security_code": null
        })
    }

    #[test]
    fn test_table_name_is_lowercased() {
        let (svc, _, _) = service::<Value>("Kiosks");
        assert_eq!(svc.table_name(), "kiosks");
    }

    #[tokio::test]
    async fn test_list_unwraps_table_key() {
        let (svc, transport, _) = service::<Value>("kiosks");
        transport.push_json(json!({
            "success": true,
            "version": "1",
            "kiosks": [{"kiosk_id": 7, "name": "A"}]
        }));

        let rows = svc.list(None).await.unwrap();
        assert_eq!(rows, vec![json!({"kiosk_id": 7, "name": "A"})]);

        let request = transport.last_request();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url, "http://kiosk.local/KIOSK/api/list/kiosks");
        assert!(request.query.is_empty());
    }

    #[tokio::test]
    async fn test_list_without_table_key_is_empty() {
        let (svc, transport, _) = service::<Value>("kiosks");
        transport.push_json(json!({"success": true, "version": "1"}));

        let rows = svc.list(None).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_list_sends_params() {
        let (svc, transport, _) = service::<Value>("kiosks");
        transport.push_json(json!({"success": true, "version": "1", "kiosks": []}));

        let params = PaginationParams::page(0, 25).order_by("name", SortOrder::Asc);
        svc.list(Some(&params)).await.unwrap();

        let query = transport.last_request().query;
        assert!(query.contains(&("recperpage".to_string(), "25".to_string())));
        assert!(query.contains(&("ordertype".to_string(), "ASC".to_string())));
    }

    #[tokio::test]
    async fn test_list_page_total() {
        let (svc, transport, _) = service::<Value>("kiosks");
        transport.push_json(json!({
            "success": true,
            "version": "1",
            "totalRecordCount": 40,
            "kiosks": [{"kiosk_id": 1}]
        }));

        let page = svc.list_page(Some(&PaginationParams::page(0, 1))).await.unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.total, 40);
    }

    #[tokio::test]
    async fn test_search_uses_list_endpoint() {
        let (svc, transport, _) = service::<Value>("kiosks");
        transport.push_json(json!({"success": true, "version": "1", "kiosks": [{"kiosk_id": 2}]}));

        let filters = PaginationParams::new().filter("location_name", "Lobby");
        let rows = svc.search(&filters).await.unwrap();

        assert_eq!(rows.len(), 1);
        let request = transport.last_request();
        assert_eq!(request.url, "http://kiosk.local/KIOSK/api/list/kiosks");
        assert_eq!(
            request.query,
            vec![("location_name".to_string(), "Lobby".to_string())]
        );
    }

    #[tokio::test]
    async fn test_create_then_get_returns_same_identity() {
        let (svc, transport, _) = service::<Kiosk>("kiosks");
        transport.push_json(json!({"success": true, "version": "1", "kiosks": kiosk_json(12, "New")}));
        transport.push_json(json!({"success": true, "version": "1", "kiosks": kiosk_json(12, "New")}));

        let created = svc
            .create(&json!({"name": "New", "location_name": "Lobby"}))
            .await
            .unwrap()
            .unwrap();
        let fetched = svc.get(created.kiosk_id).await.unwrap().unwrap();
        assert_eq!(fetched.kiosk_id, 12);

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].url, "http://kiosk.local/KIOSK/api/add/kiosks");
        assert_eq!(
            requests[0].body,
            RequestBody::Json(json!({"name": "New", "location_name": "Lobby"}))
        );
        assert_eq!(requests[1].url, "http://kiosk.local/KIOSK/api/view/kiosks/12");
    }

    #[tokio::test]
    async fn test_form_round_trip_posts_without_key_columns() {
        let (svc, transport, _) = service::<Kiosk>("kiosks");
        transport.push_json(json!({"success": true, "version": "1", "kiosks": kiosk_json(12, "New")}));
        transport.push_json(json!({"success": true, "version": "1", "kiosks": kiosk_json(12, "Renamed")}));

        let existing: Kiosk = serde_json::from_value(kiosk_json(12, "New")).unwrap();
        let mut form = KioskFormData::from(&existing);
        let created = svc.create_form(&form).await.unwrap().unwrap();
        assert_eq!(created.kiosk_id, 12);

        form.name = "Renamed".to_string();
        let updated = svc.update_form(12, &form).await.unwrap().unwrap();
        assert_eq!(updated.name, "Renamed");

        let requests = transport.requests();
        assert_eq!(requests[0].url, "http://kiosk.local/KIOSK/api/add/kiosks");
        assert_eq!(requests[1].url, "http://kiosk.local/KIOSK/api/edit/kiosks/12");
        match &requests[1].body {
            RequestBody::Json(body) => {
                assert_eq!(body["name"], "Renamed");
                assert!(body.get("kiosk_id").is_none());
                assert!(body.get("created_at").is_none());
            }
            other => panic!("expected JSON body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let (svc, transport, _) = service::<Kiosk>("kiosks");
        transport.push_json(json!({"success": false, "version": "1", "failureMessage": "Not found"}));

        assert!(svc.get(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_posts_to_edit() {
        let (svc, transport, _) = service::<Value>("kiosks");
        transport.push_json(json!({"success": true, "version": "1", "kiosks": {"kiosk_id": 5, "name": "B"}}));

        let updated = svc.update(5, &json!({"name": "B"})).await.unwrap();
        assert_eq!(updated, Some(json!({"kiosk_id": 5, "name": "B"})));

        let request = transport.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "http://kiosk.local/KIOSK/api/edit/kiosks/5");
    }

    #[tokio::test]
    async fn test_delete_returns_success_flag() {
        let (svc, transport, _) = service::<Value>("kiosks");
        transport.push_json(json!({"success": true, "version": "1"}));
        transport.push_json(json!({"success": false, "version": "1"}));

        assert!(svc.delete(3).await.unwrap());
        assert!(!svc.delete(4).await.unwrap());

        let request = transport.last_request();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url, "http://kiosk.local/KIOSK/api/delete/kiosks/4");
    }

    #[tokio::test]
    async fn test_bulk_delete_one_field_per_id_in_order() {
        let cases: [Vec<i64>; 3] = [vec![], vec![9], vec![3, 1, 2]];
        for ids in cases {
            let (svc, transport, _) = service::<Value>("kiosks");
            transport.push_json(json!({"success": true, "version": "1"}));

            assert!(svc.bulk_delete(&ids).await.unwrap());

            let request = transport.last_request();
            assert_eq!(request.method, Method::POST);
            assert_eq!(request.url, "http://kiosk.local/KIOSK/api/delete/kiosks");
            let expected: Vec<(String, String)> = ids
                .iter()
                .map(|id| ("key_m[]".to_string(), id.to_string()))
                .collect();
            assert_eq!(request.body, RequestBody::Multipart(expected));
        }
    }

    #[tokio::test]
    async fn test_export() {
        let (svc, transport, _) = service::<Value>("kiosks");
        transport.push_json(json!({"success": true, "version": "1", "fileId": "f-81"}));

        let file_id = svc.export(ExportType::Pdf, Some("report")).await.unwrap();
        assert_eq!(file_id.as_deref(), Some("f-81"));

        let request = transport.last_request();
        assert_eq!(request.url, "http://kiosk.local/KIOSK/api/export/pdf/kiosks");
        assert_eq!(
            request.query,
            vec![
                ("filename".to_string(), "report".to_string()),
                ("save".to_string(), "1".to_string()),
                ("output".to_string(), "0".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_export_without_file_id() {
        let (svc, transport, _) = service::<Value>("kiosks");
        transport.push_json(json!({"success": true, "version": "1"}));

        assert!(svc.export(ExportType::Excel, None).await.unwrap().is_none());
        let query = transport.last_request().query;
        assert!(!query.iter().any(|(k, _)| k == "filename"));
    }

    #[tokio::test]
    async fn test_errors_propagate_unchanged() {
        let (svc, transport, _) = service::<Value>("kiosks");
        transport.push_response(RawResponse::new(401, "Unauthorized"));
        transport.push_error("connection refused");

        match svc.list(None).await.unwrap_err() {
            ClientError::Server { status, .. } => assert_eq!(status, 401),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            svc.get(1).await.unwrap_err(),
            ClientError::Transport(_)
        ));
    }

    #[tokio::test]
    async fn test_requests_carry_session_token() {
        let (svc, transport, session) = service::<Value>("kiosks");
        transport.push_json(json!({"success": true, "version": "1"}));
        transport.push_json(json!({"success": true, "version": "1"}));

        session.set_token("jwt-xyz").unwrap();
        svc.list(None).await.unwrap();
        assert_eq!(
            transport.last_request().header(AUTHORIZATION_HEADER),
            Some("jwt-xyz")
        );

        session.clear().unwrap();
        svc.list(None).await.unwrap();
        assert!(transport.last_request().header(AUTHORIZATION_HEADER).is_none());
    }
}
