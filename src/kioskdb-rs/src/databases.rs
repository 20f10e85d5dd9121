use kioskdb_core::config::Databases as DatabaseConfigs;
use kioskdb_core::{Config, DatabaseConfig, KioskModel, Model, UacModel};

use crate::http::HttpClient;
use crate::table::TableService;

/// Table services for both logical databases, sharing one client
#[derive(Clone)]
pub struct Databases {
    client: HttpClient,
    uac: DatabaseConfig,
    kiosk: DatabaseConfig,
}

impl Databases {
    /// Default base paths (`/UAC/api`, `/KIOSK/api`)
    pub fn new(client: HttpClient) -> Self {
        Self::with_configs(client, DatabaseConfigs::default())
    }

    pub fn from_config(client: HttpClient, config: &Config) -> Self {
        Self::with_configs(client, config.databases.clone())
    }

    fn with_configs(client: HttpClient, configs: DatabaseConfigs) -> Self {
        Self {
            client,
            uac: configs.uac,
            kiosk: configs.kiosk,
        }
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Service for a table of the access-control database
    pub fn uac<M: UacModel>(&self) -> TableService<M> {
        TableService::new(self.client.clone(), self.uac.base_url.clone(), M::NAME)
    }

    /// Service for a table of the kiosk database
    pub fn kiosk<M: KioskModel>(&self) -> TableService<M> {
        TableService::new(self.client.clone(), self.kiosk.base_url.clone(), M::NAME)
    }
}

/// `TableService` for a UAC model at the default base path
pub fn uac_db<M: UacModel>(client: &HttpClient) -> TableService<M> {
    Databases::new(client.clone()).uac::<M>()
}

/// `TableService` for a KIOSK model at the default base path
pub fn kiosk_db<M: KioskModel>(client: &HttpClient) -> TableService<M> {
    Databases::new(client.clone()).kiosk::<M>()
}

/// Lower-cased table name a model maps to
pub fn table_name<M: Model>() -> String {
    M::NAME.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use crate::testing::MockTransport;
    use kioskdb_core::{Kiosk, User, UserLevel};
    use serde_json::json;
    use std::sync::Arc;

    fn client() -> (HttpClient, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new());
        let client = HttpClient::with_transport("http://kiosk.local", Session::in_memory(), transport.clone());
        (client, transport)
    }

    #[test]
    fn test_factories_bind_base_and_table() {
        let (client, _) = client();

        let users = uac_db::<User>(&client);
        assert_eq!(users.base_url(), "/UAC/api");
        assert_eq!(users.table_name(), "users");

        let levels = uac_db::<UserLevel>(&client);
        assert_eq!(levels.table_name(), "user_levels");

        let kiosks = kiosk_db::<Kiosk>(&client);
        assert_eq!(kiosks.base_url(), "/KIOSK/api");
        assert_eq!(kiosks.table_name(), table_name::<Kiosk>());
    }

    #[test]
    fn test_configured_base_paths() {
        let (client, _) = client();
        let mut config = Config::default();
        config.databases.kiosk = DatabaseConfig::new("/kiosk-v2/api");

        let databases = Databases::from_config(client, &config);
        assert_eq!(databases.kiosk::<Kiosk>().base_url(), "/kiosk-v2/api");
        assert_eq!(databases.uac::<User>().base_url(), "/UAC/api");
    }

    #[tokio::test]
    async fn test_same_model_yields_equivalent_services() {
        let (client, transport) = client();
        transport.push_json(json!({"success": true, "version": "1"}));
        transport.push_json(json!({"success": true, "version": "1"}));

        kiosk_db::<Kiosk>(&client).list(None).await.unwrap();
        kiosk_db::<Kiosk>(&client).list(None).await.unwrap();

        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(urls[0], urls[1]);
        assert_eq!(urls[0], "http://kiosk.local/KIOSK/api/list/kiosks");
    }
}
