//! List Kiosks Example
//!
//! Logs in against the UAC database, then pages through the kiosk table.
//!
//! Run with:
//! KIOSKDB_API_URL=http://localhost KIOSKDB_USER=admin KIOSKDB_PASSWORD=secret \
//!     cargo run --example list_kiosks

use kioskdb_rs::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::default().with_env_overrides();

    // Session lives only as long as this process
    let client = HttpClient::from_config(&config, Session::in_memory());
    let auth = AuthStore::from_config(client.clone(), &config);

    let username = std::env::var("KIOSKDB_USER").unwrap_or_else(|_| "admin".to_string());
    let password = std::env::var("KIOSKDB_PASSWORD").unwrap_or_default();
    auth.login(&LoginCredentials::new(username, password)).await?;
    println!("✅ Logged in\n");

    let kiosks = kiosk_db::<Kiosk>(&client);
    let mut start = 0;
    loop {
        let params = PaginationParams::page(start, 20).order_by("name", SortOrder::Asc);
        let page = kiosks.list_page(Some(&params)).await?;
        if page.records.is_empty() {
            break;
        }

        for kiosk in &page.records {
            let status = if kiosk.is_active { "active" } else { "inactive" };
            println!("   {:>4}  {} @ {} ({})", kiosk.kiosk_id, kiosk.name, kiosk.location_name, status);
        }

        start += page.records.len() as u64;
        if start >= page.total {
            break;
        }
    }

    let users = uac_db::<User>(&client);
    let active = users
        .search(&PaginationParams::new().filter("is_active", 1))
        .await?;
    println!("\n👤 {} active users", active.len());
    for user in active.iter().take(5) {
        println!("   {}", user.full_name());
    }

    auth.logout().await?;
    Ok(())
}
