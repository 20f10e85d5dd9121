use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use std::io::BufRead;
use std::sync::Arc;

use kioskdb_rs::{
    AuthStore, Databases, ExportType, Kiosk, LoginCredentials, Model, Notification,
    NotificationKind, Notifier, PaginationParams, SortOrder, TableService, User, UserLevel,
};

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and persist the session token
    Login {
        username: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the persisted session token
    Logout,

    /// Show whether a session token is present
    Status,

    /// Kiosk records (KIOSK database)
    Kiosks {
        #[command(subcommand)]
        cmd: TableCommands,
    },

    /// User accounts (UAC database)
    Users {
        #[command(subcommand)]
        cmd: TableCommands,
    },

    /// User levels (UAC database)
    UserLevels {
        #[command(subcommand)]
        cmd: TableCommands,
    },
}

#[derive(Subcommand)]
pub enum TableCommands {
    /// List records
    List(ListArgs),

    /// Show one record
    Get { id: i64 },

    /// Create a record from a JSON object on stdin
    Create,

    /// Update a record from a JSON object on stdin
    Update { id: i64 },

    /// Delete one or more records
    Delete {
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Export the table server-side (excel, word, pdf)
    Export {
        format: ExportType,
        #[arg(long)]
        filename: Option<String>,
    },
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(long)]
    start: Option<u64>,
    #[arg(long)]
    limit: Option<u64>,
    #[arg(long)]
    order: Option<String>,
    #[arg(long)]
    desc: bool,
    /// Field filter, `field=value`; repeatable
    #[arg(long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, String)>,
}

impl ListArgs {
    fn params(&self) -> PaginationParams {
        let mut params = PaginationParams {
            start: self.start,
            recperpage: self.limit,
            ..PaginationParams::default()
        };
        if let Some(order) = &self.order {
            let ordertype = if self.desc {
                SortOrder::Desc
            } else {
                SortOrder::Asc
            };
            params = params.order_by(order.clone(), ordertype);
        }
        for (field, value) in &self.filters {
            params = params.filter(field.clone(), value.clone());
        }
        params
    }
}

fn parse_filter(raw: &str) -> Result<(String, String)> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("filter must look like field=value, got '{}'", raw))?;
    Ok((field.trim().to_string(), value.to_string()))
}

/// Prints notifications on stderr
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Positive => eprintln!("✓ {}", notification.message),
            NotificationKind::Negative => eprintln!("✗ {}", notification.message),
        }
    }
}

pub async fn handle(cmd: Commands, auth: AuthStore, databases: Databases) -> Result<()> {
    match cmd {
        Commands::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => read_line().context("reading password from stdin")?,
            };
            let auth = auth.with_notifier(Arc::new(ConsoleNotifier));
            auth.login(&LoginCredentials::new(username, password)).await?;
            print_json(&json!({ "authenticated": true }))
        }
        Commands::Logout => {
            auth.logout().await?;
            print_json(&json!({ "authenticated": false }))
        }
        Commands::Status => print_json(&json!({ "authenticated": auth.is_authenticated() })),
        Commands::Kiosks { cmd } => run_table(databases.kiosk::<Kiosk>(), cmd).await,
        Commands::Users { cmd } => run_table(databases.uac::<User>(), cmd).await,
        Commands::UserLevels { cmd } => run_table(databases.uac::<UserLevel>(), cmd).await,
    }
}

async fn run_table<M: Model>(service: TableService<M>, cmd: TableCommands) -> Result<()> {
    match cmd {
        TableCommands::List(args) => {
            let page = service.list_page(Some(&args.params())).await?;
            print_json(&json!({
                service.table_name(): page.records,
                "totalRecordCount": page.total,
            }))
        }
        TableCommands::Get { id } => match service.get(id).await? {
            Some(record) => print_json(&record),
            None => Err(anyhow!("{} {} not found", service.table_name(), id)),
        },
        TableCommands::Create => {
            let fields = read_object()?;
            print_json(&service.create(&fields).await?)
        }
        TableCommands::Update { id } => {
            let fields = read_object()?;
            print_json(&service.update(id, &fields).await?)
        }
        TableCommands::Delete { ids } => {
            let success = match ids.as_slice() {
                [id] => service.delete(*id).await?,
                _ => service.bulk_delete(&ids).await?,
            };
            print_json(&json!({ "success": success, "deleted": ids }))
        }
        TableCommands::Export { format, filename } => {
            let file_id = service.export(format, filename.as_deref()).await?;
            print_json(&json!({ "fileId": file_id }))
        }
    }
}

fn read_line() -> Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn read_object() -> Result<Value> {
    let value: Value = serde_json::from_reader(std::io::stdin().lock())
        .context("expected a JSON object on stdin")?;
    if !value.is_object() {
        return Err(anyhow!("expected a JSON object on stdin"));
    }
    Ok(value)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
