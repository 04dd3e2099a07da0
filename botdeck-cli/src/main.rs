use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

use botdeck_common::models::session::SessionScope;
use botdeck_core::auth::{HttpAuthApi, LoginFlow};
use botdeck_core::config::BotdeckConfig;
use botdeck_core::notion::{BatchExporter, NotionClient};
use botdeck_core::repositories::postgres::PostgresAnalyticsRepository;
use botdeck_core::services::AnalyticsService;
use botdeck_core::session::{FileSessionStore, SessionContext};
use botdeck_core::{Database, Error};

#[derive(Parser, Debug)]
#[command(name = "botdeck")]
#[command(author, version, about = "botdeck - admin tooling for the botdeck chatbot platform")]
struct Args {
    /// Operate on the admin session instead of the customer session
    #[arg(long, default_value = "false")]
    admin: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session token
    Login {
        email: String,
        password: String,
        /// Keep the session for 30 days
        #[arg(long, default_value = "false")]
        remember: bool,
    },
    /// Drop the stored session
    Logout,
    /// Check what Notion workspace the integration is connected to
    Validate,
    /// List the reachable Notion databases
    Databases,
    /// Show one Notion database
    Database { id: String },
    /// Query a Notion database, optionally with a JSON filter
    Query {
        database: String,
        #[arg(long)]
        filter: Option<String>,
    },
    /// Export a JSON array of records as pages of a Notion database
    Export {
        database: String,
        /// Path to a JSON file holding an array of property objects
        file: std::path::PathBuf,
    },
    /// Apply database migrations
    Migrate,
    /// Summarize a chatbot's analytics over a date range
    Report {
        chatbot: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    },
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("botdeck=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();
    let config = BotdeckConfig::from_env();

    let scope = if args.admin {
        SessionScope::Admin
    } else {
        SessionScope::Customer
    };
    let store = Arc::new(FileSessionStore::new(&config.session_file));
    let session = Arc::new(SessionContext::new(scope, store));

    if let Err(e) = run(args.command, &config, session).await {
        error!("{}", e.user_message());
        std::process::exit(1);
    }
    Ok(())
}

async fn run(
    command: Command,
    config: &BotdeckConfig,
    session: Arc<SessionContext>,
) -> Result<(), Error> {
    match command {
        Command::Login { email, password, remember } => {
            let api = Arc::new(HttpAuthApi::new(&config.api_base)?);
            let mut flow = LoginFlow::new(api, session.clone());
            flow.submit(&email, &password, remember).await?;
            if let Some(profile) = session.cached_profile().await? {
                println!("Signed in as {} <{}>", profile.display_name, profile.email);
            }
            Ok(())
        }
        Command::Logout => {
            session.clear().await?;
            println!("Signed out.");
            Ok(())
        }
        Command::Validate => {
            let client = NotionClient::new(&config.api_base, session)?;
            let summary = client.validate().await?;
            println!(
                "Connected to workspace '{}' ({} database(s))",
                summary.workspace_name, summary.database_count
            );
            Ok(())
        }
        Command::Databases => {
            let client = NotionClient::new(&config.api_base, session)?;
            let databases = client.list_databases().await?;
            for db in &databases {
                println!("{}  {}", db.id, db.title);
            }
            info!("{} database(s)", databases.len());
            Ok(())
        }
        Command::Database { id } => {
            let client = NotionClient::new(&config.api_base, session)?;
            let db = client.get_database(&id).await?;
            println!("{}  {}", db.id, db.title);
            if let Some(edited) = db.last_edited_time {
                println!("last edited: {edited}");
            }
            Ok(())
        }
        Command::Query { database, filter } => {
            let filter = filter
                .as_deref()
                .map(serde_json::from_str)
                .transpose()?;
            let client = NotionClient::new(&config.api_base, session)?;
            let batch = client.query_database(&database, filter).await?;
            for page in &batch.pages {
                println!("{}", page.id);
            }
            println!("{} of {} page(s)", batch.pages.len(), batch.count);
            Ok(())
        }
        Command::Export { database, file } => {
            let raw = std::fs::read_to_string(&file)?;
            let records: Vec<serde_json::Value> = serde_json::from_str(&raw)?;
            let client = Arc::new(NotionClient::new(&config.api_base, session)?);
            let exporter = BatchExporter::new(client, database);
            let outcome = exporter.export_all(&records, |record| record.clone()).await?;
            println!("Exported {} record(s).", outcome.count);
            Ok(())
        }
        Command::Migrate => {
            let db = connect(config).await?;
            db.migrate().await?;
            println!("Migrations applied.");
            Ok(())
        }
        Command::Report { chatbot, from, to } => {
            let db = connect(config).await?;
            let repo = Arc::new(PostgresAnalyticsRepository::new(db.pool().clone()));
            let service = AnalyticsService::new(repo);
            let summary = service.range_summary(chatbot, from, to).await?;
            println!("{from} .. {to}: {} active day(s)", summary.active_days);
            println!("conversations: {}", summary.total_conversations);
            println!("messages:      {}", summary.total_messages);
            println!("fallback rate: {:.3}", summary.avg_fallback_rate);
            println!("satisfaction:  {:.2}", summary.avg_satisfaction_score);
            for intent in &summary.top_intents {
                println!("  {:<24} {}", intent.label, intent.count);
            }
            Ok(())
        }
    }
}

async fn connect(config: &BotdeckConfig) -> Result<Database, Error> {
    let url = config.database_url.as_deref().ok_or_else(|| {
        Error::Validation("BOTDECK_DATABASE_URL is not set".to_string())
    })?;
    Database::new(url).await
}
