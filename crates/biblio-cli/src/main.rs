use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use biblio_client::ReqwestFetcher;
use biblio_core::{CrawlPacing, CrawlService};
use biblio_db::{BookRepository, CategoryRepository, Database, DatabaseConfig};

#[derive(Parser)]
#[command(name = "biblio", version, about = "Catalogue crawler for a fixed book site")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the site's category navigation and store new categories
    CrawlCategories,

    /// Crawl books — one category, or every category when none is given
    Crawl {
        /// Category name (case-sensitive, as shown in the site navigation)
        #[arg(short, long)]
        category: Option<String>,

        /// Pause between categories during a full crawl, in milliseconds
        #[arg(long, env = "BIBLIO_CRAWL_DELAY_MS", default_value_t = 1000)]
        delay_ms: u64,
    },

    /// List stored categories
    Categories,

    /// List stored books
    Books {
        /// Restrict to a single category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Export stored books to a CSV file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Restrict to a single category
        #[arg(short, long)]
        category: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("biblio=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db = connect_db().await?;

    match cli.command {
        Commands::CrawlCategories => cmd_crawl_categories(&db).await?,
        Commands::Crawl { category, delay_ms } => {
            cmd_crawl(&db, category.as_deref(), delay_ms).await?;
        }
        Commands::Categories => cmd_categories(&db).await?,
        Commands::Books { category } => cmd_books(&db, category.as_deref()).await?,
        Commands::Export { output, category } => {
            cmd_export(&db, &output, category.as_deref()).await?;
        }
    }

    Ok(())
}

/// Connect to PostgreSQL using DATABASE_URL and run migrations.
async fn connect_db() -> Result<Database> {
    let config = DatabaseConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
    let db = Database::connect(&config)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await.map_err(|e| anyhow::anyhow!(e))?;
    Ok(db)
}

fn crawl_service(
    db: &Database,
    pacing: CrawlPacing,
) -> Result<CrawlService<ReqwestFetcher, CategoryRepository, BookRepository>> {
    let fetcher = ReqwestFetcher::new().map_err(|e| anyhow::anyhow!(e))?;
    Ok(CrawlService::new(
        fetcher,
        db.category_repo(),
        db.book_repo(),
        pacing,
    ))
}

/// Cancellation token that fires on CTRL+C, aborting a full crawl between
/// categories.
fn interrupt_token() -> CancellationToken {
    let cancel = CancellationToken::new();
    let handle = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing the current category");
            handle.cancel();
        }
    });
    cancel
}

async fn cmd_crawl_categories(db: &Database) -> Result<()> {
    let service = crawl_service(db, CrawlPacing::disabled())?;
    let categories = service
        .crawl_categories()
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    for category in &categories {
        println!("{}", category.name);
    }
    println!("\nTotal: {} categories", categories.len());
    Ok(())
}

async fn cmd_crawl(db: &Database, category: Option<&str>, delay_ms: u64) -> Result<()> {
    let pacing = CrawlPacing::new(Duration::from_millis(delay_ms));
    let service = crawl_service(db, pacing)?;

    let books = match category {
        Some(name) => service
            .crawl_category(name)
            .await
            .map_err(|e| anyhow::anyhow!(e))?,
        None => {
            let cancel = interrupt_token();
            service
                .crawl_all(&cancel)
                .await
                .map_err(|e| anyhow::anyhow!(e))?
        }
    };

    for book in &books {
        println!("{}", book.title);
    }
    println!("\nStored {} new books", books.len());
    Ok(())
}

async fn cmd_categories(db: &Database) -> Result<()> {
    let categories = db
        .category_repo()
        .list()
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    if categories.is_empty() {
        println!("No categories stored. Run `biblio crawl-categories` first.");
        return Ok(());
    }

    for category in &categories {
        println!(
            "{}  (first seen {})",
            category.name,
            category.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    println!("\nTotal: {} categories", categories.len());
    Ok(())
}

async fn cmd_books(db: &Database, category: Option<&str>) -> Result<()> {
    let records = db
        .book_repo()
        .list(category)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    if records.is_empty() {
        println!("No books stored.");
        return Ok(());
    }

    for record in &records {
        let price = record
            .price
            .map(|p| format!("£{p}"))
            .unwrap_or_else(|| "—".to_string());
        println!("[{}] {} — {}", record.category_name, record.title, price);
    }
    println!("\nTotal: {} books", records.len());
    Ok(())
}

async fn cmd_export(db: &Database, output: &PathBuf, category: Option<&str>) -> Result<()> {
    let records = db
        .book_repo()
        .list(category)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    let mut writer = csv::Writer::from_path(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    for record in &records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    println!("Exported {} books to {}", records.len(), output.display());
    Ok(())
}
