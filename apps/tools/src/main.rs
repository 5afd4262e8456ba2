use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use shared::domain::{CategorySummary, OperationSummary};
use storage::Storage;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/bankit.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    CreateCategory {
        name: String,
    },
    CreateOperation {
        /// Operation date, YYYY-MM-DD.
        date: String,
        label: String,
        #[arg(allow_hyphen_values = true)]
        amount_cents: i64,
    },
    ListCategories,
    ListOperations,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;

    match cli.command {
        Command::CreateCategory { name } => {
            let category_id = storage.create_category(name.trim()).await?;
            println!("created category_id={}", category_id.0);
        }
        Command::CreateOperation {
            date,
            label,
            amount_cents,
        } => {
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .with_context(|| format!("invalid operation date '{date}'"))?;
            let operation_id = storage.insert_operation(date, &label, amount_cents).await?;
            println!("created operation_id={}", operation_id.0);
        }
        Command::ListCategories => {
            let categories: Vec<CategorySummary> = storage
                .list_categories()
                .await?
                .into_iter()
                .map(Into::into)
                .collect();
            println!("{}", serde_json::to_string_pretty(&categories)?);
        }
        Command::ListOperations => {
            let operations: Vec<OperationSummary> = storage
                .list_operations()
                .await?
                .into_iter()
                .map(Into::into)
                .collect();
            println!("{}", serde_json::to_string_pretty(&operations)?);
        }
    }

    Ok(())
}
