use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{
    CategoryUpdateClient, ClientOptions, HttpCategoryTransport, UiEffect, UiNotifier,
};
use tracing::{error, info};

#[derive(Parser, Debug)]
struct Args {
    /// Context URL the application is mounted under, e.g. http://localhost:8080/bankit
    #[arg(long, default_value = "http://127.0.0.1:8080/")]
    url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Change the category of an operation as its selection control would.
    SetCategory {
        /// Element id of the selection control, `cat_<operation id>`.
        #[arg(long)]
        control: String,
        /// Selected category id, `-1` for none.
        #[arg(long, allow_hyphen_values = true)]
        value: String,
        /// Ignore responses superseded by a newer request for the same control.
        #[arg(long)]
        discard_stale: bool,
    },
}

/// Reports UI effects on the terminal.
struct TerminalNotifier;

impl UiNotifier for TerminalNotifier {
    fn set_loading(&self, loading: bool) {
        info!(loading, "loading indicator");
    }

    fn show_confirm(&self, message: &str) {
        println!("{message}");
    }

    fn show_error(&self, message: &str) {
        eprintln!("{message}");
    }

    fn reload_view(&self) {
        info!("view reload requested");
    }

    fn reset_selection(&self, control_id: &str) {
        info!(control_id, "selection reset to first option");
    }
}

/// A rejected update fails the command so the exit status reflects it.
fn ensure_applied(effect: UiEffect) -> Result<()> {
    if let UiEffect::Rejected { message } = effect {
        error!(%message, "category update rejected");
        bail!("category update rejected: {message}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    match args.command {
        Command::SetCategory {
            control,
            value,
            discard_stale,
        } => {
            let transport = HttpCategoryTransport::new(&args.url)?;
            info!(endpoint = %transport.endpoint(), "using update endpoint");
            let client = CategoryUpdateClient::with_options(
                transport,
                ClientOptions {
                    discard_stale_responses: discard_stale,
                },
            );
            let effect = client
                .on_category_change(&control, &value, &TerminalNotifier)
                .await?;
            ensure_applied(effect)?;
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
