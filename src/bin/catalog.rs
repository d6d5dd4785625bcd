#![forbid(unsafe_code)]

use catalog_client::config::LOG_ENV;
use catalog_client::{
    CatalogClient, CatalogError, ClientConfig, ProductId, StockOutcome, TerminalInteraction,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Browse and edit a remote product catalog")]
#[command(
    after_help = "Environment:\n  CATALOG_BACKEND     local | document | hosted\n  CATALOG_URL         Collection endpoint\n  CATALOG_API_KEY     Credential for document/hosted backends\n  CATALOG_STATE_DIR   Preferences directory\n  CATALOG_LOG         Log filter (default: warn)"
)]
struct Cli {
    /// Backend flavour, overriding CATALOG_BACKEND.
    #[arg(long, global = true)]
    backend: Option<String>,
    /// Collection endpoint, overriding CATALOG_URL.
    #[arg(long, global = true)]
    url: Option<String>,
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,
    /// Request timeout in seconds. Requests never time out by default.
    #[arg(long, global = true)]
    timeout: Option<u64>,
    /// Print the whole page (theme, notification, list) instead of just the list.
    #[arg(long, global = true, default_value_t = false)]
    page: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the catalog, optionally filtered.
    List {
        #[arg(long, conflicts_with = "category")]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Create a product.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long)]
        price: String,
        #[arg(long)]
        stock: String,
        #[arg(long, default_value = "")]
        image: String,
    },
    /// Increase a product's stock by one.
    Incr { id: String },
    /// Decrease a product's stock by one.
    Decr { id: String },
    /// Edit name, description, price and category interactively.
    Edit { id: String },
    /// Delete a product after confirmation.
    Delete { id: String },
    /// Show the current theme, or flip it with --toggle.
    Theme {
        #[arg(long, default_value_t = false)]
        toggle: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("catalog: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CatalogError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(raw) = &cli.backend {
        config.backend = raw.parse()?;
    }
    if let Some(url) = cli.url {
        config.base_url = Some(url);
    }
    if let Some(dir) = cli.state_dir {
        config.state_dir = Some(dir);
    }

    let mut builder = CatalogClient::builder().config(config);
    if let Some(secs) = cli.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let mut client = builder.build()?;

    if let Commands::Theme { toggle } = cli.command {
        let theme = if toggle {
            client.toggle_theme()?
        } else {
            client.theme()
        };
        println!("{theme}");
        return Ok(());
    }

    let loaded = client.load();
    if let Err(e) = loaded {
        print_view(&mut client, cli.page);
        return Err(e);
    }

    let outcome = match cli.command {
        Commands::List { search, category } => {
            if let Some(term) = search {
                client.search(&term);
            } else if let Some(category) = category {
                client.filter_category(&category);
            }
            Ok(())
        }
        Commands::Add {
            name,
            description,
            category,
            price,
            stock,
            image,
        } => {
            let form = client.form_mut();
            form.name = name;
            form.description = description;
            form.category = category;
            form.price = price;
            form.stock = stock;
            form.image = image;
            client.create().map(|_| ())
        }
        Commands::Incr { id } => client
            .increase_stock(&ProductId::from(id))
            .map(report_stock),
        Commands::Decr { id } => client
            .decrease_stock(&ProductId::from(id))
            .map(report_stock),
        Commands::Edit { id } => {
            let mut ui = TerminalInteraction::stdio();
            client.edit(&ProductId::from(id), &mut ui).map(|_| ())
        }
        Commands::Delete { id } => {
            let mut ui = TerminalInteraction::stdio();
            client.delete(&ProductId::from(id), &mut ui).map(|_| ())
        }
        Commands::Theme { .. } => Ok(()),
    };

    print_view(&mut client, cli.page);
    outcome
}

fn report_stock(outcome: StockOutcome) {
    if outcome == StockOutcome::Skipped {
        eprintln!("stock is already zero; nothing sent");
    }
}

fn print_view(client: &mut CatalogClient, page: bool) {
    if page {
        print!("{}", client.page_markup(Instant::now()));
    } else {
        print!("{}", client.content());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn search_and_category_are_mutually_exclusive() {
        let err = Cli::try_parse_from(["catalog", "list", "--search", "x", "--category", "y"])
            .err()
            .expect("conflicting filters");
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn list_accepts_a_single_filter() {
        let cli = Cli::try_parse_from(["catalog", "list", "--category", "tools"]).expect("parse");
        match cli.command {
            Commands::List { search, category } => {
                assert_eq!(search, None);
                assert_eq!(category.as_deref(), Some("tools"));
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn global_options_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["catalog", "incr", "7", "--backend", "hosted", "--timeout", "5"])
            .expect("parse");
        assert_eq!(cli.backend.as_deref(), Some("hosted"));
        assert_eq!(cli.timeout, Some(5));
        assert!(matches!(cli.command, Commands::Incr { ref id } if id == "7"));
    }

    #[test]
    fn add_requires_price_and_stock() {
        let err = Cli::try_parse_from(["catalog", "add", "--name", "Widget"])
            .err()
            .expect("missing arguments");
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }
}
