use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use restyle::messages::EMPTY_CATALOG;
use restyle::{
    encode_file, run_try_on, Cart, Catalog, CatalogQuery, GatewayConfig, ImageFile, SortOption,
    TryOnGateway,
};

/// ReStyle storefront: catalog and virtual try-on
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Try-on configuration file (defaults to the app data directory)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that a photo can be used for try-on
    Validate { path: PathBuf },

    /// Print a photo as a data URL
    Encode { path: PathBuf },

    /// Preview a box's garments on a photo
    TryOn {
        #[arg(long, value_name = "FILE")]
        photo: PathBuf,

        #[arg(long = "box", value_name = "ID")]
        box_id: String,

        /// Write the resulting image here
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Browse the box catalog
    Catalog {
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// popular, price-asc, price-desc or rating
        #[arg(long, default_value = "popular")]
        sort: SortOption,
    },

    /// Add boxes to a cart and show the count
    Cart {
        #[arg(required = true, value_name = "ID")]
        ids: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Validate { path } => {
            let file = ImageFile::from_path(&path).await?;
            let outcome = file.validate();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else if let Some(error) = &outcome.error {
                println!("{}: {}", path.display(), error);
            } else {
                println!(
                    "{}: image valide ({} octets, {})",
                    path.display(),
                    file.size,
                    file.mime_type
                );
            }
            Ok(if outcome.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Command::Encode { path } => {
            let file = ImageFile::from_path(&path).await?;
            file.validate().into_result()?;
            let encoded = encode_file(&file).await?;
            if cli.json {
                println!("{}", json!({ "dataUrl": encoded }));
            } else {
                println!("{}", encoded);
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::TryOn { photo, box_id, out } => {
            let catalog = Catalog::builtin().context("Failed to load catalog")?;
            let selected = catalog
                .find(&box_id)
                .cloned()
                .ok_or_else(|| anyhow!("Unknown box: {}", box_id))?;

            let config = GatewayConfig::load(cli.config.as_deref())?;
            let gateway = Arc::new(TryOnGateway::new(config)?);

            let file = ImageFile::from_path(&photo).await?;
            let result = run_try_on(gateway, &file, selected).await?;

            if let Some(out) = &out {
                let bytes = result
                    .result_image
                    .decode()
                    .context("Result image is not base64 encoded")?;
                tokio::fs::write(out, bytes)
                    .await
                    .with_context(|| format!("Failed to write {}", out.display()))?;
                info!("[try_on] Result written to {:?}", out);
            }

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                let format = result
                    .result_image
                    .format()
                    .and_then(|f| f.extensions_str().first().copied())
                    .unwrap_or("inconnu");
                println!("Essayage terminé pour {} ({:?})", box_id, result.outcome);
                println!("Format du résultat: {}", format);
                if let Some(message) = &result.message {
                    println!("{}", message);
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Catalog {
            search,
            category,
            sort,
        } => {
            let catalog = Catalog::builtin().context("Failed to load catalog")?;
            let query = CatalogQuery {
                search,
                category,
                sort,
            };
            let boxes = catalog.query(&query);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&boxes)?);
                return Ok(ExitCode::SUCCESS);
            }

            println!("{}", Catalog::results_label(boxes.len(), query.search.as_deref()));
            if boxes.is_empty() {
                println!("{}", EMPTY_CATALOG);
            }
            for b in boxes {
                println!(
                    "{:<20} {:<20} [{}] {}€ (-{}%) ★ {} ({} avis)",
                    b.id,
                    b.name,
                    b.category,
                    b.price,
                    b.savings_percent(),
                    b.rating,
                    b.reviews
                );
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Cart { ids } => {
            let catalog = Catalog::builtin().context("Failed to load catalog")?;
            let mut cart = Cart::default();
            let mut messages = Vec::new();
            for id in &ids {
                let b = catalog
                    .find(id)
                    .ok_or_else(|| anyhow!("Unknown box: {}", id))?;
                messages.push(cart.add(b));
            }

            if cli.json {
                println!("{}", json!({ "count": cart.count(), "messages": messages }));
            } else {
                for message in &messages {
                    println!("{}", message);
                }
                println!("Panier: {}", cart.count());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
