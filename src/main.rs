use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod config;
mod entity_filter;
mod models;
mod output;
mod patterns;
mod resolver;
mod scraper;
mod server;
mod sources;

use crate::config::{load_config, Config};
use crate::models::{InputError, Result};
use crate::scraper::BatchRunner;
use crate::sources::{ContactSource, SingleUrlSource, SpreadsheetSource};

const USAGE: &str = "Usage:
  contact-scraper url <URL> [output.csv]
  contact-scraper batch <input.csv|input.xlsx> [output.csv]
  contact-scraper serve";

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let config = match load_config("config.yml").await {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load config.yml: {}. Using defaults.", e);
            Config::default()
        }
    };

    // Setup logging
    let directive = format!("contact_scraper={}", config.logging.level)
        .parse()
        .unwrap_or_else(|_| "contact_scraper=info".parse().unwrap());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();

    if let Err(e) = tokio::fs::create_dir_all(&config.output.directory).await {
        eprintln!("Could not create output directory: {e}");
        std::process::exit(1);
    }

    let args: Vec<String> = std::env::args().collect();
    let result = match args.get(1).map(String::as_str) {
        Some("url") if args.len() >= 3 => {
            let out = output_path(&config, args.get(3), "report.csv");
            run_single(&config, &args[2], &out).await
        }
        Some("batch") if args.len() >= 3 => {
            let out = output_path(&config, args.get(3), "results.csv");
            run_batch(&config, Path::new(&args[2]), &out).await
        }
        Some("serve") => serve(config.clone()).await,
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    if let Err(e) = result {
        eprintln!("{e}");
        if e.downcast_ref::<InputError>().is_none() {
            // unexpected failure: keep the full diagnostic for postmortem
            eprintln!("{e:?}");
        }
        std::process::exit(1);
    }
}

fn output_path(config: &Config, arg: Option<&String>, default_name: &str) -> PathBuf {
    match arg {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(&config.output.directory).join(default_name),
    }
}

async fn run_single(config: &Config, url: &str, out: &Path) -> Result<()> {
    let targets = SingleUrlSource::new(url).resolve_targets().await?;
    let records = BatchRunner::new(config.clone()).run(&targets).await?;
    let record = records.first().ok_or("scrape produced no record")?;
    output::write_single_report(out, record)?;
    println!("✅ Done. Results saved to: {}", out.display());
    Ok(())
}

async fn run_batch(config: &Config, input: &Path, out: &Path) -> Result<()> {
    let targets = SpreadsheetSource::new(input).resolve_targets().await?;
    let records = BatchRunner::new(config.clone()).run(&targets).await?;
    output::write_batch_report(out, &records)?;
    println!(
        "\nDone. Scraped {} websites. Results saved to: {}",
        records.len(),
        out.display()
    );
    Ok(())
}

async fn serve(config: Config) -> Result<()> {
    server::build_rocket(config).launch().await?;
    Ok(())
}
