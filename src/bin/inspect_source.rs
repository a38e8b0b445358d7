use anyhow::Result;
use reqwest::Client;
use std::{env, path::PathBuf, process::exit};
use vaxdash::{config::Config, load_dataset, logging, LoadError};

#[tokio::main]
async fn main() {
    logging::init();

    // Optional single argument: a CSV to inspect instead of the configured sample.
    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [CSV_FILE]", args[0]);
        exit(1);
    }

    if let Err(e) = inspect(args.get(1).map(PathBuf::from)).await {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

/// Run acquisition + normalization exactly as the dashboard does and print a summary.
async fn inspect(local_override: Option<PathBuf>) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(path) = local_override {
        config.local_sample = path;
    }

    let mut builder = Client::builder();
    if let Some(timeout) = config.request_timeout() {
        builder = builder.timeout(timeout);
    }
    let client = builder.build()?;

    let normalized = match load_dataset(&config, &client).await {
        Ok(n) => n,
        Err(LoadError::Acquisition(e)) => {
            println!("=== Acquisition failed ===");
            for (i, attempt) in e.attempts().iter().enumerate() {
                println!("{:>2}. {}", i + 1, attempt);
            }
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    let table = &normalized.table;
    let regions = table.regions();

    println!("=== Dataset ===");
    println!("Records kept:    {}", table.len());
    println!("Rows dropped:    {}", normalized.dropped);
    match table.date_span() {
        Some((first, last)) => println!("Date span:       {} .. {}", first, last),
        None => println!("Date span:       <empty>"),
    }
    println!("Regions ({}):    {}", regions.len(), regions.join(", "));
    println!();

    println!("=== Per region ===");
    for region in &regions {
        let rows = table.filter_region(region);
        let mut counties: Vec<&str> = rows.iter().map(|r| r.subregion.as_str()).collect();
        counties.sort_unstable();
        counties.dedup();
        println!(
            "- {:<6} | records: {:>8} | subregions: {:>5}",
            region,
            rows.len(),
            counties.len()
        );
    }

    Ok(())
}
