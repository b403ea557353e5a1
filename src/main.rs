use anyhow::Context;
use clap::Parser;
use land_scout::{AreaCrawlResult, AreaCrawler, ChromeDriver, CrawlConfig};
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Crawl apartment complexes, articles and development plans around a point
#[derive(Debug, Parser)]
#[command(name = "land-scout", version)]
struct Cli {
    /// Center latitude
    #[arg(long, default_value_t = 37.3642443)]
    lat: f64,

    /// Center longitude
    #[arg(long, default_value_t = 127.1084674)]
    lon: f64,

    /// Half-width of the search box in degrees
    #[arg(long, default_value_t = 0.01)]
    radius: f64,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the JSON result
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of complexes to fetch detail and articles for
    #[arg(long)]
    max_complexes: Option<usize>,

    /// Article trade type (A1 sale, B1 jeonse, B2 monthly)
    #[arg(long)]
    trade_type: Option<String>,

    /// Show the browser window during warm-up
    #[arg(long)]
    headful: bool,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<CrawlConfig> {
        let mut config = match &self.config {
            Some(path) => CrawlConfig::from_file(path)?,
            None => CrawlConfig::default(),
        };
        if let Some(max) = self.max_complexes {
            config.max_complexes = max;
        }
        if let Some(trade_type) = &self.trade_type {
            config.trade_type = trade_type.clone();
        }
        if self.headful {
            config.headless = false;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;

    info!("🏠 Land Scout");
    info!("Center ({}, {}), radius {}", cli.lat, cli.lon, cli.radius);

    let driver = ChromeDriver::launch(&config)?;
    let crawler = AreaCrawler::new(driver, config)?;
    let result = crawler
        .crawl_area(cli.lat, cli.lon, cli.radius)
        .await
        .context("Area crawl failed")?;

    print_summary(&result);

    let output = cli.output.clone().unwrap_or_else(|| {
        PathBuf::from(format!("land_data_{}.json", result.crawled_at.timestamp()))
    });
    let json = serde_json::to_string_pretty(&result)?;
    tokio::fs::write(&output, json)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("💾 Saved result to {}", output.display());

    Ok(())
}

fn print_summary(result: &AreaCrawlResult) {
    println!();
    println!("=== Crawl summary ===");
    println!("Complexes:          {}", result.complexes.len());
    println!("Complex details:    {}", result.complex_details.len());
    println!("Articles:           {}", result.total_articles());
    for (plan, plans) in &result.development_plans {
        println!("{:<20}{}", format!("{} plans:", plan), plans.len());
    }
    if result.deadline_exceeded {
        println!("(deadline exceeded, result is partial)");
    }

    if result.complexes.is_empty() {
        println!();
        println!("No complexes found.");
        return;
    }

    println!();
    println!("=== Top complexes ===");
    for (i, complex) in result.complexes.iter().take(3).enumerate() {
        println!("{}. {}", i + 1, field(complex, "complexName"));
        println!("   Type: {}", field(complex, "realEstateTypeName"));
        println!("   Completed: {}", field(complex, "completionYearMonth"));
        println!("   Households: {}", field(complex, "totalHouseholdCount"));
        if let (Some(min), Some(max)) = (
            complex.get("minDealPrice").and_then(Value::as_i64),
            complex.get("maxDealPrice").and_then(Value::as_i64),
        ) {
            println!("   Deal price: {}만원 ~ {}만원", min, max);
        }
        println!();
    }
}

fn field(record: &Value, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "N/A".to_string(),
        Some(other) => other.to_string(),
    }
}
