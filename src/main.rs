use anyhow::Result;
use std::env;
use tracing::info;

use match_stats::config::{OutputFormat, ReportConfig, init_logging};
use match_stats::processor::{filter_by_date, generate_report, load_records};

fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let mut config = ReportConfig::load()?;
    init_logging(&config.log_level);
    config.log_source();

    let args: Vec<String> = env::args().skip(1).collect();
    config.apply_args(&args)?;

    info!("Analyzing export {}", config.input_path.display());

    let records = load_records(&config.input_path)?;
    let records = filter_by_date(records, &config.date_range);
    let report = generate_report(&records)?;

    match config.format {
        OutputFormat::Text => print!("{}", report),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}
