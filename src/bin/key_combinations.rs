use anyhow::Result;
use std::env;

use match_stats::config::{ReportConfig, init_logging};
use match_stats::processor::{filter_by_date, key_combinations, load_records};

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let mut config = ReportConfig::load()?;
    init_logging(&config.log_level);
    config.log_source();

    let args: Vec<String> = env::args().skip(1).collect();
    config.apply_args(&args)?;

    let records = filter_by_date(load_records(&config.input_path)?, &config.date_range);
    let combinations = key_combinations(&records);

    println!("=== FIELD COMBINATIONS in {} ===\n", config.input_path.display());
    for (signature, count) in &combinations {
        let share = count * 100 / records.len().max(1);
        println!("{:>6}  {:>3}%  {}", count, share, signature);
    }

    println!("\n=== SUMMARY ===");
    println!("Records: {}", records.len());
    println!("Distinct combinations: {}", combinations.len());

    Ok(())
}
