//! # Quote
//!
//! Prices one order against the configured database and prints the quote as
//! JSON on stdout.
//!
//! ## Usage
//! ```bash
//! cargo run -p shiprate-db --bin quote -- --country India --postal 110001 \
//!     --total 300.00 --weight 2.0
//! ```
//!
//! Amounts are in major units with up to two decimals, weights in kilograms
//! with up to three.

use std::env;
use std::path::PathBuf;

use shiprate_core::{Money, ShippingRequest, Weight};
use shiprate_db::{init_tracing, AppConfig, Database, ShippingService};

/// Parsed command line.
#[derive(Debug, Default, PartialEq)]
struct QuoteArgs {
    country: String,
    postal: Option<String>,
    total: Option<Money>,
    weight: Option<Weight>,
    db_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    help: bool,
}

impl QuoteArgs {
    fn parse(args: &[String]) -> Result<Self, String> {
        let mut parsed = QuoteArgs::default();

        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            if flag == "--help" || flag == "-h" {
                parsed.help = true;
                return Ok(parsed);
            }

            let value = args
                .get(i + 1)
                .ok_or_else(|| format!("missing value for {}", flag))?;

            match flag {
                "--country" => parsed.country = value.clone(),
                "--postal" => parsed.postal = Some(value.clone()),
                "--total" => {
                    parsed.total = Some(Money::parse(value).map_err(|e| e.to_string())?)
                }
                "--weight" => {
                    parsed.weight = Some(Weight::parse_kg(value).map_err(|e| e.to_string())?)
                }
                "--db" | "-d" => parsed.db_path = Some(PathBuf::from(value)),
                "--config" | "-c" => parsed.config_path = Some(PathBuf::from(value)),
                other => return Err(format!("unknown argument '{}'", other)),
            }
            i += 2;
        }

        Ok(parsed)
    }

    fn request(&self) -> Result<ShippingRequest, String> {
        let total = self.total.ok_or("--total is required")?;
        let weight = self.weight.ok_or("--weight is required")?;

        let request = ShippingRequest::new(total, &self.country, weight);
        Ok(match &self.postal {
            Some(code) => request.with_postal_code(code.clone()),
            None => request,
        })
    }
}

fn print_help() {
    println!("Shiprate Quote");
    println!();
    println!("Usage: quote --total <AMOUNT> --weight <KG> [OPTIONS]");
    println!();
    println!("Options:");
    println!("      --country <NAME>     Declared destination country");
    println!("      --postal <CODE>      Destination postal code");
    println!("      --total <AMOUNT>     Cart total, e.g. 300.00");
    println!("      --weight <KG>        Total weight in kg, e.g. 2.5");
    println!("  -d, --db <PATH>          Database file path (default: from config)");
    println!("  -c, --config <PATH>      Config file path");
    println!("  -h, --help               Show this help message");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let args = QuoteArgs::parse(&args)?;
    if args.help {
        print_help();
        return Ok(());
    }
    let request = args.request()?;

    let mut config = AppConfig::load(args.config_path.clone())?;
    if let Some(path) = &args.db_path {
        config.database.path = path.clone();
    }

    let db = Database::new(config.db_config()).await?;
    let service = ShippingService::new(db.clone(), config.shipping.clone());

    let quote = service.quote(&request).await;
    db.close().await;

    println!("{}", serde_json::to_string_pretty(&quote?)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_full() {
        let parsed = QuoteArgs::parse(&args(&[
            "--country", "India", "--postal", "110001", "--total", "300.00", "--weight", "2.0",
            "--db", "/tmp/x.db",
        ]))
        .unwrap();

        assert_eq!(parsed.country, "India");
        assert_eq!(parsed.postal.as_deref(), Some("110001"));
        assert_eq!(parsed.total, Some(Money::from_cents(30000)));
        assert_eq!(parsed.weight, Some(Weight::from_grams(2000)));
        assert_eq!(parsed.db_path, Some(PathBuf::from("/tmp/x.db")));

        let request = parsed.request().unwrap();
        assert_eq!(request.postal_code(), Some("110001"));
        assert_eq!(request.cart_total_cents, 30000);
    }

    #[test]
    fn test_parse_errors() {
        assert!(QuoteArgs::parse(&args(&["--total"])).is_err());
        assert!(QuoteArgs::parse(&args(&["--total", "abc"])).is_err());
        assert!(QuoteArgs::parse(&args(&["--weight", "1.2345"])).is_err());
        assert!(QuoteArgs::parse(&args(&["--bogus", "1"])).is_err());
    }

    #[test]
    fn test_missing_required_values() {
        let parsed = QuoteArgs::parse(&args(&["--country", "India", "--total", "10"])).unwrap();
        assert!(parsed.request().is_err());
    }

    #[test]
    fn test_help() {
        let parsed = QuoteArgs::parse(&args(&["--country", "India", "-h"])).unwrap();
        assert!(parsed.help);
    }
}
