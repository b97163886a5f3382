//! # Seed Reference Data
//!
//! Populates the database with the shipping zones, international rates and
//! sample postal codes a fresh store starts with.
//!
//! ## Usage
//! ```bash
//! # Seed the configured database
//! cargo run -p shiprate-db --bin seed
//!
//! # Specify database path
//! cargo run -p shiprate-db --bin seed -- --db ./data/shiprate.db
//! ```
//!
//! ## Seeded Data
//! - 5 domestic zones (north, south, east, west, central), free above 500.00
//! - One "<Country> Standard" rate for each international destination
//! - Sample postal codes: one per domestic zone, plus known foreign codes
//!
//! Every write is an update-or-insert on the natural key, so running the
//! seed twice leaves the same data behind.

use std::env;
use std::path::PathBuf;

use shiprate_core::{Money, PostalRecord, RateEntry, ZoneEntry};
use shiprate_db::{init_tracing, AppConfig, Database};

/// (zone, cost per kg, delivery estimate, states covered)
const ZONES: &[(&str, i64, &str, &str)] = &[
    (
        "north",
        4000,
        "3-5 business days",
        "Delhi, Punjab, Haryana, Himachal Pradesh, Jammu & Kashmir, Uttarakhand, Chandigarh",
    ),
    (
        "south",
        5000,
        "4-6 business days",
        "Tamil Nadu, Karnataka, Kerala, Andhra Pradesh, Telangana, Puducherry",
    ),
    (
        "east",
        6000,
        "5-7 business days",
        "West Bengal, Odisha, Bihar, Jharkhand, Assam, Sikkim, Northeast states",
    ),
    (
        "west",
        4500,
        "3-5 business days",
        "Maharashtra, Gujarat, Goa, Rajasthan, Dadra & Nagar Haveli, Daman & Diu",
    ),
    (
        "central",
        4500,
        "4-6 business days",
        "Madhya Pradesh, Chhattisgarh, Uttar Pradesh",
    ),
];

/// Free domestic shipping at or above 500.00.
const ZONE_FREE_THRESHOLD_CENTS: i64 = 50_000;

/// (countries, cost per kg, minimum charge)
const INTERNATIONAL_RATES: &[(&[&str], i64, i64)] = &[
    (&["Malaysia"], 25_500, 15_000),
    (&["Singapore"], 29_000, 18_000),
    (&["Sri Lanka"], 79_900, 40_000),
    (&["Maldives"], 34_300, 20_000),
    (&["UAE"], 23_000, 15_000),
    (&["Australia"], 43_600, 25_000),
    (&["New Zealand"], 64_900, 35_000),
    (&["United Kingdom"], 36_500, 22_000),
    (&["Germany"], 53_500, 30_000),
    (&["France", "Monaco"], 56_500, 32_000),
    (&["Austria", "Belgium", "Luxembourg", "Netherlands"], 55_300, 31_000),
    (&["Czech Republic", "Denmark"], 56_300, 31_500),
    (
        &["Hungary", "Italy", "Poland", "Slovak Republic", "Slovenia"],
        57_600,
        32_500,
    ),
    (&["Sweden"], 59_400, 33_500),
    (
        &["Estonia", "Finland", "Croatia", "Lithuania", "Latvia"],
        61_300,
        34_500,
    ),
    (
        &["Bulgaria", "Bosnia", "Greece", "Iceland", "Romania", "Serbia"],
        64_700,
        36_500,
    ),
    (&["Ireland", "Portugal"], 58_400, 33_000),
];

/// (postal code, zone, city, state)
const DOMESTIC_POSTAL_CODES: &[(&str, &str, &str, &str)] = &[
    ("110001", "north", "New Delhi", "Delhi"),
    ("560001", "south", "Bengaluru", "Karnataka"),
    ("700001", "east", "Kolkata", "West Bengal"),
    ("400001", "west", "Mumbai", "Maharashtra"),
    ("452001", "central", "Indore", "Madhya Pradesh"),
];

/// (country, [(postal code, city)])
const INTERNATIONAL_POSTAL_CODES: &[(&str, &[(&str, &str)])] = &[
    (
        "Singapore",
        &[("018956", "Singapore"), ("238859", "Singapore"), ("629418", "Singapore")],
    ),
    (
        "Malaysia",
        &[("50088", "Kuala Lumpur"), ("10250", "Penang"), ("80000", "Johor Bahru")],
    ),
    ("UAE", &[("00000", "Dubai"), ("DXB", "Dubai"), ("AUH", "Abu Dhabi")]),
    (
        "United Kingdom",
        &[("SW1A1AA", "London"), ("EC1A1BB", "London"), ("M11AE", "Manchester")],
    ),
    (
        "United States",
        &[("10001", "New York"), ("90001", "Los Angeles"), ("60601", "Chicago")],
    ),
    (
        "Australia",
        &[("2000", "Sydney"), ("3000", "Melbourne"), ("4000", "Brisbane")],
    ),
    ("Canada", &[("M5H2N2", "Toronto"), ("V6B4Y8", "Vancouver")]),
    ("Germany", &[("10115", "Berlin"), ("80331", "Munich")]),
    ("France", &[("75001", "Paris"), ("13001", "Marseille")]),
    ("Sri Lanka", &[("10100", "Colombo"), ("20000", "Kandy")]),
    ("Maldives", &[("20026", "Malé"), ("08000", "Malé")]),
];

fn zones() -> Vec<ZoneEntry> {
    ZONES
        .iter()
        .map(|(zone, cost, days, states)| {
            ZoneEntry::new(
                *zone,
                Money::from_cents(*cost),
                Money::from_cents(ZONE_FREE_THRESHOLD_CENTS),
            )
            .with_description(*states)
            .with_delivery_days(*days)
        })
        .collect()
}

fn international_rates() -> Vec<RateEntry> {
    INTERNATIONAL_RATES
        .iter()
        .flat_map(|(countries, cost, min)| {
            countries.iter().map(move |country| {
                RateEntry::new(
                    format!("{} Standard", country),
                    *country,
                    Money::from_cents(*cost),
                )
                .with_min_charge(Money::from_cents(*min))
                .with_description(format!("Standard international shipping to {}", country))
            })
        })
        .collect()
}

fn postal_codes(home_country: &str) -> Vec<PostalRecord> {
    let domestic = DOMESTIC_POSTAL_CODES.iter().map(|(code, zone, city, state)| {
        PostalRecord::new(*code, home_country)
            .with_zone(*zone)
            .with_city(*city)
            .with_state(*state)
    });

    let international = INTERNATIONAL_POSTAL_CODES
        .iter()
        .flat_map(|(country, codes)| {
            codes
                .iter()
                .map(move |(code, city)| PostalRecord::new(*code, *country).with_city(*city))
        });

    domestic.chain(international).collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Shiprate Reference Data Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>      Database file path (default: from config)");
                println!("  -c, --config <PATH>  Config file path");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                return Err(format!("unknown argument '{}'", other).into());
            }
        }
        i += 1;
    }

    let mut config = AppConfig::load(config_path)?;
    if let Some(path) = db_path {
        config.database.path = path;
    }

    println!("🌱 Shiprate Seeder");
    println!("==================");
    println!("Database: {}", config.database.path.display());
    println!();

    if let Some(parent) = config.database.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db = Database::new(config.db_config()).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Zones first: postal codes reference them
    let summary = db.zones().bulk_upsert(&zones()).await?;
    println!(
        "✓ Zones:          {} created, {} updated",
        summary.created, summary.updated
    );

    let summary = db.rates().bulk_upsert(&international_rates()).await?;
    println!(
        "✓ Rates:          {} created, {} updated",
        summary.created, summary.updated
    );

    let summary = db
        .postal_codes()
        .bulk_upsert(&postal_codes(&config.shipping.home_country))
        .await?;
    println!(
        "✓ Postal codes:   {} created, {} updated",
        summary.created, summary.updated
    );

    println!();
    println!("Zones:");
    for zone in db.zones().list_all().await? {
        println!(
            "  {:<8} {:>7}/kg  free above {}  ({})",
            zone.zone,
            zone.cost_per_kg().to_string(),
            zone.free_shipping_threshold(),
            zone.delivery_days.as_deref().unwrap_or("-")
        );
    }

    db.close().await;
    println!();
    println!("✓ Seed complete");

    Ok(())
}
