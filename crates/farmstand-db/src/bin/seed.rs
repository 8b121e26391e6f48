//! # Seed Data Generator
//!
//! Populates the database with a demo farm catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default catalog
//! cargo run -p farmstand-db --bin seed
//!
//! # Only the first N products
//! cargo run -p farmstand-db --bin seed -- --count 5
//!
//! # Specify database path
//! cargo run -p farmstand-db --bin seed -- --db ./data/farmstand.db
//! ```
//!
//! Every product gets a freshly generated UPC-A barcode.

use chrono::Utc;
use farmstand_core::{NewProduct, Product};
use farmstand_db::{Database, DbConfig};
use std::env;

/// Demo catalog: (name, price in cents, stock, description).
const CATALOG: &[(&str, i64, i64, &str)] = &[
    ("Eggs (dozen)", 450, 24, "Free-range, collected daily"),
    ("Raw Honey 12oz", 1200, 10, "Wildflower honey from our hives"),
    ("Heirloom Tomatoes (lb)", 399, 30, ""),
    ("Sourdough Loaf", 800, 8, "Baked this morning"),
    ("Strawberry Jam", 650, 15, "Small batch"),
    ("Honeycrisp Apples (lb)", 250, 60, ""),
    ("Goat Cheese 4oz", 700, 12, "Plain chèvre"),
    ("Sweet Corn (ear)", 75, 100, ""),
    ("Kale Bunch", 300, 20, "Lacinato"),
    ("Maple Syrup 8oz", 1400, 6, "Grade A amber"),
    ("Cut Flower Bouquet", 1500, 5, "Seasonal mix"),
    ("Pickled Beets", 550, 0, "Sold out until next batch"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = CATALOG.len();
    let mut db_path = String::from("./farmstand_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(CATALOG.len());
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Farmstand POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  -c, --count <N>    Number of products to add (default: {})",
                    CATALOG.len()
                );
                println!("  -d, --db <PATH>    Database file path (default: ./farmstand_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Farmstand POS Seed Data Generator");
    println!("====================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Adding products...");

    let mut added = 0;
    for &(name, price_cents, stock, description) in CATALOG.iter().take(count) {
        let product = Product::create(
            NewProduct {
                name: name.to_string(),
                price_cents,
                stock,
                description: description.to_string(),
                barcode: None,
            },
            Utc::now(),
        )?;

        if let Err(e) = db.products().save(&product).await {
            eprintln!("Failed to add {}: {}", product.name, e);
            continue;
        }

        println!("  {}  {}", product.barcode.formatted(), product.name);
        added += 1;
    }

    println!();
    println!("✓ Added {} products", added);

    db.close().await;
    Ok(())
}
