//! # Command Parsing
//!
//! Turns one line of operator input into a [`Command`].
//!
//! Arguments are whitespace-separated; double quotes group words, so
//! `new "Raw Honey" 12.00 10` is a four-word command. Prices are decimal
//! amounts (`2.50`, `$3`) parsed straight to cents.

use crate::error::ApiError;
use farmstand_core::{Money, NewProduct};

const MAX_BARCODE_BATCH: usize = 100;

/// A parsed register command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Lists the catalog, optionally only names containing `filter`.
    Products { filter: Option<String> },
    Product { id: String },
    NewProduct(NewProduct),
    Price { id: String, price_cents: i64 },
    Stock { id: String, stock: i64 },
    Delete { id: String },
    Scan { code: String },
    Check { code: String },
    Barcode { count: usize },
    Add { id: String, qty: Option<i64> },
    Qty { id: String, qty: i64 },
    Remove { id: String },
    Cart,
    Clear,
    Checkout,
    Sales,
    Help,
    Quit,
}

/// Parses a line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, ApiError> {
    let tokens = tokenize(line)?;
    let Some((name, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "products" | "ls" => Command::Products {
            filter: (!args.is_empty()).then(|| args.join(" ")),
        },
        "find" | "search" => {
            arg(args, 0, "search term")?;
            Command::Products {
                filter: Some(args.join(" ")),
            }
        }
        "product" | "show" => Command::Product {
            id: arg(args, 0, "product id")?,
        },
        "new" => {
            let name = arg(args, 0, "name")?;
            let price = Money::parse(&arg(args, 1, "price")?)?;
            let stock = int(&arg(args, 2, "stock")?, "stock")?;
            Command::NewProduct(NewProduct {
                name,
                price_cents: price.cents(),
                stock,
                description: args.get(3..).map(|rest| rest.join(" ")).unwrap_or_default(),
                barcode: None,
            })
        }
        "price" => Command::Price {
            id: arg(args, 0, "product id")?,
            price_cents: Money::parse(&arg(args, 1, "price")?)?.cents(),
        },
        "stock" => Command::Stock {
            id: arg(args, 0, "product id")?,
            stock: int(&arg(args, 1, "stock")?, "stock")?,
        },
        "delete" | "rm" => Command::Delete {
            id: arg(args, 0, "product id")?,
        },
        "scan" => Command::Scan {
            code: code_arg(args)?,
        },
        "check" => Command::Check {
            code: code_arg(args)?,
        },
        "barcode" => {
            let count = match args.first() {
                Some(n) => int(n, "count")?,
                None => 1,
            };
            if !(1..=MAX_BARCODE_BATCH as i64).contains(&count) {
                return Err(ApiError::validation(format!(
                    "count must be between 1 and {}",
                    MAX_BARCODE_BATCH
                )));
            }
            Command::Barcode {
                count: count as usize,
            }
        }
        "add" => Command::Add {
            id: arg(args, 0, "product id")?,
            qty: args.get(1).map(|q| int(q, "quantity")).transpose()?,
        },
        "qty" => Command::Qty {
            id: arg(args, 0, "product id")?,
            qty: int(&arg(args, 1, "quantity")?, "quantity")?,
        },
        "remove" => Command::Remove {
            id: arg(args, 0, "product id")?,
        },
        "cart" => Command::Cart,
        "clear" => Command::Clear,
        "checkout" | "pay" => Command::Checkout,
        "sales" => Command::Sales,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => {
            return Err(ApiError::validation(format!(
                "Unknown command '{}'. Type 'help' for a list",
                other
            )))
        }
    };

    Ok(Some(command))
}

/// Splits a line on whitespace, keeping double-quoted runs together.
fn tokenize(line: &str) -> Result<Vec<String>, ApiError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;

    for c in line.trim().chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() || quoted {
                    tokens.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            c => current.push(c),
        }
    }

    if in_quotes {
        return Err(ApiError::validation("Unterminated quote"));
    }
    if !current.is_empty() || quoted {
        tokens.push(current);
    }

    Ok(tokens)
}

fn arg(args: &[String], index: usize, what: &str) -> Result<String, ApiError> {
    args.get(index)
        .cloned()
        .ok_or_else(|| ApiError::validation(format!("Missing {}", what)))
}

fn int(raw: &str, field: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| {
        ApiError::validation(format!("{} must be a whole number, got '{}'", field, raw))
    })
}

/// Barcodes may be typed in display grouping (`0 36000 29145 2`).
fn code_arg(args: &[String]) -> Result<String, ApiError> {
    if args.is_empty() {
        return Err(ApiError::validation("Missing barcode"));
    }
    Ok(args.concat())
}
