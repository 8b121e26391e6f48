//! # Rendering
//!
//! Plain-text views of command responses for the terminal.

use std::fmt::Write;

use crate::commands::cart::CartResponse;
use crate::commands::product::ProductDto;
use crate::commands::sale::SaleDto;
use crate::state::ConfigState;
use farmstand_core::barcode;
use farmstand_core::BarcodeCheck;

pub const HELP: &str = "\
Catalog
  products [term]                       list the catalog, or names containing term
  find <term>                           same as products <term>
  product <id>                          show one product
  new <name> <price> <stock> [desc]     add a product (quote names with spaces)
  price <id> <price>                    change a price
  stock <id> <stock>                    set stock on hand
  delete <id>                           remove a product
Barcodes
  scan <code>                           validate, look up, add one to the cart
  check <code>                          validate a code without looking it up
  barcode [n]                           generate n label codes
Cart
  add <id> [qty]                        add to the cart (default 1)
  qty <id> <qty>                        set a quantity (0 removes)
  remove <id>                           remove a line
  cart                                  show the cart
  clear                                 empty the cart
  checkout                              record the sale
Other
  sales                                 sales history
  help                                  this list
  quit                                  leave the register";

pub fn banner(config: &ConfigState) -> String {
    format!("{} register. Type 'help' for commands.", config.store_name)
}

pub fn products(config: &ConfigState, products: &[ProductDto]) -> String {
    if products.is_empty() {
        return "No products".to_string();
    }

    let mut out = format!(
        "{:<36}  {:<24} {:>9} {:>6}  {}",
        "ID", "NAME", "PRICE", "STOCK", "BARCODE"
    );
    for p in products {
        let _ = write!(
            out,
            "\n{:<36}  {:<24} {:>9} {:>6}  {}",
            p.id,
            p.name,
            config.format_currency(p.price_cents),
            p.stock,
            p.barcode_display
        );
    }
    out
}

pub fn product(config: &ConfigState, p: &ProductDto) -> String {
    let mut out = format!(
        "{}\n  id:      {}\n  price:   {}\n  stock:   {}{}\n  barcode: {}",
        p.name,
        p.id,
        config.format_currency(p.price_cents),
        p.stock,
        if p.in_stock { "" } else { " (sold out)" },
        p.barcode_display
    );
    if !p.description.is_empty() {
        let _ = write!(out, "\n  {}", p.description);
    }
    out
}

pub fn cart(config: &ConfigState, cart: &CartResponse) -> String {
    if cart.items.is_empty() {
        return "Cart is empty".to_string();
    }

    let mut out = String::new();
    for line in &cart.items {
        let _ = writeln!(
            out,
            "{:<24} x{:<4} @ {:>8}  {:>9}",
            line.name,
            line.quantity,
            config.format_currency(line.unit_price_cents),
            config.format_currency(line.line_total_cents)
        );
    }
    let _ = write!(
        out,
        "{:<42}  {:>9}\n{} line(s), {} unit(s)",
        "TOTAL",
        config.format_currency(cart.totals.total_cents),
        cart.totals.item_count,
        cart.totals.total_quantity
    );
    out
}

pub fn receipt(config: &ConfigState, sale: &SaleDto) -> String {
    let mut out = format!(
        "{}\n{}\n",
        config.store_name,
        sale.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    for item in &sale.items {
        let _ = writeln!(
            out,
            "{:<24} x{:<4} @ {:>8}  {:>9}",
            item.product_name,
            item.quantity,
            config.format_currency(item.price_cents),
            config.format_currency(item.total_cents)
        );
    }
    let _ = write!(
        out,
        "{:<42}  {:>9}\nSale {}",
        "TOTAL",
        config.format_currency(sale.total_amount_cents),
        sale.id
    );
    out
}

pub fn sales(config: &ConfigState, sales: &[SaleDto]) -> String {
    if sales.is_empty() {
        return "No sales recorded".to_string();
    }

    let mut out = String::new();
    for sale in sales {
        let _ = writeln!(
            out,
            "{}  {}  {:>4} unit(s)  {:>9}",
            sale.timestamp.format("%Y-%m-%d %H:%M"),
            sale.id,
            sale.total_quantity,
            config.format_currency(sale.total_amount_cents)
        );
    }
    let grand_total: i64 = sales.iter().map(|s| s.total_amount_cents).sum();
    let _ = write!(
        out,
        "{} sale(s), {}",
        sales.len(),
        config.format_currency(grand_total)
    );
    out
}

pub fn check(code: &str, report: &BarcodeCheck) -> String {
    match (&report.error, report.valid) {
        (_, true) => format!("valid: {}", barcode::format_for_display(code.trim())),
        (Some(reason), false) => format!("invalid: {}", reason),
        (None, false) => "invalid".to_string(),
    }
}

pub fn barcodes(codes: &[String]) -> String {
    codes.join("\n")
}
