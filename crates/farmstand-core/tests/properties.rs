//! Property-based tests for the barcode codec and the cart calculator.
//!
//! These check invariants over arbitrary payloads, clocks and operation
//! sequences rather than a handful of fixtures.

use chrono::{TimeZone, Utc};
use farmstand_core::barcode::{self, BarcodeError};
use farmstand_core::{Cart, Product};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn payload_strategy() -> impl Strategy<Value = String> {
    "[0-9]{11}"
}

fn product(id: &str, price_cents: i64, stock: i64) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {}", id),
        price_cents,
        stock,
        description: String::new(),
        barcode: barcode::generate(),
        created_at: Utc::now(),
    }
}

#[derive(Debug, Clone)]
enum CartOp {
    Add(usize, i64),
    Set(usize, i64),
    Remove(usize),
}

fn cart_op_strategy() -> impl Strategy<Value = CartOp> {
    prop_oneof![
        (0usize..4, 1i64..20).prop_map(|(p, q)| CartOp::Add(p, q)),
        (0usize..4, -3i64..20).prop_map(|(p, q)| CartOp::Set(p, q)),
        (0usize..4).prop_map(CartOp::Remove),
    ]
}

// Barcode codec
proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn check_digit_is_a_single_digit_and_deterministic(payload in payload_strategy()) {
        let first = barcode::check_digit_for(&payload).unwrap();
        let second = barcode::check_digit_for(&payload).unwrap();
        prop_assert!(first <= 9);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn payload_with_its_check_digit_validates(payload in payload_strategy()) {
        let digit = barcode::check_digit_for(&payload).unwrap();
        let code = format!("{}{}", payload, digit);
        prop_assert!(barcode::validate(&code).is_ok(), "rejected {}", code);
    }

    #[test]
    fn any_other_check_digit_is_rejected(payload in payload_strategy(), offset in 1u8..10) {
        let digit = barcode::check_digit_for(&payload).unwrap();
        let wrong = (digit + offset) % 10;
        let code = format!("{}{}", payload, wrong);
        let is_mismatch = matches!(
            barcode::validate(&code),
            Err(BarcodeError::CheckDigitMismatch { .. })
        );
        prop_assert!(is_mismatch);
    }

    #[test]
    fn generated_codes_always_validate(millis in 0i64..4_000_000_000_000, seed in any::<u64>()) {
        let now = Utc.timestamp_millis_opt(millis).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let code = barcode::generate_with(now, &mut rng);

        prop_assert_eq!(code.as_str().len(), 12);
        prop_assert!(barcode::validate(code.as_str()).is_ok());
        prop_assert_eq!(&code.as_str()[..5], format!("{:05}", millis % 100_000));
    }

    #[test]
    fn display_grouping_is_reversible(payload in payload_strategy()) {
        let digit = barcode::check_digit_for(&payload).unwrap();
        let code = format!("{}{}", payload, digit);
        let shown = barcode::format_for_display(&code);

        prop_assert_eq!(shown.len(), 15);
        prop_assert_eq!(barcode::strip_display(&shown), code);
    }

    #[test]
    fn wrong_length_input_is_shown_unchanged(code in "[0-9]{0,11}|[0-9]{13,20}") {
        prop_assert_eq!(barcode::format_for_display(&code), code);
    }
}

// Cart calculator
proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn cart_lines_never_exceed_stock(
        stocks in prop::collection::vec(0i64..12, 4),
        ops in prop::collection::vec(cart_op_strategy(), 0..40),
    ) {
        let products: Vec<Product> = stocks
            .iter()
            .enumerate()
            .map(|(i, &stock)| product(&i.to_string(), 100 + i as i64 * 25, stock))
            .collect();
        let mut cart = Cart::new();

        for op in ops {
            match op {
                CartOp::Add(p, q) => {
                    let _ = cart.add_item(&products[p], q);
                }
                CartOp::Set(p, q) => {
                    let _ = cart.set_quantity(&products[p].id, q);
                }
                CartOp::Remove(p) => {
                    cart.remove_item(&products[p].id);
                }
            }

            for item in cart.items() {
                prop_assert!(item.quantity() >= 1);
                prop_assert!(item.quantity() <= item.product().stock);
            }
        }
    }

    #[test]
    fn sale_total_matches_cart_total(
        lines in prop::collection::vec((0i64..10_000, 1i64..50), 1..10),
    ) {
        let mut cart = Cart::new();
        for (i, (price, qty)) in lines.iter().enumerate() {
            cart.add_item(&product(&i.to_string(), *price, 50), *qty).unwrap();
        }

        let completed = cart.complete_sale().unwrap();
        let line_sum: i64 = completed.sale.items().iter().map(|i| i.total_cents).sum();

        prop_assert_eq!(completed.sale.total_amount(), cart.total());
        prop_assert_eq!(line_sum, cart.total().cents());
        prop_assert_eq!(completed.stock_decrements.len(), cart.item_count());
    }
}
