//! # Barcode Module
//!
//! UPC-A barcode generation, check digit computation, and validation.
//!
//! ## UPC-A Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  0 3 6 0 0 0 2 9 1 4 5 │ 2                                              │
//! │  ─────────────────────   ─                                              │
//! │  payload (11 digits)     check digit                                    │
//! │                                                                         │
//! │  weights:  3 1 3 1 3 1 3 1 3 1 3                                        │
//! │  sum = 3·(0+6+0+2+1+5) + (3+0+0+9+4) = 58                               │
//! │  check = (10 - 58 mod 10) mod 10 = 2                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Where Barcodes Come From
//! - [`generate`] when a product is created in the catalog
//! - A scanner or the operator's keyboard, as a raw string handed to
//!   [`validate`] before any catalog lookup
//!
//! ## Usage
//! ```rust
//! use farmstand_core::barcode::{self, BarcodeError};
//!
//! let code = barcode::validate("036000291452").unwrap();
//! assert_eq!(code.check_digit(), 2);
//!
//! assert!(matches!(
//!     barcode::validate("036000291453"),
//!     Err(BarcodeError::CheckDigitMismatch { expected: 2, found: 3 })
//! ));
//! ```

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ts_rs::TS;

/// Total digits in a UPC-A code.
pub const BARCODE_LEN: usize = 12;

/// Digits that carry data (everything but the check digit).
pub const PAYLOAD_LEN: usize = 11;

// =============================================================================
// Errors
// =============================================================================

/// Why a string is not shaped like a UPC-A code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Barcode is empty")]
    Empty,

    #[error("Barcode must be exactly {expected} digits, got {length}")]
    WrongLength { expected: usize, length: usize },

    #[error("Barcode must contain only digits, found '{found}' at position {position}")]
    NonDigit { position: usize, found: char },
}

/// Barcode validation failure.
///
/// `Format` means the input isn't 12 digits at all; `CheckDigitMismatch`
/// means it is well formed but the last digit doesn't match the payload,
/// which usually points at a misread or a typo.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BarcodeError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Invalid check digit. Expected {expected}, got {found}")]
    CheckDigitMismatch { expected: u8, found: u8 },
}

impl BarcodeError {
    /// True when the input wasn't 12 numeric digits.
    pub fn is_format_error(&self) -> bool {
        matches!(self, BarcodeError::Format(_))
    }
}

// =============================================================================
// Barcode Type
// =============================================================================

/// A validated 12-digit UPC-A code.
///
/// The only ways to get one are [`validate`], [`generate`], and
/// deserialization (which validates), so holding a `Barcode` means the
/// check digit is correct. Serialized as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Barcode(String);

impl Barcode {
    /// Builds a code from payload digits, appending the check digit.
    fn from_payload(payload: &[u8; PAYLOAD_LEN]) -> Self {
        let check = compute_check_digit(payload);
        let code = payload
            .iter()
            .chain(std::iter::once(&check))
            .map(|d| char::from(b'0' + d % 10))
            .collect();
        Barcode(code)
    }

    /// The raw 12 digits.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first 11 digits.
    #[inline]
    pub fn payload(&self) -> &str {
        &self.0[..PAYLOAD_LEN]
    }

    /// The final digit.
    pub fn check_digit(&self) -> u8 {
        self.0.as_bytes()[PAYLOAD_LEN] - b'0'
    }

    /// Grouped `D DDDDD DDDDD D` form for labels and receipts.
    pub fn formatted(&self) -> String {
        format_for_display(&self.0)
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Barcode {
    type Err = BarcodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate(s)
    }
}

impl TryFrom<String> for Barcode {
    type Error = BarcodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate(&value)
    }
}

impl From<Barcode> for String {
    fn from(code: Barcode) -> Self {
        code.0
    }
}

impl AsRef<str> for Barcode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Check Digit
// =============================================================================

/// Computes the UPC-A check digit for an 11-digit payload.
///
/// Digits at even 0-based index (1st, 3rd, 5th... character) weigh 3,
/// the rest weigh 1. The result is `(10 - sum mod 10) mod 10`, always in
/// `0..=9`.
///
/// ## Example
/// ```rust
/// use farmstand_core::barcode::compute_check_digit;
///
/// assert_eq!(compute_check_digit(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1]), 2);
/// ```
pub fn compute_check_digit(payload: &[u8; PAYLOAD_LEN]) -> u8 {
    weighted_check_digit(payload)
}

/// String form of [`compute_check_digit`]: the payload must be 11 digits.
pub fn check_digit_for(payload: &str) -> Result<u8, BarcodeError> {
    let digits: [u8; PAYLOAD_LEN] = parse_digits(payload)?;
    Ok(compute_check_digit(&digits))
}

fn weighted_check_digit(digits: &[u8]) -> u8 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            let d = u32::from(d % 10);
            if i % 2 == 0 {
                d * 3
            } else {
                d
            }
        })
        .sum();

    ((10 - sum % 10) % 10) as u8
}

fn parse_digits<const N: usize>(input: &str) -> Result<[u8; N], FormatError> {
    if input.is_empty() {
        return Err(FormatError::Empty);
    }

    let length = input.chars().count();
    if length != N {
        return Err(FormatError::WrongLength {
            expected: N,
            length,
        });
    }

    let mut digits = [0u8; N];
    for (position, (slot, found)) in digits.iter_mut().zip(input.chars()).enumerate() {
        let digit = found
            .to_digit(10)
            .ok_or(FormatError::NonDigit { position, found })?;
        *slot = digit as u8;
    }

    Ok(digits)
}

// =============================================================================
// Validation
// =============================================================================

/// Validates a scanned or typed code.
///
/// Surrounding whitespace is ignored (scanners often send a trailing
/// newline). Returns the parsed [`Barcode`] on success.
///
/// ## Scan Workflow
/// ```text
/// Scanner delivers "036000291452\n"
///      │
///      ▼
/// validate() ← THIS FUNCTION
///      │
///      ├── not 12 digits?      → BarcodeError::Format(..)
///      ├── check digit wrong?  → BarcodeError::CheckDigitMismatch
///      │
///      ▼
/// Barcode("036000291452") → catalog lookup
/// ```
pub fn validate(code: &str) -> Result<Barcode, BarcodeError> {
    let code = code.trim();
    let digits: [u8; BARCODE_LEN] = parse_digits(code)?;

    let (payload, check) = digits.split_at(PAYLOAD_LEN);
    let expected = weighted_check_digit(payload);
    let found = check[0];

    if expected != found {
        return Err(BarcodeError::CheckDigitMismatch { expected, found });
    }

    Ok(Barcode(code.to_string()))
}

/// Result shape handed to the UI: a flag plus a printable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BarcodeCheck {
    pub valid: bool,
    /// Absent from the JSON when the code is valid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error: Option<String>,
}

/// Validates without producing a [`Barcode`], for display purposes.
///
/// ```rust
/// use farmstand_core::barcode::check;
///
/// assert!(check("036000291452").valid);
/// assert_eq!(
///     check("12345").error.as_deref(),
///     Some("Barcode must be exactly 12 digits, got 5")
/// );
/// ```
pub fn check(code: &str) -> BarcodeCheck {
    match validate(code) {
        Ok(_) => BarcodeCheck {
            valid: true,
            error: None,
        },
        Err(err) => BarcodeCheck {
            valid: false,
            error: Some(err.to_string()),
        },
    }
}

// =============================================================================
// Generation
// =============================================================================

/// Generates a fresh barcode from the clock and thread RNG.
pub fn generate() -> Barcode {
    generate_with(Utc::now(), &mut rand::thread_rng())
}

/// Generates a barcode from an explicit clock reading and RNG.
///
/// Payload = last 5 digits of the millisecond timestamp followed by 6
/// random digits. Only the output invariant matters: the check digit is
/// always correct.
pub fn generate_with<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> Barcode {
    let time_part = now.timestamp_millis().rem_euclid(100_000) as u64;
    let random_part: u64 = rng.gen_range(0..1_000_000);

    let mut value = time_part * 1_000_000 + random_part;
    let mut payload = [0u8; PAYLOAD_LEN];
    for slot in payload.iter_mut().rev() {
        *slot = (value % 10) as u8;
        value /= 10;
    }

    Barcode::from_payload(&payload)
}

/// Generates `count` codes, e.g. for demo catalog data.
pub fn generate_batch(count: usize) -> Vec<Barcode> {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| generate_with(Utc::now(), &mut rng)).collect()
}

// =============================================================================
// Display
// =============================================================================

/// Groups a 12-character code as `D DDDDD DDDDD D`.
///
/// Presentation only. Anything that isn't 12 characters is returned as-is,
/// and [`strip_display`] undoes the grouping.
pub fn format_for_display(code: &str) -> String {
    let chars: Vec<char> = code.chars().collect();
    if chars.len() != BARCODE_LEN {
        return code.to_string();
    }

    let group = |range: std::ops::Range<usize>| chars[range].iter().collect::<String>();
    format!(
        "{} {} {} {}",
        chars[0],
        group(1..6),
        group(6..11),
        chars[11]
    )
}

/// Removes display spacing.
pub fn strip_display(display: &str) -> String {
    display.chars().filter(|c| !c.is_whitespace()).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
