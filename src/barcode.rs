//! UPC-A style barcode generation
//!
//! A barcode is twelve digits: the fixed prefix `400000`, five sampled
//! digits and a check digit computed over the first eleven.
//!
//! Digits are drawn from a triangular distribution over `[0, 9]` and
//! truncated toward zero, so middle digits are far more common than `0`,
//! and `9` only appears when the sample lands exactly on the upper bound.

use std::fmt;

use rand::Rng;

use crate::error::{Error, Result};

/// Fixed leading digits of every generated code.
pub const PREFIX: [u8; 6] = [4, 0, 0, 0, 0, 0];

/// Number of sampled digits following the prefix.
pub const RANDOM_DIGITS: usize = 5;

/// Digits covered by the check digit (prefix + sampled digits).
pub const PAYLOAD_LEN: usize = PREFIX.len() + RANDOM_DIGITS;

/// Full barcode length including the check digit.
pub const BARCODE_LEN: usize = PAYLOAD_LEN + 1;

/// Shortest slice `checksum` accepts: the payload without its last
/// sampled digit.
pub const MIN_CHECKED_LEN: usize = PAYLOAD_LEN - 1;

/// Source of randomness used by the digit sampler.
///
/// Production code wraps a thread-local CSPRNG in [`RngSource`]; tests can
/// plug in a scripted source to reproduce exact digit sequences.
pub trait DigitSource {
    /// Sample a triangular distribution over `[low, high]` with its mode at
    /// the midpoint.
    fn triangular(&mut self, low: f64, high: f64) -> f64;
}

/// Adapts any [`rand::Rng`] into a [`DigitSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(R);

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl<R: Rng> DigitSource for RngSource<R> {
    fn triangular(&mut self, low: f64, high: f64) -> f64 {
        let unit: f64 = self.0.gen();
        triangular_from_unit(unit, low, high)
    }
}

/// Map a uniform sample `unit` in `[0, 1)` onto a symmetric triangular
/// distribution over `[low, high]` by inverting its CDF.
pub fn triangular_from_unit(unit: f64, low: f64, high: f64) -> f64 {
    let (mut u, mut c, mut low, mut high) = (unit, 0.5, low, high);
    if u > c {
        u = 1.0 - u;
        c = 1.0 - c;
        std::mem::swap(&mut low, &mut high);
    }
    low + (high - low) * (u * c).sqrt()
}

/// Draw one digit in `[0, 9]`.
pub fn sample_digit<S: DigitSource + ?Sized>(source: &mut S) -> u8 {
    let sample = source.triangular(0.0, 9.0).trunc();
    // `as` saturates negatives and NaN to 0
    (sample as u8).min(9)
}

/// Compute the UPC/GTIN check digit of `digits`.
///
/// The digit at the right end of the payload is weighted by 3, its
/// neighbour by 1, alternating leftwards. For an even-length slice that is
/// exactly "odd indices (1, 3, 5, ...) times 3, even indices times 1"; for
/// the eleven-digit UPC-A payload it is the standard UPC-A rule.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] unless the slice holds
/// [`MIN_CHECKED_LEN`] or [`PAYLOAD_LEN`] digits, each at most 9.
pub fn checksum(digits: &[u8]) -> Result<u8> {
    if !(MIN_CHECKED_LEN..=PAYLOAD_LEN).contains(&digits.len()) {
        return Err(Error::InvalidInput(format!(
            "checksum needs {} or {} digits, got {}",
            MIN_CHECKED_LEN,
            PAYLOAD_LEN,
            digits.len()
        )));
    }
    if let Some((pos, d)) = digits.iter().enumerate().find(|(_, d)| **d > 9) {
        return Err(Error::InvalidInput(format!(
            "value {} at position {} is not a decimal digit",
            d, pos
        )));
    }
    Ok(check_digit(digits))
}

fn check_digit(digits: &[u8]) -> u8 {
    let (mut tripled, mut single) = (0u32, 0u32);
    for (i, &d) in digits.iter().rev().enumerate() {
        if i % 2 == 0 {
            tripled += u32::from(d);
        } else {
            single += u32::from(d);
        }
    }
    let remainder = (3 * tripled + single) % 10;
    if remainder == 0 {
        0
    } else {
        (10 - remainder) as u8
    }
}

fn digit_char(d: u8) -> Result<char> {
    char::from_digit(u32::from(d), 10)
        .ok_or_else(|| Error::InvalidInput(format!("{} is not a decimal digit", d)))
}

/// Join digits into a string, one character per digit.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if any value is above 9.
pub fn join_digits(digits: &[u8]) -> Result<String> {
    digits.iter().map(|&d| digit_char(d)).collect()
}

/// A complete twelve-digit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Barcode {
    digits: [u8; BARCODE_LEN],
}

impl Barcode {
    fn assemble(sampled: [u8; RANDOM_DIGITS]) -> Self {
        let mut digits = [0u8; BARCODE_LEN];
        digits[..PREFIX.len()].copy_from_slice(&PREFIX);
        digits[PREFIX.len()..PAYLOAD_LEN].copy_from_slice(&sampled);
        digits[PAYLOAD_LEN] = check_digit(&digits[..PAYLOAD_LEN]);
        Self { digits }
    }

    pub fn digits(&self) -> &[u8; BARCODE_LEN] {
        &self.digits
    }

    pub fn payload(&self) -> &[u8] {
        &self.digits[..PAYLOAD_LEN]
    }

    pub fn check_digit(&self) -> u8 {
        self.digits[PAYLOAD_LEN]
    }

    /// The twelve digits as a string, one character per digit.
    pub fn to_digit_string(&self) -> Result<String> {
        join_digits(&self.digits)
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_digit_string().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// Generate a barcode drawing its digits from `source`.
pub fn generate_with<S: DigitSource + ?Sized>(source: &mut S) -> Barcode {
    let mut sampled = [0u8; RANDOM_DIGITS];
    for slot in sampled.iter_mut() {
        *slot = sample_digit(source);
    }
    Barcode::assemble(sampled)
}

/// Generate a barcode from the thread-local OS-seeded generator.
pub fn generate_barcode() -> String {
    let mut source = RngSource::new(rand::thread_rng());
    generate_with(&mut source).to_string()
}
