//! Random password generation and a rough entropy estimate.

use rand::Rng;
use zeroize::Zeroizing;

use crate::errors::{PassmanError, Result};

const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGIT: &[u8] = b"0123456789";
const SYMBOL: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Character classes to draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharSet {
    pub lower: bool,
    pub upper: bool,
    pub digit: bool,
    pub symbol: bool,
}

impl CharSet {
    pub const ALL: CharSet = CharSet {
        lower: true,
        upper: true,
        digit: true,
        symbol: true,
    };

    /// The selected classes, or every class when none is selected.
    pub fn or_all(self) -> Self {
        if self == Self::default() {
            Self::ALL
        } else {
            self
        }
    }

    /// Every byte a password may contain.
    pub fn alphabet(&self) -> Vec<u8> {
        let set = self.or_all();
        let mut out = Vec::with_capacity(94);
        for (on, chars) in [
            (set.lower, LOWER),
            (set.upper, UPPER),
            (set.digit, DIGIT),
            (set.symbol, SYMBOL),
        ] {
            if on {
                out.extend_from_slice(chars);
            }
        }
        out
    }
}

/// Draw `length` characters uniformly from `charset`.
pub fn generate(length: usize, charset: CharSet) -> Result<Zeroizing<String>> {
    if length == 0 {
        return Err(PassmanError::InvalidArgument(
            "password length must be at least 1".into(),
        ));
    }

    let alphabet = charset.alphabet();
    let mut rng = rand::rng();
    let mut password = Zeroizing::new(String::with_capacity(length));
    for _ in 0..length {
        let idx = rng.random_range(0..alphabet.len());
        password.push(char::from(alphabet[idx]));
    }
    Ok(password)
}

/// Approximate entropy in bits: `len * log2(cardinality)`, where the
/// cardinality sums the size of each character class present.
pub fn entropy(password: &[u8]) -> f64 {
    let cardinality = cardinality(password);
    if cardinality == 0 {
        return 0.0;
    }
    password.len() as f64 * f64::from(cardinality).log2()
}

fn cardinality(password: &[u8]) -> u32 {
    let has = |class: &[u8]| password.iter().any(|b| class.contains(b));
    let mut total = 0;
    if has(LOWER) {
        total += 26;
    }
    if has(UPPER) {
        total += 26;
    }
    if has(DIGIT) {
        total += 10;
    }
    if has(SYMBOL) {
        total += 32;
    }
    total
}
