//! Fraction helpers shared by the unit generator: reduction, selector
//! building, and the selector sort order.

use crate::error::{GridError, Result};
use std::cmp::Ordering;

/// A grid unit fraction. Whole-number selectors carry a denominator of 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fraction {
    pub numerator: u32,
    pub denominator: u32,
}

impl Fraction {
    pub fn new(numerator: u32, denominator: u32) -> Self {
        Fraction {
            numerator,
            denominator,
        }
    }

    /// The fraction in lowest terms.
    pub fn reduced(self) -> Self {
        reduce(self.numerator, self.denominator)
    }

    pub fn is_whole(self) -> bool {
        self.denominator == 1
    }

    /// The width ratio this fraction stands for.
    pub fn ratio(self) -> f64 {
        f64::from(self.numerator) / f64::from(self.denominator)
    }
}

/// Euclid: `gcd(a, 0) = a`, `gcd(a, b) = gcd(b, a mod b)`.
pub fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

pub fn reduce(numerator: u32, denominator: u32) -> Fraction {
    let divisor = gcd(numerator, denominator);
    if divisor == 0 {
        // Only gcd(0, 0); nothing to divide.
        return Fraction::new(numerator, denominator);
    }
    Fraction::new(numerator / divisor, denominator / divisor)
}

/// Builds the selector for a fraction: `prefix + N` for whole units when
/// `whole_numbers` is on, `prefix + N-D` otherwise.
pub fn selector_for(prefix: &str, fraction: Fraction, whole_numbers: bool) -> String {
    if fraction.is_whole() && whole_numbers {
        format!("{}{}", prefix, fraction.numerator)
    } else {
        format!("{}{}-{}", prefix, fraction.numerator, fraction.denominator)
    }
}

/// Reads the `N` or `N-D` suffix following `prefix`. A missing denominator
/// means a whole number and parses as denominator 1.
pub fn parse_selector_fraction(prefix: &str, selector: &str) -> Result<Fraction> {
    let malformed = || GridError::MalformedSelector(selector.to_string());
    let suffix = selector.strip_prefix(prefix).ok_or_else(malformed)?;

    let (numerator, denominator) = match suffix.split_once('-') {
        Some((n, d)) => (n, Some(d)),
        None => (suffix, None),
    };

    let numerator = parse_term(numerator).ok_or_else(malformed)?;
    let denominator = match denominator {
        Some(d) => parse_term(d).ok_or_else(malformed)?,
        None => 1,
    };

    Ok(Fraction::new(numerator, denominator))
}

fn parse_term(term: &str) -> Option<u32> {
    if term.is_empty() || !term.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    term.parse().ok()
}

/// Orders two fractions by denominator, then numerator.
pub fn compare_fractions(a: Fraction, b: Fraction) -> Ordering {
    a.denominator
        .cmp(&b.denominator)
        .then(a.numerator.cmp(&b.numerator))
}

/// Orders two selectors generated with `prefix` by their fractions.
pub fn compare_selectors(prefix: &str, a: &str, b: &str) -> Result<Ordering> {
    let a_frac = parse_selector_fraction(prefix, a)?;
    let b_frac = parse_selector_fraction(prefix, b)?;
    Ok(compare_fractions(a_frac, b_frac))
}

/// Sorts selectors by their fractions, falling back to the selector text for
/// equal fractions so the order never depends on input order.
pub fn sort_selectors<I>(prefix: &str, selectors: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = String>,
{
    let mut keyed = selectors
        .into_iter()
        .map(|selector| -> Result<(Fraction, String)> {
            Ok((parse_selector_fraction(prefix, &selector)?, selector))
        })
        .collect::<Result<Vec<_>>>()?;

    keyed.sort_by(|(a_frac, a), (b_frac, b)| {
        compare_fractions(*a_frac, *b_frac).then_with(|| a.cmp(b))
    });

    Ok(keyed.into_iter().map(|(_, selector)| selector).collect())
}
