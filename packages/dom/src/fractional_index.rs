//! # Fractional Indexes
//!
//! Sibling order is stored as string keys that sort lexicographically.
//! A key is the fractional part of a base-62 number in `[0, 1)`, written
//! with the digits `0-9A-Za-z` (already in ASCII order) and never ending
//! in `0`, so there is always room for another key between any two.
//!
//! ```text
//! key_between(None, None)        -> "V"
//! key_between(Some("V"), None)   -> "l"
//! key_between(None, Some("V"))   -> "G"
//! key_between(Some("F"), Some("G")) -> "FV"
//! ```

use crate::errors::FractionalIndexError;

const DIGITS: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const BASE: usize = DIGITS.len();
const ZERO: u8 = b'0';

fn digit_value(c: u8) -> Option<usize> {
    match c {
        b'0'..=b'9' => Some((c - b'0') as usize),
        b'A'..=b'Z' => Some((c - b'A') as usize + 10),
        b'a'..=b'z' => Some((c - b'a') as usize + 36),
        _ => None,
    }
}

/// Check that `key` can be used as a sibling index
pub fn validate_key(key: &str) -> Result<(), FractionalIndexError> {
    if key.is_empty() {
        return Err(FractionalIndexError::Empty);
    }
    if key.bytes().any(|c| digit_value(c).is_none()) {
        return Err(FractionalIndexError::InvalidDigit(key.to_string()));
    }
    if key.as_bytes().last() == Some(&ZERO) {
        return Err(FractionalIndexError::TrailingZero(key.to_string()));
    }
    Ok(())
}

/// Generate a key strictly between `a` and `b`.
///
/// `None` stands for the open start (for `a`) or the open end (for `b`).
pub fn key_between(a: Option<&str>, b: Option<&str>) -> Result<String, FractionalIndexError> {
    if let Some(a) = a {
        validate_key(a)?;
    }
    if let Some(b) = b {
        validate_key(b)?;
    }
    if let (Some(a), Some(b)) = (a, b) {
        if a >= b {
            return Err(FractionalIndexError::OutOfOrder(a.to_string(), b.to_string()));
        }
    }

    let a = a.unwrap_or("").as_bytes();
    let digits = midpoint(a, b.map(str::as_bytes));
    // Only DIGITS bytes are ever pushed
    Ok(digits.into_iter().map(char::from).collect())
}

/// Key that sorts after `last` (or the first key of an empty list)
pub fn key_after(last: Option<&str>) -> Result<String, FractionalIndexError> {
    key_between(last, None)
}

/// Key that sorts before `first` (or the first key of an empty list)
pub fn key_before(first: Option<&str>) -> Result<String, FractionalIndexError> {
    key_between(None, first)
}

fn midpoint(a: &[u8], b: Option<&[u8]>) -> Vec<u8> {
    if let Some(b) = b {
        // Strip the common prefix, reading missing digits of `a` as zeros
        let mut n = 0;
        while n < b.len() && a.get(n).copied().unwrap_or(ZERO) == b[n] {
            n += 1;
        }
        if n > 0 {
            let rest_a = if n < a.len() { &a[n..] } else { &[][..] };
            let mut out = b[..n].to_vec();
            out.extend(midpoint(rest_a, Some(&b[n..])));
            return out;
        }
    }

    let digit_a = a.first().and_then(|c| digit_value(*c)).unwrap_or(0);
    let digit_b = b
        .and_then(|b| b.first())
        .and_then(|c| digit_value(*c))
        .unwrap_or(BASE);

    if digit_b - digit_a > 1 {
        let mid = (digit_a + digit_b + 1) / 2;
        return vec![DIGITS[mid]];
    }

    match b {
        Some(b) if b.len() > 1 => vec![b[0]],
        _ => {
            let rest_a = if a.is_empty() { a } else { &a[1..] };
            let mut out = vec![DIGITS[digit_a]];
            out.extend(midpoint(rest_a, None));
            out
        }
    }
}
