// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Numeric ordering for Slack message timestamps.
//!
//! A `ts` such as `"1712345678.000200"` is a decimal string. Comparing it as
//! a float loses precision and comparing it as text gets `"10.0" < "9.0"`
//! wrong, so tokens are compared exactly as (integer part, fraction digits).

use std::cmp::Ordering;
use std::fmt;

/// A parsed, exactly comparable message sequence token.
#[derive(Debug, Clone)]
pub struct SeqToken {
    raw: String,
    whole: u64,
    /// Fraction digits with trailing zeros removed.
    frac: String,
}

impl SeqToken {
    /// Parses `digits[.digits]`. Anything else yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (whole, frac) = raw.split_once('.').unwrap_or((raw, ""));
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self {
            raw: raw.to_string(),
            whole: whole.parse().ok()?,
            frac: frac.trim_end_matches('0').to_string(),
        })
    }

    /// The token exactly as the API delivered it.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl PartialEq for SeqToken {
    fn eq(&self, other: &Self) -> bool {
        self.whole == other.whole && self.frac == other.frac
    }
}

impl Eq for SeqToken {}

impl PartialOrd for SeqToken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SeqToken {
    fn cmp(&self, other: &Self) -> Ordering {
        // With trailing zeros gone, digit strings order like the fractions they spell.
        self.whole
            .cmp(&other.whole)
            .then_with(|| self.frac.cmp(&other.frac))
    }
}

impl fmt::Display for SeqToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
