//! Exact fixed-point token amounts.
//!
//! User input arrives in display units ("100.5 KALE"); the chain counts
//! minimal units ("100500000 ukale"). Conversion is integer-only so fee
//! rounding is identical everywhere.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while parsing or scaling amounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("'{0}' is not a non-negative decimal number")]
    Invalid(String),

    #[error("amount has {scale} fractional digits but the token only has {decimals}")]
    TooPrecise { scale: u32, decimals: u8 },

    #[error("amount overflows")]
    Overflow,
}

/// A non-negative decimal quantity kept as exact digits.
///
/// The value is `mantissa / 10^scale`, normalized so the fractional part has
/// no trailing zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayAmount {
    mantissa: u128,
    scale: u32,
}

impl DisplayAmount {
    /// Amount with no fractional part.
    pub fn whole(units: u128) -> Self {
        Self {
            mantissa: units,
            scale: 0,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    /// Number of significant fractional digits.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Convert to minimal units for a token with `decimals` places.
    pub fn to_base_units(&self, decimals: u8) -> Result<u128, AmountError> {
        let decimals_u32 = u32::from(decimals);
        if self.scale > decimals_u32 {
            return Err(AmountError::TooPrecise {
                scale: self.scale,
                decimals,
            });
        }
        let factor = pow10(decimals_u32 - self.scale)?;
        self.mantissa.checked_mul(factor).ok_or(AmountError::Overflow)
    }
}

impl FromStr for DisplayAmount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AmountError::Empty);
        }

        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(AmountError::Invalid(s.to_string()));
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(AmountError::Invalid(s.to_string()));
        }

        let frac_part = frac_part.trim_end_matches('0');
        let mut mantissa: u128 = 0;
        for b in int_part.bytes().chain(frac_part.bytes()) {
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(u128::from(b - b'0')))
                .ok_or(AmountError::Overflow)?;
        }

        Ok(Self {
            mantissa,
            scale: frac_part.len() as u32,
        })
    }
}

impl fmt::Display for DisplayAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.to_string();
        let scale = self.scale as usize;
        if scale == 0 {
            return f.write_str(&digits);
        }
        let padded = format!("{:0>width$}", digits, width = scale + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{}.{}", int_part, frac_part)
    }
}

impl Serialize for DisplayAmount {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DisplayAmount {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// `10^exp` in u128.
pub fn pow10(exp: u32) -> Result<u128, AmountError> {
    10u128.checked_pow(exp).ok_or(AmountError::Overflow)
}

/// Render minimal units as a display-unit decimal string, trimming trailing
/// zeros (`format_units(99_800_000, 6) == "99.8"`).
pub fn format_units(base: u128, decimals: u8) -> String {
    if decimals == 0 {
        return base.to_string();
    }
    let Ok(factor) = pow10(u32::from(decimals)) else {
        return base.to_string();
    };
    let int_part = base / factor;
    let frac_part = base % factor;
    if frac_part == 0 {
        return int_part.to_string();
    }
    let frac = format!("{:0>width$}", frac_part, width = decimals as usize);
    format!("{}.{}", int_part, frac.trim_end_matches('0'))
}
