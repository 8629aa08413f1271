//! Exact resource quantities
//!
//! A [`Quantity`] is parsed from the quantity-string grammar used on the
//! wire (`"500m"`, `"2"`, `"512Mi"`, `"1e3"`) into an exact count of
//! milli-units held in an `i128`. Parsing is total over the grammar and
//! fails loudly on anything else: negative values, garbage, overflow, and
//! precision finer than one milli-unit are all typed errors. Rounding is
//! never performed.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing a quantity string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    #[error("invalid quantity {0:?}")]
    Invalid(String),

    #[error("negative quantity {0:?} is not allowed")]
    Negative(String),

    #[error("quantity {0:?} has precision finer than one milli-unit")]
    SubMilliPrecision(String),

    #[error("quantity {0:?} overflows the representable range")]
    Overflow(String),
}

/// An exact, non-negative resource quantity
///
/// Internally a count of milli-units (`i128`), so `"0.5"`, `"500m"` and
/// `"5e-1"` are all the same value. The original textual form is retained
/// for wire fidelity; equality, ordering and hashing use the canonical
/// milli value only.
#[derive(Debug, Clone)]
pub struct Quantity {
    millis: i128,
    text: String,
}

const MILLIS_PER_UNIT: i128 = 1_000;

/// Milli-unit scale factor for each recognised suffix
fn suffix_scale(suffix: &str) -> Option<i128> {
    const KILO: i128 = 1_000;
    const KIBI: i128 = 1_024;
    Some(match suffix {
        "m" => 1,
        "" => MILLIS_PER_UNIT,
        "k" => KILO.pow(2),
        "M" => KILO.pow(3),
        "G" => KILO.pow(4),
        "T" => KILO.pow(5),
        "P" => KILO.pow(6),
        "E" => KILO.pow(7),
        "Ki" => KIBI * KILO,
        "Mi" => KIBI.pow(2) * KILO,
        "Gi" => KIBI.pow(3) * KILO,
        "Ti" => KIBI.pow(4) * KILO,
        "Pi" => KIBI.pow(5) * KILO,
        "Ei" => KIBI.pow(6) * KILO,
        _ => return None,
    })
}

/// 10^exp with overflow checking
fn checked_pow10(exp: u32) -> Option<i128> {
    10_i128.checked_pow(exp)
}

impl Quantity {
    /// Parse a quantity string
    ///
    /// Accepts `digits[.digits]` followed by either a decimal/binary suffix
    /// (`m`, `k`, `M`, `G`, `T`, `P`, `E`, `Ki`, `Mi`, `Gi`, `Ti`, `Pi`,
    /// `Ei`) or a base-ten exponent (`e3`, `E-2`). A leading `+` is
    /// tolerated; a leading `-` is rejected because resource quantities are
    /// non-negative.
    pub fn parse(input: &str) -> Result<Self, QuantityError> {
        let invalid = || QuantityError::Invalid(input.to_string());

        let rest = if let Some(r) = input.strip_prefix('-') {
            // Distinguish "-5" (negative) from "-abc" (garbage)
            if r.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                return Err(QuantityError::Negative(input.to_string()));
            }
            return Err(invalid());
        } else {
            input.strip_prefix('+').unwrap_or(input)
        };

        // Split the mantissa (digits plus at most one '.') from the tail
        let mut digits = String::new();
        let mut frac_len: u32 = 0;
        let mut seen_dot = false;
        let mut mantissa_end = rest.len();
        for (i, c) in rest.char_indices() {
            match c {
                '0'..='9' => {
                    digits.push(c);
                    if seen_dot {
                        frac_len += 1;
                    }
                }
                '.' if !seen_dot => seen_dot = true,
                _ => {
                    mantissa_end = i;
                    break;
                }
            }
        }
        if digits.is_empty() {
            return Err(invalid());
        }
        let tail = &rest[mantissa_end..];

        // Tail is either a suffix or a base-ten exponent. A bare "E" is the
        // exa suffix; "e"/"E" followed by digits is an exponent.
        let mut exp: i32 = 0;
        let scale = if let Some(exp_str) = tail
            .strip_prefix('e')
            .or_else(|| tail.strip_prefix('E').filter(|s| !s.is_empty()))
        {
            exp = exp_str.parse::<i32>().map_err(|_| invalid())?;
            MILLIS_PER_UNIT
        } else {
            suffix_scale(tail).ok_or_else(invalid)?
        };

        let mantissa = i128::from_str(&digits).map_err(|_| QuantityError::Overflow(input.to_string()))?;

        // millis = mantissa * scale * 10^pos_exp / 10^(frac_len + neg_exp)
        let pos_exp = exp.max(0) as u32;
        let neg_exp = (-exp).max(0) as u32;
        let overflow = || QuantityError::Overflow(input.to_string());
        let numerator = mantissa
            .checked_mul(scale)
            .and_then(|v| v.checked_mul(checked_pow10(pos_exp)?))
            .ok_or_else(overflow)?;
        let denominator = checked_pow10(frac_len.checked_add(neg_exp).ok_or_else(overflow)?)
            .ok_or_else(overflow)?;

        if numerator % denominator != 0 {
            return Err(QuantityError::SubMilliPrecision(input.to_string()));
        }

        Ok(Self {
            millis: numerator / denominator,
            text: input.to_string(),
        })
    }

    /// Construct from whole units
    pub fn from_units(units: i64) -> Self {
        let millis = i128::from(units) * 1_000;
        Self {
            millis,
            text: units.to_string(),
        }
    }

    /// Construct from milli-units
    pub fn from_millis(millis: i64) -> Self {
        Self {
            millis: i128::from(millis),
            text: format!("{}m", millis),
        }
    }

    /// The canonical value in milli-units
    pub fn millis(&self) -> i128 {
        self.millis
    }

    /// The original textual form this quantity was parsed from
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Canonical rendering: whole units when exact, otherwise milli form
    pub fn canonical(&self) -> String {
        if self.millis % 1_000 == 0 {
            format!("{}", self.millis / 1_000)
        } else {
            format!("{}m", self.millis)
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.millis == other.millis
    }
}

impl Eq for Quantity {}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.millis.cmp(&other.millis)
    }
}

impl Hash for Quantity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.millis.hash(state);
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Quantity::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_milli() {
        assert_eq!(Quantity::parse("2").unwrap().millis(), 2_000);
        assert_eq!(Quantity::parse("500m").unwrap().millis(), 500);
        assert_eq!(Quantity::parse("0").unwrap().millis(), 0);
        assert_eq!(Quantity::parse("+1").unwrap().millis(), 1_000);
    }

    #[test]
    fn test_parse_decimal_suffixes() {
        assert_eq!(Quantity::parse("1k").unwrap().millis(), 1_000_000);
        assert_eq!(Quantity::parse("2M").unwrap().millis(), 2_000_000_000);
        assert_eq!(Quantity::parse("1G").unwrap().millis(), 1_000_000_000_000);
        // Bare "E" is the exa suffix, not an exponent
        assert_eq!(Quantity::parse("1E").unwrap().millis(), 10_i128.pow(21));
    }

    #[test]
    fn test_parse_binary_suffixes() {
        assert_eq!(Quantity::parse("1Ki").unwrap().millis(), 1_024_000);
        assert_eq!(
            Quantity::parse("512Mi").unwrap().millis(),
            512 * 1_024 * 1_024 * 1_000
        );
        assert_eq!(Quantity::parse("1Ei").unwrap().millis(), 1_024_i128.pow(6) * 1_000);
    }

    #[test]
    fn test_parse_fractions_exact() {
        assert_eq!(Quantity::parse("0.5").unwrap(), Quantity::parse("500m").unwrap());
        assert_eq!(Quantity::parse("1.5Ki").unwrap().millis(), 1_536_000);
        assert_eq!(Quantity::parse("0.001").unwrap().millis(), 1);
    }

    #[test]
    fn test_parse_exponents() {
        assert_eq!(Quantity::parse("1e3").unwrap().millis(), 1_000_000);
        assert_eq!(Quantity::parse("5e-1").unwrap().millis(), 500);
        assert_eq!(Quantity::parse("1E3").unwrap().millis(), 1_000_000);
    }

    #[test]
    fn test_sub_milli_precision_rejected() {
        assert!(matches!(
            Quantity::parse("0.0001"),
            Err(QuantityError::SubMilliPrecision(_))
        ));
        assert!(matches!(
            Quantity::parse("1.5m"),
            Err(QuantityError::SubMilliPrecision(_))
        ));
        assert!(matches!(
            Quantity::parse("1e-4"),
            Err(QuantityError::SubMilliPrecision(_))
        ));
    }

    #[test]
    fn test_invalid_inputs() {
        for bad in ["", "abc", ".", "m", "1.2.3", "1X", "1 ", " 1", "1ee3", "--1"] {
            assert!(
                matches!(Quantity::parse(bad), Err(QuantityError::Invalid(_))),
                "expected Invalid for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_negative_rejected() {
        assert!(matches!(
            Quantity::parse("-1"),
            Err(QuantityError::Negative(_))
        ));
        assert!(matches!(
            Quantity::parse("-500m"),
            Err(QuantityError::Negative(_))
        ));
    }

    #[test]
    fn test_overflow_rejected() {
        assert!(matches!(
            Quantity::parse("99999999999999999999999999999999999999999"),
            Err(QuantityError::Overflow(_))
        ));
        assert!(matches!(
            Quantity::parse("1e100"),
            Err(QuantityError::Overflow(_))
        ));
    }

    #[test]
    fn test_equality_is_canonical() {
        assert_eq!(Quantity::parse("1Ki").unwrap(), Quantity::parse("1024").unwrap());
        assert_eq!(Quantity::parse("1").unwrap(), Quantity::parse("1000m").unwrap());
        assert!(Quantity::parse("2").unwrap() > Quantity::parse("1500m").unwrap());
    }

    #[test]
    fn test_display_and_text() {
        let q = Quantity::parse("0.5").unwrap();
        assert_eq!(q.as_str(), "0.5");
        assert_eq!(q.to_string(), "500m");
        assert_eq!(Quantity::parse("2000m").unwrap().to_string(), "2");
    }

    #[test]
    fn test_serde_round_trip() {
        let q: Quantity = serde_json::from_str("\"512Mi\"").unwrap();
        assert_eq!(q.as_str(), "512Mi");
        assert_eq!(serde_json::to_string(&q).unwrap(), "\"512Mi\"");

        let err = serde_json::from_str::<Quantity>("\"abc\"");
        assert!(err.is_err());
    }
}
