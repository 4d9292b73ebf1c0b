//! Column layouts of quote files.

use std::fmt;
use std::str::FromStr;

/// How the rate and volatility columns of a quote file are expressed.
///
/// Both layouts carry four columns in the same order: date, spot, rate,
/// volatility. Column names in the header are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FeedLayout {
    /// Rate and volatility are decimal fractions (0.05 = 5%).
    #[default]
    Standard,
    /// Rate and volatility are percentages (5.0 = 5%), as in terminal exports.
    Percentage,
}

impl FeedLayout {
    /// Divisor that turns a raw rate or volatility into a decimal fraction.
    #[inline]
    pub fn divisor(&self) -> f64 {
        match self {
            FeedLayout::Standard => 1.0,
            FeedLayout::Percentage => 100.0,
        }
    }

    /// Configuration name.
    pub fn name(&self) -> &'static str {
        match self {
            FeedLayout::Standard => "standard",
            FeedLayout::Percentage => "percentage",
        }
    }

    /// Header written by generators for this layout.
    pub fn header(&self) -> [&'static str; 4] {
        match self {
            FeedLayout::Standard => ["Date", "Spot", "Rate", "Vol"],
            FeedLayout::Percentage => ["DATE", "PX_LAST", "US_TREASURY_3M", "VOLATILITY_30D"],
        }
    }
}

impl FromStr for FeedLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" | "decimal" => Ok(FeedLayout::Standard),
            "percentage" | "percent" | "pct" => Ok(FeedLayout::Percentage),
            _ => Err(format!("Unknown feed layout: {}", s)),
        }
    }
}

impl fmt::Display for FeedLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divisors() {
        assert_eq!(FeedLayout::Standard.divisor(), 1.0);
        assert_eq!(FeedLayout::Percentage.divisor(), 100.0);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("pct".parse::<FeedLayout>(), Ok(FeedLayout::Percentage));
        assert_eq!("Standard".parse::<FeedLayout>(), Ok(FeedLayout::Standard));
        assert!("bloomberg".parse::<FeedLayout>().is_err());
        assert_eq!(FeedLayout::Percentage.to_string(), "percentage");
    }
}
