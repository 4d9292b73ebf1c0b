//! Time types and time-to-expiry computation.
//!
//! This module provides:
//! - `Date`: Type-safe date wrapper around chrono::NaiveDate
//! - `DayCountConvention`: Year fraction conventions
//! - `QuoteDate`: A quote's date column, parsed or kept as raw text
//! - `time_to_expiry`: (quote date, expiry date) → year fraction, with an
//!   explicit policy for dates that fail to parse
//!
//! # Examples
//!
//! ```
//! use pricer_core::types::time::{
//!     time_to_expiry, Date, DayCountConvention, QuoteDate, UnparseableDatePolicy,
//! };
//!
//! let expiry = Date::from_ymd(2024, 12, 30).unwrap();
//! let quote = QuoteDate::parse("2024-06-01");
//!
//! let t = time_to_expiry(
//!     &quote,
//!     expiry,
//!     DayCountConvention::Actual36525,
//!     UnparseableDatePolicy::DefaultToZero,
//! )
//! .unwrap();
//! assert!((t.years() - 212.0 / 365.25).abs() < 1e-12);
//! ```

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::DateError;

/// Type-safe date wrapper around chrono::NaiveDate.
///
/// Provides ISO 8601 serialisation and day-difference arithmetic.
///
/// # Examples
///
/// ```
/// use pricer_core::types::time::Date;
///
/// let date = Date::from_ymd(2024, 6, 15).unwrap();
/// assert_eq!(date.year(), 2024);
///
/// let parsed: Date = "2024-06-15".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let end = Date::from_ymd(2024, 1, 11).unwrap();
/// assert_eq!(end - start, 10);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a Date from year, month, and day components.
    ///
    /// # Returns
    /// `Ok(Date)` if the date is valid, `Err(DateError::InvalidDate)` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::types::time::Date;
    ///
    /// assert!(Date::from_ymd(2024, 2, 29).is_ok());
    /// assert!(Date::from_ymd(2024, 2, 30).is_err());
    /// ```
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Parses a date from ISO 8601 format string (YYYY-MM-DD).
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::types::time::Date;
    ///
    /// assert!(Date::parse("2024-06-15").is_ok());
    /// assert!(Date::parse("not-a-date").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(format!("'{}': {}", s, e)))
    }

    /// Returns the underlying NaiveDate.
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns the date `days` calendar days later (earlier if negative).
    ///
    /// Saturates at chrono's representable range.
    pub fn add_days(self, days: i64) -> Self {
        self.0
            .checked_add_signed(chrono::Duration::days(days))
            .map(Date)
            .unwrap_or(self)
    }

    /// Returns true for Saturday and Sunday.
    pub fn is_weekend(&self) -> bool {
        matches!(
            self.0.weekday(),
            chrono::Weekday::Sat | chrono::Weekday::Sun
        )
    }
}

impl Sub for Date {
    type Output = i64;

    /// Returns the signed number of days between two dates.
    fn sub(self, other: Self) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, DateError> {
        Date::parse(s)
    }
}

impl fmt::Display for Date {
    /// Formats the date as ISO 8601 (YYYY-MM-DD).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Day Count Convention (year fraction convention).
///
/// # Variants
/// - `ActualActual365`: Actual days / 365
/// - `Actual36525`: Actual days / 365.25 (average Julian year)
///
/// The backtester uses `Actual36525`, which measures elapsed calendar
/// time the way a seconds-based difference divided by 365.25 days would.
///
/// # Examples
///
/// ```
/// use pricer_core::types::time::{Date, DayCountConvention};
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let end = Date::from_ymd(2025, 1, 1).unwrap();
///
/// // 366 days in 2024
/// let yf = DayCountConvention::Actual36525.year_fraction_dates(start, end);
/// assert!((yf - 366.0 / 365.25).abs() < 1e-12);
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DayCountConvention {
    /// Actual/365 Fixed: actual_days / 365.0
    ActualActual365,

    /// Actual/365.25: actual_days / 365.25
    #[default]
    Actual36525,
}

impl DayCountConvention {
    /// Returns the standard convention name.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::types::time::DayCountConvention;
    ///
    /// assert_eq!(DayCountConvention::ActualActual365.name(), "ACT/365");
    /// assert_eq!(DayCountConvention::Actual36525.name(), "ACT/365.25");
    /// ```
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::ActualActual365 => "ACT/365",
            DayCountConvention::Actual36525 => "ACT/365.25",
        }
    }

    /// Days in the denominator year.
    #[inline]
    pub fn year_length(&self) -> f64 {
        match self {
            DayCountConvention::ActualActual365 => 365.0,
            DayCountConvention::Actual36525 => 365.25,
        }
    }

    /// Calculates the signed year fraction from `start` to `end`.
    ///
    /// Returns a negative value when `end` is before `start`.
    pub fn year_fraction_dates(&self, start: Date, end: Date) -> f64 {
        (end - start) as f64 / self.year_length()
    }
}

impl FromStr for DayCountConvention {
    type Err = String;

    /// Parses day count convention from string (case-insensitive).
    ///
    /// - ACT/365: "ACT/365", "Actual/365", "A365"
    /// - ACT/365.25: "ACT/365.25", "Actual/365.25", "A36525"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace(['/', ' ', '.'], "").as_str() {
            "ACT365" | "ACTUAL365" | "A365" => Ok(DayCountConvention::ActualActual365),
            "ACT36525" | "ACTUAL36525" | "A36525" => Ok(DayCountConvention::Actual36525),
            _ => Err(format!("Unknown day count convention: {}", s)),
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::{DayCountConvention, QuoteDate, UnparseableDatePolicy};
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    impl Serialize for DayCountConvention {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(self.name())
        }
    }

    impl<'de> Deserialize<'de> for DayCountConvention {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            DayCountConvention::from_str(&s).map_err(de::Error::custom)
        }
    }

    impl Serialize for QuoteDate {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for QuoteDate {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            Ok(QuoteDate::parse(&s))
        }
    }

    impl Serialize for UnparseableDatePolicy {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(self.name())
        }
    }

    impl<'de> Deserialize<'de> for UnparseableDatePolicy {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            UnparseableDatePolicy::from_str(&s).map_err(de::Error::custom)
        }
    }
}

/// The date column of a market quote.
///
/// A quote whose date fails to parse is still a quote: its numeric columns
/// may be fine, and what happens next is decided by an
/// [`UnparseableDatePolicy`]. The raw text is kept so output can echo it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum QuoteDate {
    /// Parsed ISO 8601 date.
    Valid(Date),
    /// Text that did not parse as a date.
    Invalid(String),
}

impl QuoteDate {
    /// Parses a date column. Never fails; see [`QuoteDate::Invalid`].
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::types::time::QuoteDate;
    ///
    /// assert!(QuoteDate::parse("2024-06-01").as_date().is_some());
    /// assert!(QuoteDate::parse("06/01/2024").as_date().is_none());
    /// ```
    pub fn parse(s: &str) -> Self {
        match Date::parse(s) {
            Ok(date) => QuoteDate::Valid(date),
            Err(_) => QuoteDate::Invalid(s.trim().to_string()),
        }
    }

    /// Returns the parsed date, if any.
    pub fn as_date(&self) -> Option<Date> {
        match self {
            QuoteDate::Valid(date) => Some(*date),
            QuoteDate::Invalid(_) => None,
        }
    }
}

impl From<Date> for QuoteDate {
    fn from(date: Date) -> Self {
        QuoteDate::Valid(date)
    }
}

impl fmt::Display for QuoteDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteDate::Valid(date) => write!(f, "{}", date),
            QuoteDate::Invalid(raw) => f.write_str(raw),
        }
    }
}

/// What to do when a quote's date does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnparseableDatePolicy {
    /// Treat time-to-expiry as zero and keep going. The row is priced at
    /// intrinsic value and reported as defaulted.
    #[default]
    DefaultToZero,
    /// Skip the row.
    SkipRow,
}

impl UnparseableDatePolicy {
    /// Returns the configuration name of the policy.
    pub fn name(&self) -> &'static str {
        match self {
            UnparseableDatePolicy::DefaultToZero => "default_to_zero",
            UnparseableDatePolicy::SkipRow => "skip_row",
        }
    }
}

impl FromStr for UnparseableDatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "default_to_zero" | "zero" => Ok(UnparseableDatePolicy::DefaultToZero),
            "skip_row" | "skip" => Ok(UnparseableDatePolicy::SkipRow),
            _ => Err(format!("Unknown unparseable-date policy: {}", s)),
        }
    }
}

impl fmt::Display for UnparseableDatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a time-to-expiry computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeToExpiry {
    /// Year fraction from quote date to expiry; negative once expiry has passed.
    Computed(f64),
    /// The quote date did not parse and the policy substituted zero.
    Defaulted,
}

impl TimeToExpiry {
    /// Year fraction to use for pricing.
    #[inline]
    pub fn years(&self) -> f64 {
        match self {
            TimeToExpiry::Computed(t) => *t,
            TimeToExpiry::Defaulted => 0.0,
        }
    }

    /// True when the quote date is after expiry.
    #[inline]
    pub fn is_past_expiry(&self) -> bool {
        self.years() < 0.0
    }

    /// True when the value was substituted by [`UnparseableDatePolicy::DefaultToZero`].
    #[inline]
    pub fn is_defaulted(&self) -> bool {
        matches!(self, TimeToExpiry::Defaulted)
    }
}

/// Computes the year fraction from a quote date to an expiry date.
///
/// # Errors
/// Returns `DateError::ParseError` only when the quote date is invalid and the
/// policy is [`UnparseableDatePolicy::SkipRow`].
pub fn time_to_expiry(
    quote: &QuoteDate,
    expiry: Date,
    convention: DayCountConvention,
    policy: UnparseableDatePolicy,
) -> Result<TimeToExpiry, DateError> {
    match (quote, policy) {
        (QuoteDate::Valid(date), _) => Ok(TimeToExpiry::Computed(
            convention.year_fraction_dates(*date, expiry),
        )),
        (QuoteDate::Invalid(_), UnparseableDatePolicy::DefaultToZero) => {
            Ok(TimeToExpiry::Defaulted)
        }
        (QuoteDate::Invalid(raw), UnparseableDatePolicy::SkipRow) => {
            Err(DateError::ParseError(format!("'{}' is not a YYYY-MM-DD date", raw)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ymd(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_date_from_ymd_invalid() {
        assert_eq!(
            Date::from_ymd(2023, 2, 29),
            Err(DateError::InvalidDate {
                year: 2023,
                month: 2,
                day: 29
            })
        );
    }

    #[test]
    fn test_date_parse_trims_whitespace() {
        assert_eq!(Date::parse(" 2024-06-01 ").unwrap(), ymd(2024, 6, 1));
    }

    #[test]
    fn test_date_display_round_trips() {
        let date = ymd(2024, 1, 5);
        assert_eq!(date.to_string(), "2024-01-05");
        assert_eq!(date.to_string().parse::<Date>().unwrap(), date);
    }

    #[test]
    fn test_date_add_days_and_weekend() {
        let friday = ymd(2024, 6, 7);
        assert!(!friday.is_weekend());
        assert!(friday.add_days(1).is_weekend());
        assert_eq!(friday.add_days(3), ymd(2024, 6, 10));
        assert_eq!(friday.add_days(-7) - friday, -7);
    }

    #[test]
    fn test_year_fraction_act_36525() {
        let yf = DayCountConvention::Actual36525.year_fraction_dates(
            ymd(2024, 6, 1),
            ymd(2024, 12, 30),
        );
        assert_relative_eq!(yf, 212.0 / 365.25, epsilon = 1e-15);
    }

    #[test]
    fn test_year_fraction_negative_after_expiry() {
        let yf = DayCountConvention::Actual36525.year_fraction_dates(
            ymd(2024, 12, 31),
            ymd(2024, 12, 30),
        );
        assert_relative_eq!(yf, -1.0 / 365.25, epsilon = 1e-15);
    }

    #[test]
    fn test_dcc_from_str() {
        assert_eq!(
            "act/365.25".parse::<DayCountConvention>().unwrap(),
            DayCountConvention::Actual36525
        );
        assert_eq!(
            "A365".parse::<DayCountConvention>().unwrap(),
            DayCountConvention::ActualActual365
        );
        assert!("30/360".parse::<DayCountConvention>().is_err());
    }

    #[test]
    fn test_quote_date_keeps_raw_text() {
        let quote = QuoteDate::parse("yesterday");
        assert_eq!(quote, QuoteDate::Invalid("yesterday".to_string()));
        assert_eq!(quote.to_string(), "yesterday");
    }

    #[test]
    fn test_time_to_expiry_same_day_is_zero() {
        let expiry = ymd(2024, 12, 30);
        let t = time_to_expiry(
            &QuoteDate::Valid(expiry),
            expiry,
            DayCountConvention::Actual36525,
            UnparseableDatePolicy::DefaultToZero,
        )
        .unwrap();
        assert_eq!(t, TimeToExpiry::Computed(0.0));
        assert!(!t.is_past_expiry());
    }

    #[test]
    fn test_time_to_expiry_policies() {
        let expiry = ymd(2024, 12, 30);
        let quote = QuoteDate::parse("bad");

        let defaulted = time_to_expiry(
            &quote,
            expiry,
            DayCountConvention::Actual36525,
            UnparseableDatePolicy::DefaultToZero,
        )
        .unwrap();
        assert!(defaulted.is_defaulted());
        assert_eq!(defaulted.years(), 0.0);

        let skipped = time_to_expiry(
            &quote,
            expiry,
            DayCountConvention::Actual36525,
            UnparseableDatePolicy::SkipRow,
        );
        assert!(matches!(skipped, Err(DateError::ParseError(_))));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "skip-row".parse::<UnparseableDatePolicy>().unwrap(),
            UnparseableDatePolicy::SkipRow
        );
        assert_eq!(
            UnparseableDatePolicy::default(),
            UnparseableDatePolicy::DefaultToZero
        );
        assert!("ignore".parse::<UnparseableDatePolicy>().is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(500))]

            #[test]
            fn prop_year_fraction_antisymmetric(a in 0i64..20_000, b in 0i64..20_000) {
                let base = ymd(2000, 1, 1);
                let (start, end) = (base.add_days(a), base.add_days(b));
                let conv = DayCountConvention::Actual36525;
                prop_assert_eq!(
                    conv.year_fraction_dates(start, end),
                    -conv.year_fraction_dates(end, start)
                );
            }

            #[test]
            fn prop_time_to_expiry_sign_matches_order(offset in -2_000i64..2_000) {
                let expiry = ymd(2024, 12, 30);
                let quote = QuoteDate::Valid(expiry.add_days(offset));
                let t = time_to_expiry(
                    &quote,
                    expiry,
                    DayCountConvention::Actual36525,
                    UnparseableDatePolicy::SkipRow,
                )
                .unwrap();
                prop_assert_eq!(t.is_past_expiry(), offset > 0);
            }
        }
    }
}
