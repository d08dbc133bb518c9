//! Locale-aware number, currency and date formatting.
//!
//! Patterns use the familiar `dd/MM/yyyy HH:mm:ss` (dates) and `#,##0.00`
//! (numbers) notation. Compiled patterns are kept in a [`FormatCache`] that
//! the caller constructs and owns; nothing here is global.
//!
//! ```
//! use latalisa_core::format::{FormatCache, Locale};
//! use chrono::NaiveDate;
//!
//! let cache = FormatCache::new();
//! assert_eq!(cache.format_number(1543.9, "#,##0.00", Locale::Brazil).unwrap(), "1.543,90");
//!
//! let moment = NaiveDate::from_ymd_opt(2021, 9, 7).unwrap().and_hms_opt(10, 15, 0).unwrap();
//! assert_eq!(cache.format_local(&moment, "dd/MM/yyyy HH:mm").unwrap(), "07/09/2021 10:15");
//! ```

use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::{CoreError, Result};

pub const BRAZIL_DATE_TIME_PATTERN: &str = "dd/MM/yyyy HH:mm:ss";
pub const BRAZIL_DATE_PATTERN: &str = "dd/MM/yyyy";
pub const BRAZIL_TIME_PATTERN: &str = "HH:mm:ss";
/// RFC 1123 timestamp, as used in HTTP headers.
pub const RFC1123_PATTERN: &str = "EEE, dd MMM yyyy HH:mm:ss Z";

const CURRENCY_PATTERN: &str = "#,##0.00";

// ============================================================================
// Locale
// ============================================================================

/// Formatting conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    /// Brazilian Portuguese: `1.234,56`, `R$ 1.234,56`, `dd/MM/yyyy`.
    #[default]
    Brazil,
    /// US English: `1,234.56`, `$1,234.56`, `MMM d, yyyy`.
    Us,
}

/// Length of a locale's standard date and time patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateStyle {
    Short,
    #[default]
    Medium,
}

impl Locale {
    pub fn decimal_separator(self) -> char {
        match self {
            Locale::Brazil => ',',
            Locale::Us => '.',
        }
    }

    pub fn grouping_separator(self) -> char {
        match self {
            Locale::Brazil => '.',
            Locale::Us => ',',
        }
    }

    /// Prefix written before currency amounts.
    pub fn currency_prefix(self) -> &'static str {
        match self {
            Locale::Brazil => "R$ ",
            Locale::Us => "$",
        }
    }

    /// The locale's standard date pattern.
    pub fn date_pattern(self, style: DateStyle) -> &'static str {
        match (self, style) {
            (Locale::Brazil, DateStyle::Short) => "dd/MM/yy",
            (Locale::Brazil, DateStyle::Medium) => BRAZIL_DATE_PATTERN,
            (Locale::Us, DateStyle::Short) => "M/d/yy",
            (Locale::Us, DateStyle::Medium) => "MMM d, yyyy",
        }
    }

    /// The locale's standard time pattern.
    pub fn time_pattern(self, style: DateStyle) -> &'static str {
        match (self, style) {
            (Locale::Brazil, DateStyle::Short) => "HH:mm",
            (Locale::Brazil, DateStyle::Medium) => BRAZIL_TIME_PATTERN,
            (Locale::Us, DateStyle::Short) => "h:mm a",
            (Locale::Us, DateStyle::Medium) => "h:mm:ss a",
        }
    }

    /// Language tag, e.g. `pt-BR`.
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::Brazil => "pt-BR",
            Locale::Us => "en-US",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.replace('_', "-").to_ascii_lowercase().as_str() {
            "pt-br" | "pt" => Ok(Locale::Brazil),
            "en-us" | "en" => Ok(Locale::Us),
            _ => Err(CoreError::parse(s, "unknown locale")),
        }
    }
}

// ============================================================================
// Date patterns
// ============================================================================

/// A compiled date/time pattern.
#[derive(Debug, Clone)]
pub struct DatePattern {
    source: String,
    strftime: String,
    items: Vec<Item<'static>>,
}

impl DatePattern {
    /// Compiles a pattern such as `dd/MM/yyyy HH:mm:ss`.
    ///
    /// Supported letters: `y M d H h m s S E a Z X z`. Text in single quotes
    /// is literal and `''` is a quote.
    pub fn compile(pattern: &str) -> Result<Self> {
        let strftime = to_strftime(pattern)?;
        let items = StrftimeItems::new(&strftime)
            .parse_to_owned()
            .map_err(|e| CoreError::pattern(pattern, e.to_string()))?;
        Ok(DatePattern {
            source: pattern.to_string(),
            strftime,
            items,
        })
    }

    /// The pattern as written by the caller.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The equivalent `strftime` specification.
    pub fn strftime(&self) -> &str {
        &self.strftime
    }

    /// Formats a zoned timestamp.
    pub fn format<Tz>(&self, value: &DateTime<Tz>) -> Result<String>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut out = String::new();
        write!(out, "{}", value.format_with_items(self.items.iter()))
            .map_err(|_| CoreError::Format(self.source.clone()))?;
        Ok(out)
    }

    /// Formats a local timestamp; fails if the pattern needs a zone.
    pub fn format_local(&self, value: &NaiveDateTime) -> Result<String> {
        let mut out = String::new();
        write!(out, "{}", value.format_with_items(self.items.iter()))
            .map_err(|_| CoreError::Format(self.source.clone()))?;
        Ok(out)
    }

    /// Parses local date/time text.
    ///
    /// Date-only patterns yield midnight; time-only patterns yield a time on
    /// 1970-01-01.
    pub fn parse(&self, text: &str) -> Result<NaiveDateTime> {
        let text = text.trim();
        NaiveDateTime::parse_from_str(text, &self.strftime)
            .or_else(|_| {
                NaiveDate::parse_from_str(text, &self.strftime).map(|d| d.and_time(NaiveTime::MIN))
            })
            .or_else(|_| {
                NaiveTime::parse_from_str(text, &self.strftime)
                    .map(|t| DateTime::<Utc>::UNIX_EPOCH.date_naive().and_time(t))
            })
            .map_err(|e| CoreError::parse(text, e.to_string()))
    }

    /// Parses text that carries a zone offset (`Z` or `X` in the pattern).
    pub fn parse_zoned(&self, text: &str) -> Result<DateTime<FixedOffset>> {
        DateTime::parse_from_str(text.trim(), &self.strftime)
            .map_err(|e| CoreError::parse(text, e.to_string()))
    }
}

fn to_strftime(pattern: &str) -> Result<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\'' {
            i += 1;
            if chars.get(i) == Some(&'\'') {
                out.push('\'');
                i += 1;
                continue;
            }
            loop {
                match chars.get(i) {
                    None => return Err(CoreError::pattern(pattern, "unterminated quote")),
                    Some('\'') if chars.get(i + 1) == Some(&'\'') => {
                        out.push('\'');
                        i += 2;
                    }
                    Some('\'') => {
                        i += 1;
                        break;
                    }
                    Some(&literal) => {
                        push_literal(&mut out, literal);
                        i += 1;
                    }
                }
            }
            continue;
        }
        if !c.is_ascii_alphabetic() {
            push_literal(&mut out, c);
            i += 1;
            continue;
        }
        let run = chars[i..].iter().take_while(|&&x| x == c).count();
        let spec = match (c, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1) => "%-m",
            ('M', 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', 1) => "%-d",
            ('d', _) => "%d",
            ('H', 1) => "%-H",
            ('H', _) => "%H",
            ('h', 1) => "%-I",
            ('h', _) => "%I",
            ('m', 1) => "%-M",
            ('m', _) => "%M",
            ('s', 1) => "%-S",
            ('s', _) => "%S",
            ('S', 3) => "%3f",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            ('a', _) => "%p",
            ('Z', _) => "%z",
            ('X', _) => "%:z",
            ('z', _) => "%Z",
            _ => {
                return Err(CoreError::pattern(
                    pattern,
                    format!("unsupported field '{}'", c.to_string().repeat(run)),
                ))
            }
        };
        out.push_str(spec);
        i += run;
    }
    Ok(out)
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

// ============================================================================
// Decimal patterns
// ============================================================================

/// A compiled decimal pattern such as `#,##0.00` or `0.###%`.
///
/// Separators in the pattern are always `,` (grouping) and `.` (decimal);
/// the output uses the separators of the [`Locale`] passed to
/// [`format`](DecimalPattern::format).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalPattern {
    source: String,
    prefix: String,
    suffix: String,
    min_integer: usize,
    grouping: Option<usize>,
    min_fraction: usize,
    max_fraction: usize,
    percent: bool,
}

impl DecimalPattern {
    pub fn compile(pattern: &str) -> Result<Self> {
        let positive = pattern.split(';').next().unwrap_or_default();
        let is_body = |c: char| matches!(c, '#' | '0' | ',' | '.');
        let start = positive.find(is_body).ok_or_else(|| {
            CoreError::pattern(pattern, "no digit placeholders")
        })?;
        let end = positive.rfind(is_body).map_or(start, |i| i + 1);
        let (prefix, body, suffix) = (&positive[..start], &positive[start..end], &positive[end..]);

        let (integer, fraction) = match body.split_once('.') {
            Some((_, fraction)) if fraction.contains(['.', ',']) => {
                return Err(CoreError::pattern(pattern, "malformed fraction part"))
            }
            Some((integer, fraction)) => (integer, fraction),
            None => (body, ""),
        };
        let grouping = match integer.rfind(',') {
            Some(i) => {
                let size = integer.len() - i - 1;
                if size == 0 {
                    return Err(CoreError::pattern(pattern, "empty grouping"));
                }
                Some(size)
            }
            None => None,
        };

        Ok(DecimalPattern {
            source: pattern.to_string(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            min_integer: integer.chars().filter(|&c| c == '0').count(),
            grouping,
            min_fraction: fraction.chars().filter(|&c| c == '0').count(),
            max_fraction: fraction.len(),
            percent: prefix.contains('%') || suffix.contains('%'),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Formats `value`, rounding half-to-even at the last fraction digit.
    pub fn format(&self, value: f64, locale: Locale) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            let sign = if value < 0.0 { "-" } else { "" };
            return format!("{sign}{}\u{221e}{}", self.prefix, self.suffix);
        }

        let scaled = if self.percent { value * 100.0 } else { value };
        let digits = format!("{:.*}", self.max_fraction, scaled.abs());
        let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));

        let mut fraction = fraction.to_string();
        while fraction.len() > self.min_fraction && fraction.ends_with('0') {
            fraction.pop();
        }

        let integer = integer.trim_start_matches('0');
        let mut integer = format!("{integer:0>width$}", width = self.min_integer);
        if integer.is_empty() && fraction.is_empty() {
            integer.push('0');
        }
        let negative = scaled < 0.0 && (integer.bytes().any(|b| b != b'0') || fraction.bytes().any(|b| b != b'0'));

        let mut out = String::new();
        if negative {
            out.push('-');
        }
        out.push_str(&self.prefix);
        out.push_str(&group(&integer, self.grouping, locale.grouping_separator()));
        if !fraction.is_empty() {
            out.push(locale.decimal_separator());
            out.push_str(&fraction);
        }
        out.push_str(&self.suffix);
        out
    }

    fn currency(locale: Locale) -> Self {
        DecimalPattern {
            source: CURRENCY_PATTERN.to_string(),
            prefix: locale.currency_prefix().to_string(),
            suffix: String::new(),
            min_integer: 1,
            grouping: Some(3),
            min_fraction: 2,
            max_fraction: 2,
            percent: false,
        }
    }
}

fn group(integer: &str, size: Option<usize>, separator: char) -> String {
    let Some(size) = size else {
        return integer.to_string();
    };
    let len = integer.len();
    let mut out = String::with_capacity(len + len / size);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (len - i) % size == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

/// Formats `value` as money in `locale` (`R$ 1.234,50`, `$1,234.50`).
pub fn format_currency(value: f64, locale: Locale) -> String {
    DecimalPattern::currency(locale).format(value, locale)
}

/// Parses a money or plain decimal amount written in `locale`.
///
/// ```
/// use latalisa_core::format::{parse_currency, Locale};
///
/// assert_eq!(parse_currency("R$ 1.234,50", Locale::Brazil).unwrap(), 1234.5);
/// assert_eq!(parse_currency("-$3.25", Locale::Us).unwrap(), -3.25);
/// ```
pub fn parse_currency(text: &str, locale: Locale) -> Result<f64> {
    let symbol = locale.currency_prefix().trim();
    let normalized: String = text
        .replacen(symbol, "", 1)
        .chars()
        .filter(|c| !c.is_whitespace() && *c != locale.grouping_separator())
        .map(|c| if c == locale.decimal_separator() { '.' } else { c })
        .collect();
    normalized
        .parse::<f64>()
        .map_err(|e| CoreError::parse(text, e.to_string()))
}

/// Like [`parse_currency`], returning `default` on failure.
pub fn parse_currency_or(text: &str, locale: Locale, default: f64) -> f64 {
    parse_currency(text, locale).unwrap_or(default)
}

// ============================================================================
// Cache
// ============================================================================

/// Cache of compiled date and decimal patterns, safe to share across threads.
#[derive(Debug, Default)]
pub struct FormatCache {
    dates: Mutex<HashMap<String, Arc<DatePattern>>>,
    decimals: Mutex<HashMap<String, Arc<DecimalPattern>>>,
}

impl FormatCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache with the Brazilian date, time and date-time patterns compiled.
    pub fn with_brazil_patterns() -> Result<Self> {
        let cache = Self::new();
        for pattern in [BRAZIL_DATE_TIME_PATTERN, BRAZIL_DATE_PATTERN, BRAZIL_TIME_PATTERN] {
            cache.date_pattern(pattern)?;
        }
        Ok(cache)
    }

    /// Returns the compiled date pattern, compiling it on first use.
    pub fn date_pattern(&self, pattern: &str) -> Result<Arc<DatePattern>> {
        let mut dates = self.dates.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(compiled) = dates.get(pattern) {
            return Ok(Arc::clone(compiled));
        }
        let compiled = Arc::new(DatePattern::compile(pattern)?);
        dates.insert(pattern.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Returns the compiled decimal pattern, compiling it on first use.
    pub fn decimal_pattern(&self, pattern: &str) -> Result<Arc<DecimalPattern>> {
        let mut decimals = self.decimals.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(compiled) = decimals.get(pattern) {
            return Ok(Arc::clone(compiled));
        }
        let compiled = Arc::new(DecimalPattern::compile(pattern)?);
        decimals.insert(pattern.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Number of distinct patterns compiled so far (date plus decimal).
    pub fn len(&self) -> usize {
        let dates = self.dates.lock().unwrap_or_else(PoisonError::into_inner).len();
        let decimals = self.decimals.lock().unwrap_or_else(PoisonError::into_inner).len();
        dates + decimals
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn format_number(&self, value: f64, pattern: &str, locale: Locale) -> Result<String> {
        Ok(self.decimal_pattern(pattern)?.format(value, locale))
    }

    pub fn format_date<Tz>(&self, value: &DateTime<Tz>, pattern: &str) -> Result<String>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.date_pattern(pattern)?.format(value)
    }

    pub fn format_local(&self, value: &NaiveDateTime, pattern: &str) -> Result<String> {
        self.date_pattern(pattern)?.format_local(value)
    }

    /// Formats with the locale's standard date and time patterns.
    pub fn format_date_time(
        &self,
        value: &NaiveDateTime,
        style: DateStyle,
        locale: Locale,
    ) -> Result<String> {
        let pattern = format!("{} {}", locale.date_pattern(style), locale.time_pattern(style));
        self.format_local(value, &pattern)
    }

    pub fn parse_date(&self, text: &str, pattern: &str) -> Result<NaiveDateTime> {
        self.date_pattern(pattern)?.parse(text)
    }

    /// Like [`parse_date`](FormatCache::parse_date), returning `default` on failure.
    pub fn parse_date_or(&self, text: &str, pattern: &str, default: NaiveDateTime) -> NaiveDateTime {
        self.parse_date(text, pattern).unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn moment() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 9, 7)
            .unwrap()
            .and_hms_milli_opt(8, 5, 3, 42)
            .unwrap()
    }

    #[test]
    fn number_patterns() {
        let cache = FormatCache::new();
        assert_eq!(cache.format_number(1543.9, "#,##0.00", Locale::Brazil).unwrap(), "1.543,90");
        assert_eq!(cache.format_number(1543.9, "#,##0.00", Locale::Us).unwrap(), "1,543.90");
        assert_eq!(cache.format_number(1234567.0, "#,##0", Locale::Brazil).unwrap(), "1.234.567");
        assert_eq!(cache.format_number(0.5, "0.###", Locale::Us).unwrap(), "0.5");
        assert_eq!(cache.format_number(0.5, "#.##", Locale::Us).unwrap(), ".5");
        assert_eq!(cache.format_number(7.0, "000", Locale::Us).unwrap(), "007");
        assert_eq!(cache.format_number(0.256, "0.0%", Locale::Us).unwrap(), "25.6%");
        assert_eq!(cache.format_number(-12.5, "0.00", Locale::Brazil).unwrap(), "-12,50");
        assert_eq!(cache.format_number(-0.001, "0.00", Locale::Us).unwrap(), "0.00");
    }

    #[test]
    fn optional_digits_still_render_zero() {
        let whole = DecimalPattern::compile("#").unwrap();
        assert_eq!(whole.format(0.0, Locale::Us), "0");
        assert_eq!(whole.format(-0.2, Locale::Us), "0");
        let fraction = DecimalPattern::compile("#.##").unwrap();
        assert_eq!(fraction.format(0.001, Locale::Us), "0");
        assert_eq!(fraction.format(0.25, Locale::Brazil), ",25");
    }

    #[test]
    fn bad_number_patterns() {
        assert!(DecimalPattern::compile("abc").is_err());
        assert!(DecimalPattern::compile("#,.00").is_err());
        assert!(DecimalPattern::compile("0.0.0").is_err());
    }

    #[test]
    fn currency_round_trip() {
        assert_eq!(format_currency(1234.5, Locale::Brazil), "R$ 1.234,50");
        assert_eq!(format_currency(-1.0, Locale::Us), "-$1.00");
        assert_eq!(parse_currency("R$ 1.234,50", Locale::Brazil).unwrap(), 1234.5);
        assert_eq!(parse_currency_or("abc", Locale::Brazil, -1.0), -1.0);
    }

    #[test]
    fn date_patterns() {
        let cache = FormatCache::new();
        let m = moment();
        assert_eq!(cache.format_local(&m, BRAZIL_DATE_TIME_PATTERN).unwrap(), "07/09/2021 08:05:03");
        assert_eq!(cache.format_local(&m, "d/M/yy h:mm a").unwrap(), "7/9/21 8:05 AM");
        assert_eq!(cache.format_local(&m, "yyyy-MM-dd'T'HH:mm:ss.SSS").unwrap(), "2021-09-07T08:05:03.042");
        assert_eq!(cache.format_local(&m, "'o''clock' 100%").unwrap(), "o'clock 100%");
        assert_eq!(
            cache.format_date_time(&m, DateStyle::Medium, Locale::Us).unwrap(),
            "Sep 7, 2021 8:05:03 AM"
        );
    }

    #[test]
    fn zoned_formatting() {
        let cache = FormatCache::new();
        let zoned = crate::dates::brazil_offset().from_local_datetime(&moment()).unwrap();
        assert_eq!(
            cache.format_date(&zoned, RFC1123_PATTERN).unwrap(),
            "Tue, 07 Sep 2021 08:05:03 -0300"
        );
        assert!(cache.format_local(&moment(), RFC1123_PATTERN).is_err());
    }

    #[test]
    fn date_parsing() {
        let cache = FormatCache::new();
        let parsed = cache.parse_date("07/09/2021 08:05:03", BRAZIL_DATE_TIME_PATTERN).unwrap();
        assert_eq!(parsed.date(), moment().date());
        assert_eq!(parsed.time(), NaiveTime::from_hms_opt(8, 5, 3).unwrap());

        let date_only = cache.parse_date("07/09/2021", BRAZIL_DATE_PATTERN).unwrap();
        assert_eq!(date_only.time(), NaiveTime::MIN);

        let time_only = cache.parse_date("08:05:03", BRAZIL_TIME_PATTERN).unwrap();
        assert_eq!(time_only.date(), NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());

        let fallback = DateTime::<Utc>::UNIX_EPOCH.naive_utc();
        assert_eq!(cache.parse_date_or("garbage", BRAZIL_DATE_PATTERN, fallback), fallback);
    }

    #[test]
    fn unsupported_date_fields() {
        assert!(matches!(DatePattern::compile("yyyy Q"), Err(CoreError::Pattern { .. })));
        assert!(DatePattern::compile("'open").is_err());
    }

    #[test]
    fn cache_reuses_compiled_patterns() {
        let cache = FormatCache::with_brazil_patterns().unwrap();
        assert_eq!(cache.len(), 3);
        let a = cache.date_pattern(BRAZIL_DATE_PATTERN).unwrap();
        let b = cache.date_pattern(BRAZIL_DATE_PATTERN).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        cache.decimal_pattern("0.00").unwrap();
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn locale_parsing() {
        assert_eq!("pt_BR".parse::<Locale>().unwrap(), Locale::Brazil);
        assert_eq!("en-US".parse::<Locale>().unwrap(), Locale::Us);
        assert!("fr".parse::<Locale>().is_err());
    }
}
