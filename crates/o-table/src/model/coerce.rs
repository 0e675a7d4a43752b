//! Typed value coercion.
//!
//! Converts an extracted token into a comparable value according to the
//! column's declared type. Coercion never fails: whenever a heuristic does not
//! apply, the original text is returned and compared as text downstream.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, Utc};
use regex::{Captures, Regex};

use super::value::{ColumnType, SortValue};

static ABBREVIATED_MAGNITUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9,.]+)([a-zA-Z]+)").expect("BUG: hardcoded regex is statically valid")
});

static NON_NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^0-9.,\-–]+").expect("BUG: hardcoded regex is statically valid")
});

/// `<Month> <digits> [<year>]`, month name first and no commas. Digits are
/// ASCII only.
static FT_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]{3,})\s([0-9]+)(?:\s([0-9]{4}))?")
        .expect("BUG: hardcoded regex is statically valid")
});

/// Trailing 12-hour clock time such as `1am` or `9.30pm`.
static FT_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\s|^)([0-9]{1,2})(?:\.([0-9]{2}))?(am|pm)$")
        .expect("BUG: hardcoded regex is statically valid")
});

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Coerce an extracted token for a built-in column type.
///
/// `reference_year` is used for dates that name a month without a year.
/// Text and custom types return the token unchanged.
pub fn coerce(text: &str, column_type: &ColumnType, reference_year: i32) -> SortValue {
    if column_type.is_numeric() {
        coerce_number(text)
    } else if *column_type == ColumnType::Date {
        coerce_date(text, reference_year)
    } else {
        SortValue::Text(text.to_string())
    }
}

/// The year assumed for dates without one.
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Extract a number from currency, percentage, abbreviated and range text.
///
/// Returns a finite number, or the original text if no number was found.
pub fn coerce_number(text: &str) -> SortValue {
    let ungrouped = remove_digit_group_separators(text);
    let expanded = expand_abbreviations(&ungrouped);
    let digits = extract_digits_if_found(&expanded);
    match parse_leading_float(&digits) {
        Some(number) => SortValue::Number(number),
        None => SortValue::Text(text.to_string()),
    }
}

/// Remove commas used as digit group separators.
pub fn remove_digit_group_separators(text: &str) -> String {
    text.replace(',', "")
}

/// Multiply each `<digits><unit>` run by its magnitude: `m` is a million,
/// `bn` a billion and `tn` a trillion. Other units multiply by one.
pub fn expand_abbreviations(text: &str) -> String {
    ABBREVIATED_MAGNITUDE
        .replace_all(text, |caps: &Captures<'_>| {
            let digits = &caps[1];
            let exponent = match &caps[2] {
                "m" => 6,
                "bn" => 9,
                "tn" => 12,
                _ => 0,
            };
            match digits.replace(',', "").parse::<f64>() {
                Ok(value) => format!("{}", value * 10f64.powi(exponent)),
                Err(_) => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Keep only digits, `.`, `,`, `-` and `–`, unless that would leave nothing.
pub fn extract_digits_if_found(text: &str) -> String {
    let digits = NON_NUMERIC.replace_all(text, "");
    if digits.is_empty() {
        text.to_string()
    } else {
        digits.into_owned()
    }
}

/// Parse the longest numeric prefix: optional sign, digits with an optional
/// fraction, optional exponent. `"12–20"` parses as `12`.
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

/// A 12-hour clock time converted to 24-hour parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClockTime {
    hour: u32,
    minute: u32,
}

impl ClockTime {
    /// Hour and minute as `hh.mm`, e.g. `13.4` for `1.40pm`.
    fn as_decimal(self) -> f64 {
        f64::from(self.hour) + f64::from(self.minute) / 100.0
    }
}

fn parse_clock_time(text: &str) -> Option<ClockTime> {
    let caps = FT_TIME.captures(text)?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    if !(1..=12).contains(&hour) || minute > 59 {
        return None;
    }
    let hour = match (&caps[3], hour) {
        ("am", 12) => 0,
        ("am", h) => h,
        ("pm", 12) => 12,
        (_, h) => h + 12,
    };
    Some(ClockTime { hour, minute })
}

/// Resolve a month name or prefix (`"Sep"`, `"sept"`) to 1-12.
fn month_number(name: &str) -> Option<u32> {
    let name = name.to_ascii_lowercase();
    MONTH_NAMES
        .iter()
        .position(|month| month.starts_with(&name))
        .map(|index| index as u32 + 1)
}

fn parse_ft_date(text: &str, reference_year: i32) -> Option<NaiveDate> {
    let caps = FT_DATE.captures(text)?;
    let month = month_number(&caps[1])?;
    let digits = &caps[2];

    let (day, year) = match digits.len() {
        1 | 2 => (
            digits.parse().ok()?,
            caps.get(3).and_then(|year| year.as_str().parse().ok()),
        ),
        3 => (1, None),
        _ => (1, digits.get(..4)?.parse().ok()),
    };

    NaiveDate::from_ymd_opt(year.unwrap_or(reference_year), month, day)
}

/// Parse an FT-style date and/or time.
///
/// - A date, with or without a time, becomes UTC epoch milliseconds. The day
///   defaults to the first of the month and the year to `reference_year`.
/// - A time on its own becomes `hour.minute` on the 24-hour clock, so `3pm`
///   is `15` and `1.30am` is `1.3`.
/// - Anything else is returned unchanged.
pub fn coerce_date(text: &str, reference_year: i32) -> SortValue {
    let time = parse_clock_time(text);
    match parse_ft_date(text, reference_year) {
        Some(date) => {
            let (hour, minute) = time.map_or((0, 0), |t| (t.hour, t.minute));
            match date.and_hms_opt(hour, minute, 0) {
                Some(instant) => SortValue::Number(instant.and_utc().timestamp_millis() as f64),
                None => SortValue::Text(text.to_string()),
            }
        }
        None => match time {
            Some(time) => SortValue::Number(time.as_decimal()),
            None => SortValue::Text(text.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(text: &str) -> SortValue {
        coerce_number(text)
    }

    fn epoch(y: i32, m: u32, d: u32, h: u32, min: u32) -> f64 {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis() as f64
    }

    #[test]
    fn test_digit_group_separators() {
        assert_eq!(remove_digit_group_separators("4,000,000"), "4000000");
        assert_eq!(number("1,000"), SortValue::Number(1000.0));
    }

    #[test]
    fn test_expand_abbreviations() {
        assert_eq!(expand_abbreviations("1m"), "1000000");
        assert_eq!(expand_abbreviations("1.2bn"), "1200000000");
        assert_eq!(expand_abbreviations("1tn"), "1000000000000");
        assert_eq!(expand_abbreviations("5m-10m"), "5000000-10000000");
        assert_eq!(expand_abbreviations("12px"), "12");
    }

    #[test]
    fn test_extract_digits() {
        assert_eq!(extract_digits_if_found("Rmb100"), "100");
        assert_eq!(extract_digits_if_found("CFA Fr830"), "830");
        assert_eq!(extract_digits_if_found("HK$12-HK$20"), "12-20");
        assert_eq!(extract_digits_if_found("Some text"), "Some text");
        assert_eq!(extract_digits_if_found("Some text 123"), "123");
    }

    #[test]
    fn test_leading_float() {
        assert_eq!(parse_leading_float("1534956593–1534956620"), Some(1534956593.0));
        assert_eq!(parse_leading_float("123"), Some(123.0));
        assert_eq!(parse_leading_float("-4.5-3"), Some(-4.5));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("2e3x"), Some(2000.0));
        assert_eq!(parse_leading_float("2e"), Some(2.0));
        assert_eq!(parse_leading_float("-"), None);
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float("No numbers"), None);
    }

    #[test]
    fn test_currency_values() {
        assert_eq!(number("$140"), SortValue::Number(140.0));
        assert_eq!(number("£4"), SortValue::Number(4.0));
        assert_eq!(number("Rmb100bn"), SortValue::Number(100e9));
        assert_eq!(number("HK$12"), SortValue::Number(12.0));
        assert_eq!(number("HK$12–HK$20"), SortValue::Number(12.0));
    }

    #[test]
    fn test_number_failure_keeps_original() {
        assert_eq!(number("Some text"), SortValue::Text("Some text".into()));
        assert_eq!(number(""), SortValue::Text(String::new()));
        assert_eq!(number("$-"), SortValue::Text("$-".into()));
        assert_eq!(number("–5"), SortValue::Text("–5".into()));
    }

    #[test]
    fn test_number_is_always_finite() {
        let huge = format!("{}tn", "9".repeat(400));
        match number(&huge) {
            SortValue::Number(n) => assert!(n.is_finite()),
            SortValue::Text(text) => assert_eq!(text, huge),
        }
    }

    #[test]
    fn test_dates() {
        assert_eq!(
            coerce_date("September 12 2012", 2030),
            SortValue::Number(epoch(2012, 9, 12, 0, 0))
        );
        assert_eq!(
            coerce_date("January 2012", 2030),
            SortValue::Number(epoch(2012, 1, 1, 0, 0))
        );
        assert_eq!(
            coerce_date("August 17", 2030),
            SortValue::Number(epoch(2030, 8, 17, 0, 0))
        );
        assert_eq!(
            coerce_date("Sep 3 2001", 2030),
            SortValue::Number(epoch(2001, 9, 3, 0, 0))
        );
    }

    #[test]
    fn test_date_with_time() {
        assert_eq!(
            coerce_date("March 12 2015 1am", 2030),
            SortValue::Number(epoch(2015, 3, 12, 1, 0))
        );
        assert_eq!(
            coerce_date("April 20 2014 1.30pm", 2030),
            SortValue::Number(epoch(2014, 4, 20, 13, 30))
        );
        assert_eq!(
            coerce_date("January 12 2015 3pm", 2030),
            SortValue::Number(epoch(2015, 1, 12, 15, 0))
        );
    }

    #[test]
    fn test_time_only_uses_24_hour_decimal() {
        assert_eq!(coerce_date("1am", 2030), SortValue::Number(1.0));
        assert_eq!(coerce_date("1.30am", 2030), SortValue::Number(1.3));
        assert_eq!(coerce_date("1.40pm", 2030), SortValue::Number(13.4));
        assert_eq!(coerce_date("3pm", 2030), SortValue::Number(15.0));
        assert_eq!(coerce_date("12am", 2030), SortValue::Number(0.0));
        assert_eq!(coerce_date("12.15pm", 2030), SortValue::Number(12.15));
    }

    #[test]
    fn test_unknown_dates_keep_text() {
        assert_eq!(
            coerce_date("Not a known date", 2030),
            SortValue::Text("Not a known date".into())
        );
        assert_eq!(coerce_date("Foo 12", 2030), SortValue::Text("Foo 12".into()));
        assert_eq!(
            coerce_date("February 30 2020", 2030),
            SortValue::Text("February 30 2020".into())
        );
        assert_eq!(coerce_date("13pm", 2030), SortValue::Text("13pm".into()));
    }

    #[test]
    fn test_non_ascii_digits_keep_text() {
        for text in ["May ००", "May ०१२३४", "March ١٢ 2015", "३pm"] {
            assert_eq!(coerce_date(text, 2030), SortValue::Text(text.into()), "{text:?}");
        }
        assert_eq!(number("१२३"), SortValue::Text("१२३".into()));
        assert_eq!(number("£१२m"), SortValue::Text("£१२m".into()));
    }

    #[test]
    fn test_coerce_dispatch() {
        assert_eq!(coerce("£4", &ColumnType::Currency, 2030), SortValue::Number(4.0));
        assert_eq!(coerce("£4", &ColumnType::Text, 2030), SortValue::Text("£4".into()));
        assert_eq!(
            coerce("£4", &ColumnType::Custom("odd".into()), 2030),
            SortValue::Text("£4".into())
        );
    }
}
