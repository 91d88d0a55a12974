//! Text normalization shared by the adapters and normalizers.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
/// Already normalized date: DD.MM.YYYY.
static DISPLAY_DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
/// ISO date prefix with optional month and day: YYYY[-MM[-DD]].
static ISO_DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})(?:-(\d{1,2})(?:-(\d{1,2}))?)?").expect("valid regex")
});

/// Render a registry date as `DD.MM.YYYY`.
///
/// Accepts `YYYY-MM-DD`, ISO date-times and partial dates (missing month or
/// day default to `01`). Strings already in display form, and strings in no
/// recognizable form, are returned trimmed but otherwise unchanged.
///
/// # Examples
/// ```
/// use egrn_extractor::text::normalize_date;
///
/// assert_eq!(normalize_date("2019-03-07"), "07.03.2019");
/// assert_eq!(normalize_date("2019-03-07T10:15:00+03:00"), "07.03.2019");
/// assert_eq!(normalize_date("07.03.2019"), "07.03.2019");
/// assert_eq!(normalize_date("2019"), "01.01.2019");
/// assert_eq!(normalize_date(""), "");
/// ```
pub fn normalize_date(raw: &str) -> String {
    let value = raw.trim();
    if value.is_empty() || DISPLAY_DATE_PATTERN.is_match(value) {
        return value.to_string();
    }

    let Some(caps) = ISO_DATE_PATTERN.captures(value) else {
        return value.to_string();
    };

    let year = &caps[1];
    let month = caps.get(2).map_or("1", |m| m.as_str());
    let day = caps.get(3).map_or("1", |m| m.as_str());
    format!("{day:0>2}.{month:0>2}.{year}")
}

/// Calendar value of a displayed date, for writers that store real dates.
///
/// Missing parts default to 1, so an empty string is `0001-01-01`.
/// Returns `None` only for impossible dates such as `31.02.2020`.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use egrn_extractor::text::calendar_date;
///
/// assert_eq!(calendar_date("07.03.2019"), NaiveDate::from_ymd_opt(2019, 3, 7));
/// assert_eq!(calendar_date(""), NaiveDate::from_ymd_opt(1, 1, 1));
/// ```
pub fn calendar_date(display: &str) -> Option<NaiveDate> {
    let mut parts = display
        .trim()
        .split('.')
        .map(|part| part.trim().parse::<u32>().ok());

    let day = parts.next().flatten().unwrap_or(1);
    let month = parts.next().flatten().unwrap_or(1);
    let year = parts
        .next()
        .flatten()
        .and_then(|y| i32::try_from(y).ok())
        .unwrap_or(1);

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Title-case every word: the first letter of each run of letters is
/// upper-cased and the rest lower-cased.
///
/// # Examples
/// ```
/// use egrn_extractor::text::title_case;
///
/// assert_eq!(title_case("ИВАНОВ ИВАН ИВАНОВИЧ"), "Иванов Иван Иванович");
/// assert_eq!(title_case("римский-корсаков н.а."), "Римский-Корсаков Н.А.");
/// ```
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut inside_word = false;

    for c in value.chars() {
        if c.is_alphabetic() {
            if inside_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            inside_word = true;
        } else {
            out.push(c);
            inside_word = false;
        }
    }

    out
}

/// Strip surrounding whitespace and fold embedded line breaks into single
/// spaces.
pub fn clean_text(value: &str) -> String {
    value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Comparison key for holder names: NFC, upper case, single spaces.
///
/// Registry exports sometimes carry decomposed Cyrillic (`и` + combining
/// breve instead of `й`), which would otherwise count one person twice.
pub fn holder_key(name: &str) -> String {
    name.nfc()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Parse a registry decimal ("1500", "1500.25", "1 500,25").
pub fn parse_decimal(value: &str) -> Option<f64> {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    compact.parse().ok()
}

/// `Some(value)` unless the value is empty after trimming.
pub fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}
