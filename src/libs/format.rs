//! Moment-style display patterns (`MMMM Do`, `hh:mm A`, ...).
//!
//! Only English names are shipped. Text wrapped in `[...]` is copied
//! literally, unknown characters are copied as-is.

use std::fmt::Write;

use chrono::{Datelike, NaiveDateTime};

/// Longest tokens first so that `MMMM` wins over `MM`.
const TOKENS: [&str; 24] = [
    "YYYY", "MMMM", "dddd", "MMM", "ddd", "SSS", "YY", "MM", "Do", "DD", "dd", "HH", "hh", "mm",
    "ss", "M", "D", "d", "H", "h", "m", "s", "A", "a",
];

pub(crate) fn format(dt: &NaiveDateTime, pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut rest = pattern;

    while !rest.is_empty() {
        if let Some(stripped) = rest.strip_prefix('[') {
            match stripped.find(']') {
                Some(end) => {
                    out.push_str(&stripped[..end]);
                    rest = &stripped[end + 1..];
                }
                None => {
                    out.push_str(stripped);
                    rest = "";
                }
            }
            continue;
        }

        if let Some(token) = TOKENS.iter().find(|t| rest.starts_with(**t)) {
            write_token(&mut out, dt, token);
            rest = &rest[token.len()..];
            continue;
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }

    out
}

/// The chrono specifier a moment token maps to
fn chrono_spec(token: &str) -> Option<&'static str> {
    let spec = match token {
        "YYYY" => "%Y",
        "YY" => "%y",
        "MMMM" => "%B",
        "MMM" => "%b",
        "MM" => "%m",
        "M" => "%-m",
        "DD" => "%d",
        "D" => "%-d",
        "dddd" => "%A",
        "ddd" => "%a",
        "d" => "%w",
        "HH" => "%H",
        "H" => "%-H",
        "hh" => "%I",
        "h" => "%-I",
        "mm" => "%M",
        "m" => "%-M",
        "ss" => "%S",
        "s" => "%-S",
        "SSS" => "%3f",
        "A" => "%p",
        "a" => "%P",
        _ => return None,
    };
    Some(spec)
}

fn write_token(out: &mut String, dt: &NaiveDateTime, token: &str) {
    if let Some(spec) = chrono_spec(token) {
        let _ = write!(out, "{}", dt.format(spec));
        return;
    }
    match token {
        "Do" => out.push_str(&ordinal(dt.day())),
        "dd" => out.extend(dt.weekday().to_string().chars().take(2)),
        _ => out.push_str(token),
    }
}

pub(crate) fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
