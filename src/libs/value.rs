//! Date values shared by every picker.
//!
//! - [`DateValue`]: an immutable moment, or the explicit invalid marker
//! - [`DateInput`]: the four shapes accepted from outside (a normalized value,
//!   `SystemTime`, an ISO string, epoch milliseconds)
//! - [`ValueModel`]: the single place that normalizes, formats, truncates and exports
//!
//! ```text
//! DateInput ──┬─ Value(v)   ──────────────────────────────┐
//!             ├─ Native(t)  ── millis ──┐                  │
//!             ├─ Epoch(ms)  ── millis ──┴─ zone wall clock ┼──▶ DateValue
//!             └─ Iso(s)     ── parse (with/without offset) ┘     (valid / invalid)
//! ```
//!
//! Normalization never fails: malformed input of any shape becomes the
//! invalid [`DateValue`], and `normalize(normalize(x)) == normalize(x)`.

use std::{
    fmt::Display,
    str::FromStr,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Local, Months, NaiveDate, NaiveDateTime,
    NaiveTime, SecondsFormat, TimeZone, Timelike, Utc, Weekday,
};
use serde::Deserialize;
use tracing::{instrument, trace};

use super::{
    clock::{Clock, SystemClock},
    format,
};

/// Placeholder shown for invalid values when no label is configured
pub const DEFAULT_INVALID_LABEL: &str = "Unknown";

/// The wall clock that [`DateValue`]s are expressed in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Zone {
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl Zone {
    fn wall_clock(&self, dt: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Zone::Local => dt.with_timezone(&Local).naive_local(),
            Zone::Utc => dt.naive_utc(),
            Zone::Fixed(offset) => dt.with_timezone(offset).naive_local(),
        }
    }

    fn fixed_wall_clock(&self, dt: DateTime<FixedOffset>) -> NaiveDateTime {
        self.wall_clock(dt.with_timezone(&Utc))
    }

    /// Resolve a wall-clock time back to an instant.
    ///
    /// Ambiguous local times take the earlier instant, times that fall in a
    /// DST gap resolve to `None`.
    fn resolve_utc(&self, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Zone::Local => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            Zone::Utc => Some(Utc.from_utc_datetime(naive)),
            Zone::Fixed(offset) => offset
                .from_local_datetime(naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    fn resolve_fixed(&self, naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            Zone::Local => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.fixed_offset()),
            Zone::Utc => Some(Utc.from_utc_datetime(naive).fixed_offset()),
            Zone::Fixed(offset) => offset.from_local_datetime(naive).single(),
        }
    }
}

impl FromStr for Zone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Zone::Local),
            "utc" | "z" => Ok(Zone::Utc),
            other => other
                .parse::<FixedOffset>()
                .map(Zone::Fixed)
                .map_err(|_| format!("Invalid zone \"{s}\", expected local, utc or +hh:mm")),
        }
    }
}

impl TryFrom<String> for Zone {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Zone::Local => write!(f, "local"),
            Zone::Utc => write!(f, "utc"),
            Zone::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

/// Calendar units used for truncation and unit-wise comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Year,
    Month,
    /// A week starting on the given weekday
    Week(Weekday),
    Day,
    Hour,
    Minute,
}

/// How much of a date a candidate value pins down.
///
/// Views report the precision of each selection; `auto_ok` only commits
/// once a selection is at least as precise as the picker requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precision {
    Year,
    Month,
    Day,
    Hour,
    Minute,
}

/// An immutable moment, or the explicit invalid marker.
///
/// Only [`ValueModel::normalize`] and the derived constructions produce
/// values; there is no way to observe a half-built one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateValue(Option<NaiveDateTime>);

impl DateValue {
    pub const fn invalid() -> Self {
        Self(None)
    }

    pub(crate) fn from_naive(naive: NaiveDateTime) -> Self {
        Self(Some(naive))
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    pub fn naive(&self) -> Option<NaiveDateTime> {
        self.0
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.0.map(|dt| dt.date())
    }

    pub fn time(&self) -> Option<NaiveTime> {
        self.0.map(|dt| dt.time())
    }

    pub fn is_same_instant(&self, other: &DateValue) -> bool {
        matches!((self.0, other.0), (Some(a), Some(b)) if a == b)
    }

    pub fn is_before(&self, other: &DateValue) -> bool {
        matches!((self.0, other.0), (Some(a), Some(b)) if a < b)
    }

    pub fn is_after(&self, other: &DateValue) -> bool {
        matches!((self.0, other.0), (Some(a), Some(b)) if a > b)
    }

    /// Whether both values fall into the same `unit`, e.g. the same day
    pub fn is_same_unit(&self, other: &DateValue, unit: Unit) -> bool {
        self.start_of(unit).is_same_instant(&other.start_of(unit))
    }

    pub fn is_before_unit(&self, other: &DateValue, unit: Unit) -> bool {
        self.start_of(unit).is_before(&other.start_of(unit))
    }

    pub fn is_after_unit(&self, other: &DateValue, unit: Unit) -> bool {
        self.start_of(unit).is_after(&other.start_of(unit))
    }

    /// Floor the value to the start of `unit`
    pub fn start_of(&self, unit: Unit) -> DateValue {
        let Some(dt) = self.0 else {
            return *self;
        };
        let date = dt.date();
        let floored = match unit {
            Unit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).map(|d| d.and_time(NaiveTime::MIN)),
            Unit::Month => date.with_day(1).map(|d| d.and_time(NaiveTime::MIN)),
            Unit::Week(first) => {
                let back = (7 + date.weekday().num_days_from_monday()
                    - first.num_days_from_monday())
                    % 7;
                date.checked_sub_signed(Duration::days(i64::from(back)))
                    .map(|d| d.and_time(NaiveTime::MIN))
            }
            Unit::Day => Some(date.and_time(NaiveTime::MIN)),
            Unit::Hour => dt.with_minute(0).and_then(|t| t.with_second(0)).and_then(|t| t.with_nanosecond(0)),
            Unit::Minute => dt.with_second(0).and_then(|t| t.with_nanosecond(0)),
        };
        DateValue(floored)
    }

    /// The last millisecond of `unit`
    pub fn end_of(&self, unit: Unit) -> DateValue {
        let start = self.start_of(unit);
        let Some(start) = start.0 else {
            return start;
        };
        let next = match unit {
            Unit::Year => start.checked_add_months(Months::new(12)),
            Unit::Month => start.checked_add_months(Months::new(1)),
            Unit::Week(_) => start.checked_add_signed(Duration::days(7)),
            Unit::Day => start.checked_add_signed(Duration::days(1)),
            Unit::Hour => start.checked_add_signed(Duration::hours(1)),
            Unit::Minute => start.checked_add_signed(Duration::minutes(1)),
        };
        DateValue(next.and_then(|n| n.checked_sub_signed(Duration::milliseconds(1))))
    }

    pub fn with_date(&self, date: NaiveDate) -> DateValue {
        DateValue(self.0.map(|dt| date.and_time(dt.time())))
    }

    pub fn with_time(&self, time: NaiveTime) -> DateValue {
        DateValue(self.0.map(|dt| dt.date().and_time(time)))
    }

    pub fn shift_days(&self, days: i64) -> DateValue {
        DateValue(
            self.0
                .and_then(|dt| dt.checked_add_signed(Duration::days(days))),
        )
    }

    /// Move by whole months, clamping the day to the end of shorter months
    pub fn shift_months(&self, months: i32) -> DateValue {
        DateValue(self.0.and_then(|dt| {
            let magnitude = Months::new(months.unsigned_abs());
            if months >= 0 {
                dt.checked_add_months(magnitude)
            } else {
                dt.checked_sub_months(magnitude)
            }
        }))
    }

    /// Format with a moment-style pattern, or return `invalid_label`
    pub fn format(&self, pattern: &str, invalid_label: &str) -> String {
        match &self.0 {
            Some(dt) => format::format(dt, pattern),
            None => invalid_label.to_string(),
        }
    }
}

impl Display for DateValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.3f")),
            None => write!(f, "Invalid date"),
        }
    }
}

/// Every shape a picker accepts as a value, and can hand back on change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    Value(DateValue),
    Native(SystemTime),
    Iso(String),
    /// Milliseconds since the Unix epoch
    Epoch(i64),
}

impl From<DateValue> for DateInput {
    fn from(value: DateValue) -> Self {
        DateInput::Value(value)
    }
}
impl From<SystemTime> for DateInput {
    fn from(value: SystemTime) -> Self {
        DateInput::Native(value)
    }
}
impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        DateInput::Iso(value.to_string())
    }
}
impl From<String> for DateInput {
    fn from(value: String) -> Self {
        DateInput::Iso(value)
    }
}
impl From<i64> for DateInput {
    fn from(value: i64) -> Self {
        DateInput::Epoch(value)
    }
}

/// Which [`DateInput`] shape a committed value is published as.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ReturnShape {
    #[default]
    Value,
    Native,
    Iso,
    Epoch,
}

/// An inclusive `[start, end]` week, both ends down to the millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    start: DateValue,
    end: DateValue,
}

impl WeekRange {
    pub fn start(&self) -> DateValue {
        self.start
    }

    #[cfg(test)]
    pub fn end(&self) -> DateValue {
        self.end
    }

    pub fn contains(&self, value: &DateValue) -> bool {
        value.is_same_instant(&self.start)
            || value.is_same_instant(&self.end)
            || (value.is_after(&self.start) && value.is_before(&self.end))
    }

    pub fn is_first_day(&self, value: &DateValue) -> bool {
        value.is_same_unit(&self.start, Unit::Day)
    }

    pub fn is_last_day(&self, value: &DateValue) -> bool {
        value.is_same_unit(&self.end, Unit::Day)
    }
}

/// Normalization and presentation helpers shared by every picker.
#[derive(Debug, Clone)]
pub struct ValueModel {
    zone: Zone,
    week_start: Weekday,
    clock: Arc<dyn Clock>,
}

impl Default for ValueModel {
    fn default() -> Self {
        Self {
            zone: Zone::default(),
            week_start: Weekday::Sun,
            clock: Arc::new(SystemClock),
        }
    }
}

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

impl ValueModel {
    pub fn new(zone: Zone, week_start: Weekday, clock: Arc<dyn Clock>) -> Self {
        Self {
            zone,
            week_start,
            clock,
        }
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub fn week_unit(&self) -> Unit {
        Unit::Week(self.week_start)
    }

    pub fn now(&self) -> DateValue {
        DateValue::from_naive(self.zone.wall_clock(self.clock.now()))
    }

    /// The single entry point for turning outside input into a [`DateValue`]
    #[instrument(level = "trace", skip(self))]
    pub fn normalize(&self, input: &DateInput) -> DateValue {
        let value = match input {
            DateInput::Value(value) => *value,
            DateInput::Native(time) => self.system_time_value(time),
            DateInput::Iso(s) => self.parse_iso(s),
            DateInput::Epoch(ms) => self.epoch_millis_value(*ms),
        };
        if !value.is_valid() {
            trace!("Input normalized to an invalid date");
        }
        value
    }

    pub fn format(&self, value: &DateValue, pattern: &str, invalid_label: Option<&str>) -> String {
        value.format(pattern, invalid_label.unwrap_or(DEFAULT_INVALID_LABEL))
    }

    pub fn truncate(&self, value: &DateValue, unit: Unit) -> DateValue {
        value.start_of(unit)
    }

    /// The week (per the configured first weekday) that `value` falls in
    pub fn week_range(&self, value: &DateValue) -> Option<WeekRange> {
        let unit = self.week_unit();
        let start = value.start_of(unit);
        let end = value.end_of(unit);
        (start.is_valid() && end.is_valid()).then_some(WeekRange { start, end })
    }

    /// Convert a value into the shape a consumer asked for.
    ///
    /// Invalid values, and wall-clock times the zone cannot resolve, come
    /// back as `DateInput::Value(invalid)`.
    pub fn export(&self, value: &DateValue, shape: ReturnShape) -> DateInput {
        self.try_export(value, shape)
            .unwrap_or(DateInput::Value(DateValue::invalid()))
    }

    /// Like [`ValueModel::export`], but `None` for anything that cannot be
    /// published as a valid value
    pub fn try_export(&self, value: &DateValue, shape: ReturnShape) -> Option<DateInput> {
        let naive = value.naive()?;
        let exported = match shape {
            ReturnShape::Value => DateInput::Value(*value),
            ReturnShape::Native => {
                DateInput::Native(SystemTime::from(self.zone.resolve_utc(&naive)?))
            }
            ReturnShape::Iso => DateInput::Iso(
                self.zone
                    .resolve_fixed(&naive)?
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            ReturnShape::Epoch => {
                DateInput::Epoch(self.zone.resolve_utc(&naive)?.timestamp_millis())
            }
        };
        Some(exported)
    }

    fn epoch_millis_value(&self, ms: i64) -> DateValue {
        DateTime::<Utc>::from_timestamp_millis(ms)
            .map(|dt| DateValue::from_naive(self.zone.wall_clock(dt)))
            .unwrap_or_default()
    }

    fn system_time_value(&self, time: &SystemTime) -> DateValue {
        let millis = match time.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_millis()).ok(),
            Err(before) => i64::try_from(before.duration().as_millis())
                .ok()
                .map(|ms| -ms),
        };
        millis
            .map(|ms| self.epoch_millis_value(ms))
            .unwrap_or_default()
    }

    fn parse_iso(&self, input: &str) -> DateValue {
        let s = input.trim();
        if s.is_empty() {
            return DateValue::invalid();
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return DateValue::from_naive(self.zone.fixed_wall_clock(dt));
        }

        if let Some(naive) = NAIVE_DATE_TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        {
            return DateValue::from_naive(naive);
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return DateValue::from_naive(date.and_time(NaiveTime::MIN));
        }

        Self::parse_partial_date(s)
            .map(|date| DateValue::from_naive(date.and_time(NaiveTime::MIN)))
            .unwrap_or_default()
    }

    /// `YYYY-MM` and `YYYY`, which chrono refuses to parse without a day
    fn parse_partial_date(s: &str) -> Option<NaiveDate> {
        let all_digits = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit());
        match s.split_once('-') {
            Some((year, month)) if year.len() == 4 && month.len() == 2 => {
                if !all_digits(year) || !all_digits(month) {
                    return None;
                }
                NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
            }
            None if s.len() == 4 && all_digits(s) => NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1),
            _ => None,
        }
    }
}

impl Default for DateValue {
    fn default() -> Self {
        DateValue::invalid()
    }
}
