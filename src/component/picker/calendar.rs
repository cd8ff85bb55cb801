//! Month grid shown by the date step of a picker.

use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use ratatui::{
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
};

use crate::libs::{format, value::DateValue};

/// Decorates one day cell: `(day, selected, day_in_current_month, default span)`
pub(crate) type DayRenderer =
    Arc<dyn Fn(&DateValue, &DateValue, bool, Span<'static>) -> Span<'static> + Send + Sync>;

/// The weeks covering the month of `month_of`, each starting on `week_start`.
///
/// Leading and trailing days of the neighbouring months fill the first and
/// last week.
pub(super) fn month_grid(month_of: NaiveDate, week_start: Weekday) -> Vec<Vec<NaiveDate>> {
    let Some(first) = month_of.with_day(1) else {
        return vec![];
    };
    let lead = (7 + first.weekday().num_days_from_monday() - week_start.num_days_from_monday()) % 7;
    let days_in_month = first
        .iter_days()
        .take_while(|d| d.month() == first.month())
        .count();
    let weeks = (lead as usize + days_in_month).div_ceil(7);
    let Some(start) = first.checked_sub_days(Days::new(u64::from(lead))) else {
        return vec![];
    };
    start
        .iter_days()
        .take(weeks * 7)
        .collect::<Vec<_>>()
        .chunks(7)
        .map(<[NaiveDate]>::to_vec)
        .collect()
}

fn weekday_header(week_start: Weekday) -> String {
    std::iter::successors(Some(week_start), |d| Some(d.succ()))
        .take(7)
        .map(|d| match d {
            Weekday::Sun => "Su",
            Weekday::Mon => "Mo",
            Weekday::Tue => "Tu",
            Weekday::Wed => "We",
            Weekday::Thu => "Th",
            Weekday::Fri => "Fr",
            Weekday::Sat => "Sa",
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub(super) struct Calendar<'a> {
    /// The highlighted cell; its month is the one shown
    pub cursor: DateValue,
    pub selected: DateValue,
    pub week_start: Weekday,
    pub is_disabled: &'a dyn Fn(&DateValue) -> bool,
    pub day_renderer: Option<&'a DayRenderer>,
}

impl Calendar<'_> {
    pub(super) fn lines(&self) -> Vec<Line<'static>> {
        let Some(cursor) = self.cursor.naive() else {
            return vec![];
        };
        let month = cursor.date();

        let mut lines = vec![
            Line::from(format::format(&cursor, "MMMM YYYY")).bold(),
            Line::from(weekday_header(self.week_start)).dark_gray(),
        ];

        for week in month_grid(month, self.week_start) {
            let mut spans = Vec::with_capacity(13);
            for (i, day) in week.into_iter().enumerate() {
                if i > 0 {
                    spans.push(Span::raw(" "));
                }
                spans.push(self.day_span(day, day.month() == month.month()));
            }
            lines.push(Line::from(spans));
        }
        lines
    }

    fn day_span(&self, day: NaiveDate, in_month: bool) -> Span<'static> {
        let value = self.cursor.with_date(day);
        let mut style = Style::default();
        if !in_month {
            style = style.fg(Color::DarkGray);
        }
        if (self.is_disabled)(&value) {
            style = style.fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT);
        }
        if self.selected.date() == Some(day) {
            style = style.fg(Color::Black).bg(Color::Cyan);
        }
        if self.cursor.date() == Some(day) {
            style = style
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }

        let span = Span::styled(format!("{:>2}", day.day()), style);
        match self.day_renderer {
            Some(renderer) => renderer(&value, &self.selected, in_month, span),
            None => span,
        }
    }
}
