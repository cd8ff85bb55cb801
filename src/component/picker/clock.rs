//! Hour and minute steps of a picker.

use chrono::{NaiveTime, Timelike};
use ratatui::{
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Segment {
    Hour,
    Minute,
}

/// `HH : MM` with the segment being edited highlighted, and an AM/PM line
pub(super) fn lines(time: NaiveTime, active: Segment) -> Vec<Line<'static>> {
    let highlight = Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let segment = |text: String, seg: Segment| {
        if seg == active {
            Span::styled(text, highlight)
        } else {
            Span::raw(text)
        }
    };

    let (pm, _) = time.hour12();
    vec![
        Line::from(vec![
            segment(format!("{:02}", time.hour()), Segment::Hour),
            Span::raw(" : "),
            segment(format!("{:02}", time.minute()), Segment::Minute),
        ]),
        Line::from(if pm { "PM" } else { "AM" }).dark_gray(),
    ]
}

/// Step the hour, wrapping around midnight without touching the date
pub(super) fn add_hours(time: NaiveTime, delta: i64) -> NaiveTime {
    let hour = (i64::from(time.hour()) + delta).rem_euclid(24) as u32;
    time.with_hour(hour).unwrap_or(time)
}

/// Step the minute, wrapping inside the current hour
pub(super) fn add_minutes(time: NaiveTime, delta: i64) -> NaiveTime {
    let minute = (i64::from(time.minute()) + delta).rem_euclid(60) as u32;
    time.with_minute(minute).unwrap_or(time)
}

#[cfg(test)]
mod test {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_lines_highlight_active_segment() {
        let lines = lines(hm(12, 44), Segment::Minute);
        let text: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "12 : 44");
        assert_eq!(lines[0].spans[0].style.bg, None);
        assert_eq!(lines[0].spans[2].style.bg, Some(Color::Yellow));
        assert_eq!(lines[1].spans[0].content, "PM");
    }

    #[test]
    fn test_wrapping() {
        assert_eq!(add_hours(hm(23, 10), 1), hm(0, 10));
        assert_eq!(add_hours(hm(0, 10), -1), hm(23, 10));
        assert_eq!(add_minutes(hm(9, 58), 5), hm(9, 3));
        assert_eq!(add_minutes(hm(9, 2), -5), hm(9, 57));
    }
}
