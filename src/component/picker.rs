//! Terminal front-end of a [`PickerController`].
//!
//! The component owns the view state only (cursor and current step); the
//! draft and the committed value stay in the controller.
//!
//! ```text
//!   Date      : [date] ──space──▶ (draft changed)
//!   Time      : [hour] ──space──▶ [minute] ──space──▶ (draft changed)
//!   DateTime  : [date] ──space──▶ [hour] ──space──▶ [minute]
//! ```

mod calendar;
mod clock;

use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tracing::debug;

use crate::{
    actions::{Action, ActionSender, CompAction},
    libs::{
        picker::{PickerController, Transition},
        value::{DEFAULT_INVALID_LABEL, DateInput, DateValue, Precision, Unit},
    },
    page::WidgetExt,
    tui::Event,
    utils::help_msg::{HelpEntry, HelpMsg},
};

pub(crate) use calendar::DayRenderer;

/// Replaces the default text field label: `(committed, invalid_label)`
pub(crate) type LabelFn = Arc<dyn Fn(&DateValue, &str) -> String + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PickerKind {
    Date,
    Time,
    DateTime,
}

impl PickerKind {
    fn first_step(self) -> ViewStep {
        match self {
            PickerKind::Date | PickerKind::DateTime => ViewStep::Date,
            PickerKind::Time => ViewStep::Hour,
        }
    }

    /// The precision at which a selection of this kind is complete
    pub(crate) fn complete_at(self) -> Precision {
        match self {
            PickerKind::Date => Precision::Day,
            PickerKind::Time | PickerKind::DateTime => Precision::Minute,
        }
    }

    fn draft_pattern(self) -> &'static str {
        match self {
            PickerKind::Date => "ddd, MMM Do YYYY",
            PickerKind::Time => "hh:mm A",
            PickerKind::DateTime => "ddd, MMM Do YYYY hh:mm A",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewStep {
    Date,
    Hour,
    Minute,
}

impl ViewStep {
    fn precision(self) -> Precision {
        match self {
            ViewStep::Date => Precision::Day,
            ViewStep::Hour => Precision::Hour,
            ViewStep::Minute => Precision::Minute,
        }
    }

    fn next(self) -> ViewStep {
        match self {
            ViewStep::Date | ViewStep::Minute => self,
            ViewStep::Hour => ViewStep::Minute,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CursorMove {
    Left,
    Right,
    Up,
    Down,
    PrevMonth,
    NextMonth,
}

#[derive(Debug, Clone)]
pub(crate) enum PickerAction {
    SetFocus(bool),
    Open,
    MoveCursor(CursorMove),
    /// Propose the cursor as the new draft
    Select,
    Commit,
    Dismiss,
    /// Replace the committed value without notifying
    SetValue(DateInput),
}

pub(crate) struct PickerComp {
    id: u64,
    tx: ActionSender,
    kind: PickerKind,
    title: String,
    controller: PickerController,

    focused: bool,
    cursor: DateValue,
    step: ViewStep,

    label_fn: Option<LabelFn>,
    day_renderer: Option<DayRenderer>,
}

impl PickerComp {
    pub fn new<T: Into<String>>(
        tx: ActionSender,
        kind: PickerKind,
        title: T,
        controller: PickerController,
    ) -> Self {
        Self {
            id: rand::random(),
            tx,
            kind,
            title: title.into(),
            controller,
            focused: false,
            cursor: DateValue::invalid(),
            step: kind.first_step(),
            label_fn: None,
            day_renderer: None,
        }
    }

    pub fn with_label_fn(self, label_fn: LabelFn) -> Self {
        Self {
            label_fn: Some(label_fn),
            ..self
        }
    }

    pub fn with_day_renderer(self, day_renderer: DayRenderer) -> Self {
        Self {
            day_renderer: Some(day_renderer),
            ..self
        }
    }

    pub fn controller(&self) -> &PickerController {
        &self.controller
    }

    pub fn get_action(&self, action: PickerAction) -> Action {
        Action::Comp((CompAction::Picker(action), self.id))
    }

    fn unwrap_action(&self, action: &Action) -> Option<PickerAction> {
        match action {
            Action::Comp((CompAction::Picker(action), id)) if *id == self.id => {
                Some(action.clone())
            }
            _ => None,
        }
    }

    /// Text shown in the field
    pub fn label(&self) -> String {
        match &self.label_fn {
            Some(label_fn) => {
                let invalid_label = self
                    .controller
                    .options()
                    .invalid_label
                    .as_deref()
                    .unwrap_or(DEFAULT_INVALID_LABEL);
                label_fn(&self.controller.committed(), invalid_label)
            }
            None => self.controller.label(),
        }
    }

    pub fn get_help_msg(&self) -> HelpMsg {
        let mut msg = HelpMsg::default();
        if !self.controller.is_open() {
            if self.focused {
                msg.push(HelpEntry::new(KeyCode::Enter, "Open picker"));
            }
            return msg;
        }
        msg.push(HelpEntry::new_plain("hjkl/arrows", "Move cursor"));
        if self.step == ViewStep::Date {
            msg.push(HelpEntry::new_plain("< >", "Change month"));
        }
        msg.push(HelpEntry::new(' ', "Select"));
        msg.push(HelpEntry::new(KeyCode::Enter, "OK"));
        msg.push(HelpEntry::new(KeyCode::Esc, "Cancel"));
        msg
    }

    fn moved_cursor(&self, movement: CursorMove) -> DateValue {
        let cursor = self.cursor;
        let Some(time) = cursor.time() else {
            return cursor;
        };
        match (self.step, movement) {
            (ViewStep::Date, CursorMove::Left) => cursor.shift_days(-1),
            (ViewStep::Date, CursorMove::Right) => cursor.shift_days(1),
            (ViewStep::Date, CursorMove::Up) => cursor.shift_days(-7),
            (ViewStep::Date, CursorMove::Down) => cursor.shift_days(7),
            (ViewStep::Date, CursorMove::PrevMonth) => cursor.shift_months(-1),
            (ViewStep::Date, CursorMove::NextMonth) => cursor.shift_months(1),
            (ViewStep::Hour, CursorMove::Up | CursorMove::Right) => {
                cursor.with_time(clock::add_hours(time, 1))
            }
            (ViewStep::Hour, CursorMove::Down | CursorMove::Left) => {
                cursor.with_time(clock::add_hours(time, -1))
            }
            (ViewStep::Minute, CursorMove::Right) => cursor.with_time(clock::add_minutes(time, 1)),
            (ViewStep::Minute, CursorMove::Left) => cursor.with_time(clock::add_minutes(time, -1)),
            (ViewStep::Minute, CursorMove::Up) => cursor.with_time(clock::add_minutes(time, 5)),
            (ViewStep::Minute, CursorMove::Down) => cursor.with_time(clock::add_minutes(time, -5)),
            (ViewStep::Hour | ViewStep::Minute, CursorMove::PrevMonth | CursorMove::NextMonth) => {
                cursor
            }
        }
    }

    fn select(&mut self) {
        let candidate = match self.step {
            ViewStep::Minute => self.controller.model().truncate(&self.cursor, Unit::Minute),
            _ => self.cursor,
        };
        let transition = self
            .controller
            .change_draft(&candidate.into(), self.step.precision());
        debug!(id = self.id, ?transition, "Select");
        match transition {
            Transition::DraftChanged => {
                self.step = match (self.kind, self.step) {
                    (PickerKind::DateTime, ViewStep::Date) => ViewStep::Hour,
                    (_, step) => step.next(),
                }
            }
            _ => self.reset_view_if_closed(),
        }
    }

    fn reset_view_if_closed(&mut self) {
        if !self.controller.is_open() {
            self.step = self.kind.first_step();
            self.cursor = DateValue::invalid();
        }
    }

    /// Draws the overlay above everything else while the picker is open
    pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
        let Some(draft) = self.controller.draft() else {
            return;
        };
        let height = match self.step {
            ViewStep::Date => 14,
            ViewStep::Hour | ViewStep::Minute => 8,
        };
        let popup = centered(area, 32, height);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow))
            .title(Line::raw(self.title.as_str()).centered());
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let [header_area, body_area, status_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(inner);

        let invalid_label = self
            .controller
            .options()
            .invalid_label
            .as_deref()
            .unwrap_or(DEFAULT_INVALID_LABEL);
        let header = Line::from(draft.format(self.kind.draft_pattern(), invalid_label)).bold();
        frame.render_widget(
            Paragraph::new(header).alignment(Alignment::Center),
            header_area,
        );

        let body = match (self.step, self.cursor.time()) {
            (ViewStep::Date, _) => {
                let is_disabled = |v: &DateValue| self.controller.check_bounds(v).is_some();
                calendar::Calendar {
                    cursor: self.cursor,
                    selected: draft,
                    week_start: self.controller.model().week_start(),
                    is_disabled: &is_disabled,
                    day_renderer: self.day_renderer.as_ref(),
                }
                .lines()
            }
            (ViewStep::Hour, Some(time)) => clock::lines(time, clock::Segment::Hour),
            (ViewStep::Minute, Some(time)) => clock::lines(time, clock::Segment::Minute),
            (_, None) => vec![],
        };
        frame.render_widget(Paragraph::new(body).alignment(Alignment::Center), body_area);

        let status = match self.controller.rejection() {
            Some(rejection) => Line::from(rejection.to_string()).red(),
            None => Line::from("space: select | enter: OK").dark_gray(),
        };
        frame.render_widget(
            Paragraph::new(status).alignment(Alignment::Center),
            status_area,
        );
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

impl super::Component for PickerComp {
    fn get_id(&self) -> u64 {
        self.id
    }

    fn handle_events(&self, event: &Event) -> Result<()> {
        if !self.focused {
            return Ok(());
        }
        let Event::Key(key) = event else {
            return Ok(());
        };

        let action = if self.controller.is_open() {
            match key.code {
                KeyCode::Left | KeyCode::Char('h') => PickerAction::MoveCursor(CursorMove::Left),
                KeyCode::Right | KeyCode::Char('l') => PickerAction::MoveCursor(CursorMove::Right),
                KeyCode::Up | KeyCode::Char('k') => PickerAction::MoveCursor(CursorMove::Up),
                KeyCode::Down | KeyCode::Char('j') => PickerAction::MoveCursor(CursorMove::Down),
                KeyCode::Char('<') => PickerAction::MoveCursor(CursorMove::PrevMonth),
                KeyCode::Char('>') => PickerAction::MoveCursor(CursorMove::NextMonth),
                KeyCode::Char(' ') => PickerAction::Select,
                KeyCode::Enter => PickerAction::Commit,
                KeyCode::Esc => PickerAction::Dismiss,
                _ => return Ok(()),
            }
        } else {
            match key.code {
                KeyCode::Enter => PickerAction::Open,
                _ => return Ok(()),
            }
        };
        self.tx.send(self.get_action(action));
        Ok(())
    }

    fn update(&mut self, action: &Action) -> Result<()> {
        let Some(action) = self.unwrap_action(action) else {
            return Ok(());
        };

        match action {
            PickerAction::SetFocus(focused) => self.focused = focused,
            PickerAction::Open => {
                if let Transition::Opened = self.controller.open() {
                    self.cursor = self.controller.draft().unwrap_or_default();
                    self.step = self.kind.first_step();
                }
            }
            PickerAction::MoveCursor(movement) => {
                if self.controller.is_open() {
                    self.cursor = self.moved_cursor(movement);
                }
            }
            PickerAction::Select => {
                if self.controller.is_open() {
                    self.select();
                }
            }
            PickerAction::Commit => {
                let transition = self.controller.commit();
                debug!(id = self.id, ?transition, "Commit");
                self.reset_view_if_closed();
            }
            PickerAction::Dismiss => {
                self.controller.dismiss();
                self.reset_view_if_closed();
            }
            PickerAction::SetValue(value) => self.controller.set_value(&value),
        }
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.controller.is_open()
    }
}

impl WidgetExt for PickerComp {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border = match (self.controller.is_open(), self.focused) {
            (true, _) => Style::default().fg(Color::Yellow),
            (false, true) => Style::default().fg(Color::Cyan),
            (false, false) => Style::default(),
        };
        let mut label = Line::from(self.label());
        if !self.controller.committed().is_valid() {
            label = label.dark_gray();
        }
        let field = Paragraph::new(label).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border)
                .title(self.title.as_str()),
        );
        frame.render_widget(field, area);
    }
}

#[cfg(test)]
mod test {
    use std::sync::Mutex;

    use ratatui::{Terminal, backend::TestBackend, text::Span};
    use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

    use crate::{
        component::Component,
        libs::{
            picker::{InvalidCommitPolicy, PickerOptions, Rejection},
            value::test_utils::{utc_model, ymd, ymd_hm},
        },
        utils::key_events::test_utils::{get_char_evt, get_key_evt},
    };

    use super::*;

    type Published = Arc<Mutex<Vec<DateInput>>>;

    struct Harness {
        picker: PickerComp,
        rx: UnboundedReceiver<Action>,
        published: Published,
    }

    impl Harness {
        fn new(kind: PickerKind, options: PickerOptions, value: DateInput) -> Self {
            let (tx, rx) = unbounded_channel();
            let published: Published = Default::default();
            let sink = published.clone();
            let controller = PickerController::new(
                utc_model(),
                options.complete_at(kind.complete_at()),
                &value,
                Box::new(move |v| sink.lock().unwrap().push(v)),
            );
            let mut picker = PickerComp::new(tx.into(), kind, "Picker", controller);
            let focus = picker.get_action(PickerAction::SetFocus(true));
            picker.update(&focus).unwrap();
            Self {
                picker,
                rx,
                published,
            }
        }

        fn feed(&mut self, events: &[Event]) {
            for event in events {
                self.picker.handle_events(event).unwrap();
                while let Ok(action) = self.rx.try_recv() {
                    self.picker.update(&action).unwrap();
                }
            }
        }

        fn published(&self) -> Vec<DateInput> {
            self.published.lock().unwrap().clone()
        }
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_date_pick_and_commit() {
        let mut h = Harness::new(
            PickerKind::Date,
            PickerOptions::default(),
            ymd(2024, 3, 1).into(),
        );
        h.feed(&[
            get_key_evt(KeyCode::Enter),
            get_char_evt('l'),
            get_key_evt(KeyCode::Down),
            get_char_evt(' '),
        ]);
        assert_eq!(h.picker.controller().draft(), Some(ymd(2024, 3, 9)));
        assert!(h.published().is_empty());

        h.feed(&[get_key_evt(KeyCode::Enter)]);
        assert!(!h.picker.is_capturing());
        assert_eq!(h.published(), vec![DateInput::Value(ymd(2024, 3, 9))]);
        assert_eq!(h.picker.label(), "March 9th");
    }

    #[test]
    fn test_month_navigation() {
        let mut h = Harness::new(
            PickerKind::Date,
            PickerOptions::default(),
            ymd(2024, 1, 31).into(),
        );
        h.feed(&[
            get_key_evt(KeyCode::Enter),
            get_char_evt('>'),
            get_char_evt(' '),
            get_key_evt(KeyCode::Enter),
        ]);
        assert_eq!(h.picker.controller().committed(), ymd(2024, 2, 29));
    }

    #[test]
    fn test_date_time_steps() {
        let mut h = Harness::new(
            PickerKind::DateTime,
            PickerOptions::default(),
            ymd_hm(2015, 2, 2, 12, 44).into(),
        );
        h.feed(&[
            get_key_evt(KeyCode::Enter),
            get_key_evt(KeyCode::Right),
            get_char_evt(' '),
        ]);
        assert_eq!(h.picker.step, ViewStep::Hour);
        h.feed(&[get_key_evt(KeyCode::Up), get_char_evt(' ')]);
        assert_eq!(h.picker.step, ViewStep::Minute);
        h.feed(&[get_key_evt(KeyCode::Down), get_char_evt(' ')]);
        assert_eq!(
            h.picker.controller().draft(),
            Some(ymd_hm(2015, 2, 3, 13, 39))
        );
        h.feed(&[get_key_evt(KeyCode::Enter)]);
        assert_eq!(
            h.published(),
            vec![DateInput::Value(ymd_hm(2015, 2, 3, 13, 39))]
        );
        assert_eq!(h.picker.step, ViewStep::Date);
    }

    #[test]
    fn test_time_starts_at_hour() {
        let mut h = Harness::new(
            PickerKind::Time,
            PickerOptions::default(),
            ymd_hm(2015, 2, 2, 12, 44).into(),
        );
        h.feed(&[get_key_evt(KeyCode::Enter)]);
        assert_eq!(h.picker.step, ViewStep::Hour);
        h.feed(&[get_key_evt(KeyCode::Left), get_char_evt(' ')]);
        assert_eq!(
            h.picker.controller().draft(),
            Some(ymd_hm(2015, 2, 2, 11, 44))
        );
    }

    #[test]
    fn test_auto_ok_commits_at_minute() {
        let mut h = Harness::new(
            PickerKind::DateTime,
            PickerOptions::default().auto_ok(true),
            ymd_hm(2015, 2, 2, 12, 44).into(),
        );
        h.feed(&[
            get_key_evt(KeyCode::Enter),
            get_char_evt(' '),
            get_char_evt(' '),
        ]);
        assert!(h.picker.is_capturing());
        assert!(h.published().is_empty());

        h.feed(&[get_char_evt(' ')]);
        assert!(!h.picker.is_capturing());
        assert_eq!(
            h.published(),
            vec![DateInput::Value(ymd_hm(2015, 2, 2, 12, 44))]
        );
    }

    #[test]
    fn test_disable_future_refuses_tomorrow() {
        // the fixed clock reads 2024-03-14 09:30
        let mut h = Harness::new(
            PickerKind::Date,
            PickerOptions::default().disable_future(true),
            ymd(2024, 3, 14).into(),
        );
        h.feed(&[
            get_key_evt(KeyCode::Enter),
            get_key_evt(KeyCode::Right),
            get_char_evt(' '),
        ]);
        assert_eq!(
            h.picker.controller().rejection(),
            Some(Rejection::AfterToday)
        );
        assert_eq!(h.picker.controller().draft(), Some(ymd(2024, 3, 14)));

        let mut terminal = Terminal::new(TestBackend::new(40, 16)).unwrap();
        terminal
            .draw(|f| h.picker.render_overlay(f, f.area()))
            .unwrap();
        assert!(buffer_text(&terminal).contains("date is after today"));

        // still open, nothing published
        h.feed(&[get_key_evt(KeyCode::Enter)]);
        assert!(h.picker.is_capturing());
        assert!(h.published().is_empty());

        h.feed(&[get_key_evt(KeyCode::Left), get_char_evt(' ')]);
        assert_eq!(h.picker.controller().rejection(), None);
        h.feed(&[get_key_evt(KeyCode::Enter)]);
        assert_eq!(h.published(), vec![DateInput::Value(ymd(2024, 3, 14))]);
    }

    #[test]
    fn test_close_silently_on_refused_commit() {
        let mut h = Harness::new(
            PickerKind::Date,
            PickerOptions::default()
                .disable_past(true)
                .invalid_commit(InvalidCommitPolicy::CloseSilently),
            ymd(2024, 3, 14).into(),
        );
        h.feed(&[
            get_key_evt(KeyCode::Enter),
            get_key_evt(KeyCode::Up),
            get_char_evt(' '),
            get_key_evt(KeyCode::Enter),
        ]);
        assert!(!h.picker.is_capturing());
        assert!(h.published().is_empty());
        assert_eq!(h.picker.controller().committed(), ymd(2024, 3, 14));
    }

    #[test]
    fn test_dismiss_keeps_committed() {
        let mut h = Harness::new(
            PickerKind::Date,
            PickerOptions::default(),
            ymd(2024, 3, 1).into(),
        );
        h.feed(&[
            get_key_evt(KeyCode::Enter),
            get_key_evt(KeyCode::Right),
            get_char_evt(' '),
            get_key_evt(KeyCode::Esc),
        ]);
        assert!(!h.picker.is_capturing());
        assert!(h.published().is_empty());
        assert_eq!(h.picker.controller().committed(), ymd(2024, 3, 1));
    }

    #[test]
    fn test_unfocused_ignores_keys() {
        let mut h = Harness::new(
            PickerKind::Date,
            PickerOptions::default(),
            ymd(2024, 3, 1).into(),
        );
        let blur = h.picker.get_action(PickerAction::SetFocus(false));
        h.picker.update(&blur).unwrap();
        h.feed(&[get_key_evt(KeyCode::Enter)]);
        assert!(!h.picker.is_capturing());
        assert!(h.picker.get_help_msg().is_empty());
    }

    #[test]
    fn test_invalid_value_opens_at_now() {
        let mut h = Harness::new(
            PickerKind::Date,
            PickerOptions::default(),
            "not a date".into(),
        );
        assert_eq!(h.picker.label(), "Unknown");
        h.feed(&[get_key_evt(KeyCode::Enter)]);
        assert_eq!(
            h.picker.controller().draft(),
            Some(ymd_hm(2024, 3, 14, 9, 30))
        );
    }

    #[test]
    fn test_set_value_does_not_publish() {
        let mut h = Harness::new(
            PickerKind::Date,
            PickerOptions::default(),
            ymd(2024, 3, 1).into(),
        );
        let set = h
            .picker
            .get_action(PickerAction::SetValue("2015-02-02T12:44".into()));
        h.picker.update(&set).unwrap();
        assert_eq!(h.picker.label(), "February 2nd");
        assert!(h.published().is_empty());
    }

    #[test]
    fn test_custom_label_and_day_renderer() {
        let h = Harness::new(
            PickerKind::Date,
            PickerOptions::default().invalid_label(Some("Pick one")),
            DateInput::Value(DateValue::invalid()),
        );
        let picker = h.picker.with_label_fn(Arc::new(|value, invalid| {
            format!("<{}>", value.format("YYYY", invalid))
        }));
        assert_eq!(picker.label(), "<Pick one>");

        let picker = picker.with_day_renderer(Arc::new(|_, _, _, span| {
            Span::styled(span.content.replace(' ', "·"), span.style)
        }));
        let mut h = Harness {
            picker,
            rx: h.rx,
            published: h.published,
        };
        h.feed(&[get_key_evt(KeyCode::Enter)]);
        let mut terminal = Terminal::new(TestBackend::new(40, 16)).unwrap();
        terminal
            .draw(|f| h.picker.render_overlay(f, f.area()))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("March 2024"));
        assert!(text.contains("Su Mo Tu We Th Fr Sa"));
        assert!(text.contains("·1"));
    }

    #[test]
    fn test_render_field() {
        let mut h = Harness::new(
            PickerKind::DateTime,
            PickerOptions::default().format("MMMM Do hh:mm a"),
            ymd_hm(2015, 2, 2, 12, 44).into(),
        );
        let mut terminal = Terminal::new(TestBackend::new(30, 3)).unwrap();
        terminal.draw(|f| h.picker.render(f, f.area())).unwrap();
        insta::assert_snapshot!(terminal.backend(), @r#"
        "╭Picker──────────────────────╮"
        "│February 2nd 12:44 pm       │"
        "╰────────────────────────────╯"
        "#);
        assert_eq!(
            terminal.backend().buffer()[(0, 0)].fg,
            Color::Cyan
        );

        h.feed(&[get_key_evt(KeyCode::Enter)]);
        terminal.draw(|f| h.picker.render(f, f.area())).unwrap();
        assert_eq!(
            terminal.backend().buffer()[(0, 0)].fg,
            Color::Yellow
        );
    }

    #[test]
    fn test_help_msg() {
        let mut h = Harness::new(
            PickerKind::Date,
            PickerOptions::default(),
            ymd(2024, 3, 1).into(),
        );
        assert_eq!(h.picker.get_help_msg().to_string(), "Open picker: enter");
        h.feed(&[get_key_evt(KeyCode::Enter)]);
        assert_eq!(
            h.picker.get_help_msg().to_string(),
            "Move cursor: hjkl/arrows | Change month: < > | Select: space | OK: enter | Cancel: esc"
        );
    }
}
