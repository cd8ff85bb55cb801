use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use color_eyre::eyre::Result;
use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tracing::{error, info};

use crate::{
    actions::{Action, ActionSender, LayerManageAction, Layers, TargetLayer},
    component::{
        Component,
        input::{InputComp, InputMode},
        picker::{DayRenderer, LabelFn, PickerAction, PickerComp, PickerKind},
    },
    config::PickerConfig,
    libs::{
        picker::{PickerController, PickerOptions},
        value::{DateInput, DateValue, ReturnShape, ValueModel},
    },
    tui::Event,
    utils::help_msg::{HelpEntry, HelpMsg},
};

use super::{EventLoopParticipant, Layer, WidgetExt};

/// Value pushed to every picker by the "change all values" key
const OUTSIDE_VALUE: &str = "2015-02-02T12:44";

const SUMMARY_FORMAT: &str = "dddd, MMMM Do YYYY hh:mm A";

/// One shared value, shown through every picker variant.
pub(crate) struct DemoPage {
    tx: ActionSender,
    model: ValueModel,
    invalid_label: String,

    selected: DateValue,
    last_change: Option<String>,

    pickers: Vec<PickerComp>,
    input: InputComp,
    /// Index into `pickers`, `pickers.len()` is the text input
    focus: usize,
}

#[derive(Clone, Debug)]
pub enum DemoAction {
    /// A picker published a value through its `on_change`
    Changed { source: String, value: DateInput },
    ChangeOutside,
    FocusNext,
    FocusPrev,
    StartTextInput,
}

impl From<DemoAction> for Action {
    fn from(value: DemoAction) -> Self {
        Action::Demo(value)
    }
}

impl DemoPage {
    pub fn new(tx: ActionSender, config: &PickerConfig) -> Self {
        Self::with_model(tx, config, config.value_model())
    }

    pub fn with_model(tx: ActionSender, config: &PickerConfig, model: ValueModel) -> Self {
        let selected = model.now();
        let base = PickerOptions::default()
            .invalid_label(Some(config.invalid_label.clone()))
            .invalid_commit(config.invalid_commit);

        let build = |kind: PickerKind, title: &str, options: PickerOptions| {
            let controller = PickerController::new(
                model.clone(),
                options.complete_at(kind.complete_at()),
                &selected.into(),
                publish_to(tx.clone(), title),
            );
            PickerComp::new(tx.clone(), kind, title, controller)
        };

        let week_picker = {
            let controller = PickerController::new(
                model.clone(),
                base.clone().format("MMM Do"),
                &selected.into(),
                publish_week_start(tx.clone(), model.clone()),
            );
            PickerComp::new(tx.clone(), PickerKind::Date, "Week", controller)
                .with_label_fn(week_label(model.clone()))
                .with_day_renderer(week_highlight(model.clone()))
        };

        let pickers = vec![
            build(
                PickerKind::Date,
                "Basic date",
                base.clone().format(config.date_format.clone()),
            ),
            build(
                PickerKind::Time,
                "Basic time",
                base.clone()
                    .format(config.time_format.clone())
                    .return_shape(ReturnShape::Native),
            ),
            build(
                PickerKind::DateTime,
                "Date & time",
                base.clone().format(config.date_time_format.clone()),
            ),
            build(
                PickerKind::DateTime,
                "Custom date & time (no future)",
                base.clone()
                    .format("YYYY/MM/DD HH:mm")
                    .auto_ok(true)
                    .disable_future(true)
                    .return_shape(ReturnShape::Iso),
            ),
            week_picker,
            build(
                PickerKind::DateTime,
                "Marked days (1st & 15th)",
                base.clone()
                    .format(config.date_time_format.clone())
                    .return_shape(ReturnShape::Epoch),
            )
            .with_day_renderer(marked_days()),
        ];

        Self {
            input: InputComp::new(rand::random(), tx.clone(), "Type a date (ISO 8601)"),
            tx,
            model,
            invalid_label: config.invalid_label.clone(),
            selected,
            last_change: None,
            pickers,
            focus: 0,
        }
    }

    fn focus_len(&self) -> usize {
        self.pickers.len() + 1
    }

    fn capturing(&self) -> Option<&dyn Component> {
        self.pickers
            .iter()
            .map(|p| p as &dyn Component)
            .chain(std::iter::once(&self.input as &dyn Component))
            .find(|c| c.is_capturing())
    }

    fn send_focus(&self, index: usize, focused: bool) {
        match self.pickers.get(index) {
            Some(picker) => self
                .tx
                .send(picker.get_action(PickerAction::SetFocus(focused))),
            None => self.tx.send(self.input.get_switch_mode_action(if focused {
                InputMode::Focused
            } else {
                InputMode::Idle
            })),
        }
    }

    fn move_focus(&mut self, to: usize) {
        self.send_focus(self.focus, false);
        self.focus = to % self.focus_len();
        self.send_focus(self.focus, true);
    }

    /// Make `value` the shared value and push it into every picker
    fn set_all(&mut self, value: &DateInput) {
        self.selected = self.model.normalize(value);
        for picker in &self.pickers {
            self.tx.send(picker.get_action(PickerAction::SetValue(
                self.selected.into(),
            )));
        }
    }

    fn handle_demo_action(&mut self, action: DemoAction) {
        match action {
            DemoAction::Changed { source, value } => {
                info!("{source} changed to {value:?}");
                self.last_change = Some(format!("{source} -> {}", describe(&value)));
                self.set_all(&value);
            }
            DemoAction::ChangeOutside => {
                info!("Changing every picker to {OUTSIDE_VALUE}");
                self.last_change = Some(format!("outside -> {OUTSIDE_VALUE}"));
                self.set_all(&OUTSIDE_VALUE.into());
            }
            DemoAction::FocusNext => self.move_focus(self.focus + 1),
            DemoAction::FocusPrev => self.move_focus(self.focus + self.focus_len() - 1),
            DemoAction::StartTextInput => {
                if self.focus != self.pickers.len() {
                    self.move_focus(self.pickers.len());
                }
                self.tx
                    .send(self.input.get_switch_mode_action(InputMode::Inputting));
            }
        }
    }

    fn get_help_msg(&self) -> HelpMsg {
        if let Some(component) = self.capturing_help() {
            return component;
        }
        let mut msg: HelpMsg = vec![
            HelpEntry::new(KeyCode::Tab, "Next picker"),
            HelpEntry::new(KeyCode::BackTab, "Previous picker"),
            HelpEntry::new('c', "Change all values"),
            HelpEntry::new('i', "Type a date"),
            HelpEntry::new('?', "Help"),
            HelpEntry::new('q', "Quit"),
        ]
        .into();
        match self.pickers.get(self.focus) {
            Some(picker) => msg.extend(&picker.get_help_msg()),
            None => msg.extend(&self.input.get_help_msg()),
        }
        msg
    }

    fn capturing_help(&self) -> Option<HelpMsg> {
        if self.input.is_capturing() {
            return Some(self.input.get_help_msg());
        }
        self.pickers
            .iter()
            .find(|p| p.is_capturing())
            .map(PickerComp::get_help_msg)
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect) {
        let selected = self
            .model
            .format(&self.selected, SUMMARY_FORMAT, Some(&self.invalid_label));
        let lines = vec![
            Line::from(vec!["Selected: ".bold(), Span::raw(selected)]),
            Line::from(vec![
                "Last change: ".bold(),
                Span::raw(self.last_change.as_deref().unwrap_or("none")),
            ]),
        ];
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(env!("CARGO_PKG_NAME")),
        );
        frame.render_widget(paragraph, area);
    }
}

/// `on_change` of a regular picker: report the published value to the page
fn publish_to(tx: ActionSender, source: &str) -> Box<dyn FnMut(DateInput) + Send + Sync> {
    let source = source.to_string();
    Box::new(move |value| {
        tx.send(DemoAction::Changed {
            source: source.clone(),
            value,
        })
    })
}

/// `on_change` of the week picker: report the first day of the chosen week
fn publish_week_start(
    tx: ActionSender,
    model: ValueModel,
) -> Box<dyn FnMut(DateInput) + Send + Sync> {
    Box::new(move |value| {
        let start = model
            .week_range(&model.normalize(&value))
            .map(|week| week.start())
            .unwrap_or_default();
        tx.send(DemoAction::Changed {
            source: "Week".to_string(),
            value: start.into(),
        })
    })
}

fn week_label(model: ValueModel) -> LabelFn {
    Arc::new(move |value, invalid_label| match model.week_range(value) {
        Some(week) => week.start().format("[Week of] MMM Do", invalid_label),
        None => invalid_label.to_string(),
    })
}

fn week_highlight(model: ValueModel) -> DayRenderer {
    Arc::new(move |day, selected, _in_month, span| {
        let Some(week) = model.week_range(selected) else {
            return span;
        };
        if !week.contains(day) {
            return span;
        }
        let mut style = span.style.bg(Color::Blue).fg(Color::White);
        if week.is_first_day(day) || week.is_last_day(day) {
            style = style.add_modifier(Modifier::BOLD);
        }
        Span::styled(span.content, style)
    })
}

fn marked_days() -> DayRenderer {
    Arc::new(|day, _selected, in_month, span| {
        let marked = day.date().is_some_and(|d| matches!(d.day(), 1 | 15));
        if in_month && marked {
            Span::styled(
                span.content,
                span.style.fg(Color::Magenta).add_modifier(Modifier::UNDERLINED),
            )
        } else {
            span
        }
    })
}

fn describe(value: &DateInput) -> String {
    match value {
        DateInput::Value(v) => format!("value {v}"),
        DateInput::Native(t) => format!("native {}", DateTime::<Utc>::from(*t).to_rfc3339()),
        DateInput::Iso(s) => format!("iso {s}"),
        DateInput::Epoch(ms) => format!("epoch {ms}"),
    }
}

impl EventLoopParticipant for DemoPage {
    fn handle_events(&self, event: &Event) -> Result<()> {
        if let Some(component) = self.capturing() {
            return component.handle_events(event);
        }

        if let Event::Key(key) = event {
            match key.code {
                KeyCode::Char('q') => {
                    self.tx.send(Action::Quit);
                    return Ok(());
                }
                KeyCode::Char('?') => {
                    self.tx.send(LayerManageAction::Push(TargetLayer {
                        layer: Layers::Help(self.get_help_msg()),
                        render_self: true,
                    }));
                    return Ok(());
                }
                KeyCode::Char('c') => {
                    self.tx.send(DemoAction::ChangeOutside);
                    return Ok(());
                }
                KeyCode::Char('i') => {
                    self.tx.send(DemoAction::StartTextInput);
                    return Ok(());
                }
                KeyCode::Tab => {
                    self.tx.send(DemoAction::FocusNext);
                    return Ok(());
                }
                KeyCode::BackTab => {
                    self.tx.send(DemoAction::FocusPrev);
                    return Ok(());
                }
                _ => {}
            }
        }

        for picker in &self.pickers {
            picker.handle_events(event)?;
        }
        self.input.handle_events(event)
    }

    fn update(&mut self, action: Action) {
        match action {
            Action::Demo(action) => self.handle_demo_action(action),
            Action::Comp(_) => {
                if let Some(text) = self.input.parse_submit_action(&action) {
                    info!("Text input submitted: {text}");
                    self.last_change = Some(format!("text input -> {text}"));
                    self.set_all(&text.into());
                }
                for picker in &mut self.pickers {
                    if let Err(e) = picker.update(&action) {
                        error!("Picker {} failed to handle {action:?}: {e}", picker.get_id());
                    }
                }
                if let Err(e) = self.input.update(&action) {
                    error!("Input {} failed to handle {action:?}: {e}", self.input.get_id());
                }
            }
            _ => {}
        }
    }
}

impl Layer for DemoPage {
    fn init(&mut self) {
        self.send_focus(self.focus, true);
    }
}

impl WidgetExt for DemoPage {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [summary, grid, input_area, _, help_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(9),
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(area);

        self.render_summary(frame, summary);

        let cells = Layout::vertical([Constraint::Length(3); 3])
            .split(grid)
            .iter()
            .flat_map(|row| {
                Layout::horizontal([Constraint::Percentage(50); 2])
                    .split(*row)
                    .to_vec()
            })
            .collect::<Vec<_>>();
        for (picker, cell) in self.pickers.iter_mut().zip(cells) {
            picker.render(frame, cell);
        }

        self.input.render(frame, input_area);
        self.get_help_msg().render(frame, help_area);

        if let Some(open) = self.pickers.iter().find(|p| p.is_capturing()) {
            open.render_overlay(frame, area);
        }
    }
}

#[cfg(test)]
mod test {
    use ratatui::{Terminal, backend::TestBackend};
    use tokio::sync::mpsc::UnboundedReceiver;

    use crate::{
        config::Config,
        libs::{
            picker::Rejection,
            value::test_utils::{utc_model, ymd, ymd_hm},
        },
        utils::key_events::test_utils::{get_char_evt, get_key_evt},
    };

    use super::*;

    fn page() -> (DemoPage, UnboundedReceiver<Action>) {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let config = Config::new(None).unwrap();
        let mut page = DemoPage::with_model(tx.into(), &config.picker, utc_model());
        page.init();
        while let Ok(action) = rx.try_recv() {
            page.update(action);
        }
        (page, rx)
    }

    fn feed(page: &mut DemoPage, rx: &mut UnboundedReceiver<Action>, events: &[Event]) {
        for event in events {
            page.event_loop_once(rx, event.clone());
        }
    }

    fn labels(page: &DemoPage) -> Vec<String> {
        page.pickers.iter().map(PickerComp::label).collect()
    }

    #[test]
    fn test_starts_at_now() {
        let (page, _rx) = page();
        assert_eq!(page.selected, ymd_hm(2024, 3, 14, 9, 30));
        assert_eq!(
            labels(&page),
            vec![
                "March 14th",
                "09:30 AM",
                "March 14th 09:30 am",
                "2024/03/14 09:30",
                "Week of Mar 10th",
                "March 14th 09:30 am",
            ]
        );
    }

    #[test]
    fn test_change_outside_updates_every_picker() {
        let (mut page, mut rx) = page();
        feed(&mut page, &mut rx, &[get_char_evt('c')]);
        assert_eq!(page.selected, ymd_hm(2015, 2, 2, 12, 44));
        assert_eq!(
            labels(&page),
            vec![
                "February 2nd",
                "12:44 PM",
                "February 2nd 12:44 pm",
                "2015/02/02 12:44",
                "Week of Feb 1st",
                "February 2nd 12:44 pm",
            ]
        );
        assert_eq!(page.last_change.as_deref(), Some("outside -> 2015-02-02T12:44"));
    }

    #[test]
    fn test_commit_propagates_to_all() {
        let (mut page, mut rx) = page();
        feed(
            &mut page,
            &mut rx,
            &[
                get_key_evt(KeyCode::Enter),
                get_key_evt(KeyCode::Left),
                get_char_evt(' '),
                get_key_evt(KeyCode::Enter),
            ],
        );
        assert_eq!(page.selected, ymd_hm(2024, 3, 13, 9, 30));
        assert_eq!(
            labels(&page),
            vec![
                "March 13th",
                "09:30 AM",
                "March 13th 09:30 am",
                "2024/03/13 09:30",
                "Week of Mar 10th",
                "March 13th 09:30 am",
            ]
        );
    }

    #[test]
    fn test_focus_moves_with_tab() {
        let (mut page, mut rx) = page();
        feed(&mut page, &mut rx, &[get_key_evt(KeyCode::Tab)]);
        assert_eq!(page.focus, 1);

        // Enter now opens the time picker, not the date picker
        feed(&mut page, &mut rx, &[get_key_evt(KeyCode::Enter)]);
        assert!(!page.pickers[0].is_capturing());
        assert!(page.pickers[1].is_capturing());

        // while open, Tab belongs to the picker
        feed(&mut page, &mut rx, &[get_key_evt(KeyCode::Tab)]);
        assert_eq!(page.focus, 1);
        feed(&mut page, &mut rx, &[get_key_evt(KeyCode::Esc)]);

        feed(&mut page, &mut rx, &[get_key_evt(KeyCode::BackTab)]);
        feed(&mut page, &mut rx, &[get_key_evt(KeyCode::BackTab)]);
        assert_eq!(page.focus, page.pickers.len());
    }

    #[test]
    fn test_week_picker_reports_week_start() {
        let (mut page, mut rx) = page();
        let mut events = vec![get_key_evt(KeyCode::Tab); 4];
        events.extend([
            get_key_evt(KeyCode::Enter),
            get_key_evt(KeyCode::Right),
            get_char_evt(' '),
            get_key_evt(KeyCode::Enter),
        ]);
        feed(&mut page, &mut rx, &events);
        assert_eq!(page.selected, ymd(2024, 3, 10));
        assert_eq!(page.pickers[0].label(), "March 10th");
        assert_eq!(page.pickers[4].label(), "Week of Mar 10th");
    }

    #[test]
    fn test_custom_picker_refuses_future_and_auto_commits() {
        let (mut page, mut rx) = page();
        let mut events = vec![get_key_evt(KeyCode::Tab); 3];
        events.extend([
            get_key_evt(KeyCode::Enter),
            get_key_evt(KeyCode::Right),
            get_char_evt(' '),
        ]);
        feed(&mut page, &mut rx, &events);
        assert!(page.pickers[3].is_capturing());
        assert!(page.pickers[3].controller().rejection().is_some());

        // back to today, then hour and minute complete the selection
        feed(
            &mut page,
            &mut rx,
            &[
                get_key_evt(KeyCode::Left),
                get_char_evt(' '),
                get_key_evt(KeyCode::Down),
                get_char_evt(' '),
                get_char_evt(' '),
            ],
        );
        assert!(!page.pickers[3].is_capturing());
        assert_eq!(page.selected, ymd_hm(2024, 3, 14, 8, 30));
        assert!(
            page.last_change
                .as_deref()
                .is_some_and(|s| s.starts_with("Custom date & time (no future) -> iso 2024-03-14T08:30"))
        );
    }

    #[test]
    fn test_custom_picker_keeps_typed_future_date_unpublished() {
        let (mut page, mut rx) = page();
        let mut events = vec![get_char_evt('i')];
        events.extend("2030-01-01".chars().map(get_char_evt));
        events.push(get_key_evt(KeyCode::Enter));
        // input -> basic date -> ... -> custom
        events.extend(vec![get_key_evt(KeyCode::Tab); 4]);
        events.extend([get_key_evt(KeyCode::Enter), get_key_evt(KeyCode::Enter)]);
        feed(&mut page, &mut rx, &events);

        assert_eq!(page.focus, 3);
        assert!(page.pickers[3].is_capturing());
        assert_eq!(
            page.pickers[3].controller().rejection(),
            Some(Rejection::AfterToday)
        );
        assert_eq!(page.selected, ymd(2030, 1, 1));
        assert_eq!(page.last_change.as_deref(), Some("text input -> 2030-01-01"));
    }

    #[test]
    fn test_text_input_sets_all() {
        let (mut page, mut rx) = page();
        let mut events = vec![get_char_evt('i')];
        events.extend("2015-02-02".chars().map(get_char_evt));
        events.push(get_key_evt(KeyCode::Enter));
        feed(&mut page, &mut rx, &events);
        assert_eq!(page.selected, ymd(2015, 2, 2));
        assert_eq!(page.pickers[0].label(), "February 2nd");
        assert_eq!(page.focus, page.pickers.len());
        assert!(!page.input.is_capturing());
    }

    #[test]
    fn test_garbage_text_shows_invalid_label() {
        let (mut page, mut rx) = page();
        let mut events = vec![get_char_evt('i')];
        events.extend("qqq".chars().map(get_char_evt));
        events.push(get_key_evt(KeyCode::Enter));
        feed(&mut page, &mut rx, &events);
        assert!(!page.selected.is_valid());
        assert!(labels(&page).iter().all(|l| l == "Unknown"));
    }

    #[test]
    fn test_quit_and_help_keys() {
        let (page, mut rx) = page();
        page.handle_events(&get_char_evt('q')).unwrap();
        assert!(matches!(rx.try_recv(), Ok(Action::Quit)));

        page.handle_events(&get_char_evt('?')).unwrap();
        let Ok(Action::Layer(LayerManageAction::Push(target))) = rx.try_recv() else {
            panic!("expected a help layer");
        };
        let Layers::Help(msg) = target.layer else {
            panic!("expected a help layer");
        };
        assert!(msg.to_string().contains("Change all values: c"));
        assert!(msg.to_string().ends_with("Open picker: enter"));
    }

    #[test]
    fn test_render() {
        let (mut page, mut rx) = page();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| page.render(f, f.area())).unwrap();
        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Selected: Thursday, March 14th 2024 09:30 AM"));
        assert!(text.contains("Week of Mar 10th"));
        assert!(text.contains("Basic time"));

        feed(&mut page, &mut rx, &[get_key_evt(KeyCode::Enter)]);
        terminal.draw(|f| page.render(f, f.area())).unwrap();
        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Su Mo Tu We Th Fr Sa"));
    }
}
