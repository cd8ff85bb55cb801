use color_eyre::Result;
use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::{
    actions::{Action, ActionSender, CompAction},
    page::WidgetExt,
    tui::Event,
    utils::help_msg::{HelpEntry, HelpMsg},
    utils::key_events::KeyEvent,
};

/// A single line text input
///
/// Set the mode: send a [`InputComp::get_switch_mode_action()`] Action
///
/// Get value: parse an action with [`InputComp::parse_submit_action`]
#[derive(Clone, Debug)]
pub(crate) struct InputComp {
    id: u64,
    tx: ActionSender,
    input: Input,
    mode: InputMode,

    title: String,
    control_keys: InputCompCtrlKeys,
}

#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub(crate) enum InputMode {
    #[default]
    Idle,
    Focused,
    /// Receives every key until submitted or exited
    Inputting,
}

#[derive(Clone, Debug)]
pub(crate) struct InputCompCtrlKeys {
    enter_keys: Vec<KeyEvent>,
    submit_keys: Vec<KeyEvent>,
    exit_keys: Vec<KeyEvent>,
}

impl Default for InputCompCtrlKeys {
    fn default() -> Self {
        Self {
            enter_keys: vec![KeyCode::Enter.into()],
            submit_keys: vec![KeyCode::Enter.into()],
            exit_keys: vec![KeyCode::Esc.into()],
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum InputAction {
    SwitchMode(InputMode),
    HandleKey(KeyEvent),
    HandlePaste(String),
    /// Leave inputting mode, discarding the text
    DirectExit,
    SubmitExit(String),

    /// the event owner should pay attention to
    Submit(String),
}

impl InputComp {
    pub fn new<K: Into<String>>(id: u64, tx: ActionSender, title: K) -> Self {
        Self {
            id,
            tx,
            input: Input::default(),
            mode: InputMode::default(),
            title: title.into(),
            control_keys: InputCompCtrlKeys::default(),
        }
    }

    pub fn get_switch_mode_action(&self, mode: InputMode) -> Action {
        self.get_action(InputAction::SwitchMode(mode))
    }

    pub fn parse_submit_action(&self, action: &Action) -> Option<String> {
        match self.unwrap_action(action) {
            Some(InputAction::Submit(s)) => Some(s),
            _ => None,
        }
    }

    fn get_action(&self, action: InputAction) -> Action {
        Action::Comp((CompAction::Input(action), self.id))
    }

    fn unwrap_action(&self, action: &Action) -> Option<InputAction> {
        match action {
            Action::Comp((CompAction::Input(action), id)) if *id == self.id => Some(action.clone()),
            _ => None,
        }
    }

    pub fn get_help_msg(&self) -> HelpMsg {
        let mut msg = HelpMsg::default();
        match self.mode {
            InputMode::Idle => {}
            InputMode::Focused => msg.push(HelpEntry::new(
                self.control_keys.enter_keys[0].clone(),
                "Start input",
            )),
            InputMode::Inputting => {
                msg.push(HelpEntry::new(
                    self.control_keys.exit_keys[0].clone(),
                    "Quit input",
                ));
                msg.push(HelpEntry::new(
                    self.control_keys.submit_keys[0].clone(),
                    "Submit input",
                ));
            }
        }
        msg
    }
}

#[cfg(test)]
impl InputComp {
    pub fn mode(&self) -> &InputMode {
        &self.mode
    }
}

impl super::Component for InputComp {
    fn get_id(&self) -> u64 {
        self.id
    }

    fn handle_events(&self, event: &Event) -> Result<()> {
        match self.mode {
            InputMode::Idle => {}
            InputMode::Focused => {
                if let Event::Key(key) = event {
                    if self.control_keys.enter_keys.contains(&(*key).into()) {
                        self.tx
                            .send(self.get_switch_mode_action(InputMode::Inputting));
                    }
                }
            }
            InputMode::Inputting => match event {
                Event::Key(key) => {
                    let key: KeyEvent = (*key).into();
                    if self.control_keys.submit_keys.contains(&key) {
                        self.tx.send(
                            self.get_action(InputAction::SubmitExit(
                                self.input.value().to_string(),
                            )),
                        );
                    } else if self.control_keys.exit_keys.contains(&key) {
                        self.tx.send(self.get_action(InputAction::DirectExit));
                    } else {
                        self.tx.send(self.get_action(InputAction::HandleKey(key)));
                    }
                }
                Event::Paste(s) => self
                    .tx
                    .send(self.get_action(InputAction::HandlePaste(s.clone()))),
                _ => {}
            },
        };
        Ok(())
    }

    fn update(&mut self, action: &Action) -> Result<()> {
        let Some(action) = self.unwrap_action(action) else {
            return Ok(());
        };

        match action {
            InputAction::SwitchMode(input_mode) => {
                self.mode = input_mode;
            }
            InputAction::HandleKey(key_event) => {
                self.input
                    .handle_event(&crossterm::event::Event::Key(key_event.0));
            }
            InputAction::HandlePaste(string) => {
                string.chars().for_each(|c| {
                    self.input.handle(tui_input::InputRequest::InsertChar(c));
                });
            }
            InputAction::SubmitExit(string) => {
                self.input.reset();
                self.mode = InputMode::Focused;
                self.tx.send(self.get_action(InputAction::Submit(string)));
            }
            InputAction::DirectExit => {
                self.input.reset();
                self.mode = InputMode::Focused;
            }
            InputAction::Submit(_) => {}
        }
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.mode == InputMode::Inputting
    }
}

impl WidgetExt for InputComp {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width.max(3) - 3;
        let scroll = self.input.visual_scroll(width as usize);
        let style = match self.mode {
            InputMode::Inputting => Color::Yellow.into(),
            InputMode::Focused => Color::Cyan.into(),
            InputMode::Idle => Style::default(),
        };

        let input_widget = Paragraph::new(self.input.value())
            .style(style)
            .scroll((0, scroll as u16))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(self.title.as_str()),
            );
        frame.render_widget(input_widget, area);

        if self.mode == InputMode::Inputting {
            // Ratatui hides the cursor unless it's explicitly set. Position the cursor past the
            // end of the input text and one line down from the border to the input line
            let x = self.input.visual_cursor().max(scroll) - scroll + 1;
            frame.set_cursor_position((area.x + x as u16, area.y + 1))
        }
    }
}
