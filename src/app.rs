use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tracing::info;

use crate::actions::{Action, ActionSender, Layers};
use crate::app::layer_manager::LayerManager;
use crate::config::Config;
use crate::tui::{self, Event};

pub(crate) mod layer_manager;

pub struct RootState {
    pub should_quit: bool,
    pub action_tx: tokio::sync::mpsc::UnboundedSender<Action>,
    pub action_rx: tokio::sync::mpsc::UnboundedReceiver<Action>,

    pub config: Config,
}

impl RootState {
    pub fn new(config: Config) -> Self {
        let (action_tx, action_rx) = tokio::sync::mpsc::unbounded_channel();
        Self {
            should_quit: false,
            action_tx,
            action_rx,
            config,
        }
    }

    pub fn sender(&self) -> ActionSender {
        self.action_tx.clone().into()
    }
}

pub struct App {
    layers: LayerManager,
    state: RootState,
    tui: tui::Tui,
}

impl App {
    pub fn new(state: RootState, tui: tui::Tui) -> Self {
        let layers = LayerManager::new(&Layers::Demo, &state);
        Self { layers, state, tui }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.tui.enter()?;
        info!("Entered the terminal UI");

        loop {
            let event = self.tui.next().await?;
            self.handle_event(event)?;

            while let Ok(action) = self.state.action_rx.try_recv() {
                self.perform_action(action)?;
            }

            // application exit
            if self.state.should_quit {
                break;
            }
        }

        self.tui.exit()?;
        info!("Left the terminal UI");
        Ok(())
    }

    /// Handle application-wide events, hand the rest to the layers
    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Tick => self.state.action_tx.send(Action::Tick)?,
            Event::Render | Event::Resize(_, _) => self.state.action_tx.send(Action::Render)?,
            Event::Error => self.state.action_tx.send(Action::Quit)?,
            Event::Init | Event::FocusGained | Event::FocusLost => {}
            Event::Key(key)
                if key.code == KeyCode::Char('z') && key.modifiers == KeyModifiers::CONTROL =>
            {
                self.state.action_tx.send(Action::Suspend)?
            }
            Event::Key(_) | Event::Paste(_) => self.layers.handle_event(&event)?,
        };
        Ok(())
    }

    /// Perform an action
    ///
    /// This SHOULD be the only place where the state of the application is changed.
    fn perform_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.state.should_quit = true;
            }
            Action::Tick => {}
            Action::Suspend => {
                info!("Suspending");
                self.tui.suspend()?;
                self.state.action_tx.send(Action::Resume)?;
            }
            Action::Resume => {
                self.tui.resume()?;
                self.tui.clear()?;
                self.state.action_tx.send(Action::Render)?;
            }
            Action::Render => {
                self.tui.draw(|f| self.layers.render(f))?;
            }
            Action::Layer(layer_action) => {
                self.layers.handle_layer_action(&layer_action, &self.state);
                self.state.action_tx.send(Action::Render)?;
            }
            _ => {
                self.layers.handle_action(action);
            }
        }
        Ok(())
    }
}
