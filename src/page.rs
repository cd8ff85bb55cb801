//! Page module handles the UI layers and their behaviors.
//!
//! This module provides traits for managing the layers stacked in the TUI
//! application: rendering, event handling and state updates.

use color_eyre::eyre::Result;
use downcast_rs::{DowncastSync, impl_downcast};
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::actions::Action;
use crate::tui::Event;

pub(crate) mod demo;
pub(crate) mod help_popup;

/// A trait that represents a UI layer/page in the application.
///
/// # Type Requirements
/// - Must implement [`WidgetExt`]
/// - Must implement [`EventLoopParticipant`]
/// - Must implement [`DowncastSync`]
pub trait Layer: WidgetExt + EventLoopParticipant + DowncastSync {
    /// Initialize the page
    fn init(&mut self) {}
}
impl_downcast!(sync Layer);

/// Extension trait for widgets that can be rendered to the screen.
pub(crate) trait WidgetExt {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Trait for components that participate in the event loop.
///
/// Events are turned into actions by [`EventLoopParticipant::handle_events`]
/// (which never mutates), and actions are applied by
/// [`EventLoopParticipant::update`].
pub(crate) trait EventLoopParticipant {
    fn handle_events(&self, event: &Event) -> Result<()>;

    fn update(&mut self, action: Action);

    #[cfg(test)]
    /// Handle one event, then drain and apply every action it caused
    fn event_loop_once(
        &mut self,
        rx: &mut tokio::sync::mpsc::UnboundedReceiver<Action>,
        event: Event,
    ) {
        self.handle_events(&event).unwrap();
        while let Ok(action) = rx.try_recv() {
            self.update(action);
        }
    }
}
