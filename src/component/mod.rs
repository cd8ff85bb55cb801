//! Reusable widgets that live inside a page.
//!
//! Components are addressed by a random id: every [`CompAction`](crate::actions::CompAction)
//! travels through the action channel tagged with the id of the component it belongs to,
//! so several components of the same type can coexist on one page.

pub(crate) mod input;
pub(crate) mod picker;

use color_eyre::eyre::Result;

use crate::{actions::Action, page::WidgetExt, tui::Event};

pub(crate) trait Component: WidgetExt {
    fn get_id(&self) -> u64;

    fn handle_events(&self, event: &Event) -> Result<()>;

    fn update(&mut self, action: &Action) -> Result<()>;

    /// Whether the component wants every key event, e.g. while typing or
    /// while a picker overlay is open
    fn is_capturing(&self) -> bool {
        false
    }
}
