use tracing::error;

use crate::{
    component::{input::InputAction, picker::PickerAction},
    page::{demo::DemoAction, help_popup::HelpPopupAction},
    utils::help_msg::HelpMsg,
};

#[derive(Clone, Debug)]
pub enum Action {
    Tick,
    Render,
    Quit,
    Suspend,
    Resume,

    Layer(LayerManageAction),

    Demo(DemoAction),
    HelpPopup(HelpPopupAction),

    /// An action addressed to the component with the given id
    Comp((CompAction, u64)),
}

#[derive(Clone, Debug)]
pub enum CompAction {
    Input(InputAction),
    Picker(PickerAction),
}

/// Layers the [`crate::app::App`] knows how to build
#[derive(Clone, Debug, strum::Display)]
pub enum Layers {
    Demo,
    Help(HelpMsg),
}

#[derive(Clone, Debug)]
pub struct TargetLayer {
    pub layer: Layers,
    /// Whether the layer below keeps rendering
    pub render_self: bool,
}

#[derive(Clone, Debug)]
pub enum LayerManageAction {
    Push(TargetLayer),
    Pop,
}

impl From<LayerManageAction> for Action {
    fn from(value: LayerManageAction) -> Self {
        Action::Layer(value)
    }
}

#[derive(Clone, Debug)]
pub struct ActionSender(pub tokio::sync::mpsc::UnboundedSender<Action>);

impl ActionSender {
    pub fn send<T: Into<Action>>(&self, action: T) {
        if let Err(e) = self.0.send(action.into()) {
            error!(
                "Action receiver is dropped, which should not happen while the app is running: {:?}",
                e.0
            );
        }
    }
}
impl From<tokio::sync::mpsc::UnboundedSender<Action>> for ActionSender {
    fn from(value: tokio::sync::mpsc::UnboundedSender<Action>) -> Self {
        ActionSender(value)
    }
}
