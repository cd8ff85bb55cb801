use std::ops::{Deref, DerefMut};

use color_eyre::Result;
use ratatui::Frame;
use tracing::{info, warn};

use crate::{
    actions::{Action, LayerManageAction, Layers},
    page::{Layer, demo::DemoPage, help_popup::HelpPopup},
    tui::Event,
};

use super::RootState;

pub(super) struct BoxedLayer(Box<dyn Layer>);
impl Deref for BoxedLayer {
    type Target = dyn Layer;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}
impl DerefMut for BoxedLayer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.0
    }
}
impl From<Box<dyn Layer>> for BoxedLayer {
    fn from(layer: Box<dyn Layer>) -> Self {
        Self(layer)
    }
}
impl BoxedLayer {
    fn into_layer_config(self, render: bool) -> LayerConfig {
        LayerConfig {
            layer: self,
            render,
        }
    }
}

pub(super) struct LayerConfig {
    layer: BoxedLayer,
    render: bool,
}

impl Deref for LayerConfig {
    type Target = BoxedLayer;

    fn deref(&self) -> &Self::Target {
        &self.layer
    }
}
impl DerefMut for LayerConfig {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.layer
    }
}

/// A stack of layers; only the top one receives events and actions.
pub(super) struct LayerManager {
    layers: Vec<LayerConfig>,
}

impl LayerManager {
    pub(super) fn new(root: &Layers, state: &RootState) -> Self {
        let layer = LayerManager::get_layer(root, state)
            .unwrap_or_else(|| LayerManager::root_layer(state));
        Self {
            layers: vec![layer.into_layer_config(true)],
        }
    }

    pub(super) fn render(&mut self, f: &mut Frame) {
        let area = f.area();
        self.layers
            .iter_mut()
            .filter(|page| page.render)
            .for_each(|page| page.render(f, area));
    }

    pub(super) fn handle_event(&self, event: &Event) -> Result<()> {
        match self.layers.last() {
            Some(top) => top.handle_events(event),
            None => Ok(()),
        }
    }

    /// Handle [`LayerManageAction`] for root app, updating the layer stack
    pub(super) fn handle_layer_action(&mut self, action: &LayerManageAction, state: &RootState) {
        match action {
            LayerManageAction::Push(target) => {
                let Some(layer) = LayerManager::get_layer(&target.layer, state) else {
                    return;
                };
                if let Some(top) = self.layers.last_mut() {
                    top.render = target.render_self;
                }
                self.layers.push(layer.into_layer_config(true));
                info!(
                    "Pushing a {} page, current page will {} render, new layer stack length {}",
                    target.layer,
                    if target.render_self { "still" } else { "not" },
                    self.layers.len()
                );
            }
            LayerManageAction::Pop => {
                self.layers.pop();
                if self.layers.is_empty() {
                    self.layers
                        .push(LayerManager::root_layer(state).into_layer_config(true));
                }
                if let Some(top) = self.layers.last_mut() {
                    top.render = true;
                }
                info!(
                    "Popping page, current layer stack length {}",
                    self.layers.len()
                );
            }
        }
    }

    /// Passing the action to the top layer
    pub(super) fn handle_action(&mut self, action: Action) {
        if let Some(top) = self.layers.last_mut() {
            top.update(action);
        }
    }

    fn root_layer(state: &RootState) -> BoxedLayer {
        let mut page: Box<dyn Layer> = Box::new(DemoPage::new(state.sender(), &state.config.picker));
        page.init();
        page.into()
    }

    /// Get a new layer based on the given layer type
    fn get_layer(layer: &Layers, state: &RootState) -> Option<BoxedLayer> {
        match layer {
            Layers::Demo => Some(LayerManager::root_layer(state)),
            Layers::Help(help_msg) => match HelpPopup::new(state.sender(), help_msg.clone()) {
                Some(help) => {
                    let mut page: Box<dyn Layer> = Box::new(help);
                    page.init();
                    Some(page.into())
                }
                None => {
                    warn!("Help message is empty");
                    None
                }
            },
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{actions::TargetLayer, config::Config, utils::help_msg::HelpEntry};

    use super::*;

    fn state() -> RootState {
        RootState::new(Config::new(None).unwrap())
    }

    #[test]
    fn test_push_and_pop_help() {
        let state = state();
        let mut manager = LayerManager::new(&Layers::Demo, &state);
        assert_eq!(manager.layers.len(), 1);

        manager.handle_layer_action(
            &LayerManageAction::Push(TargetLayer {
                layer: Layers::Help(vec![HelpEntry::new('q', "Quit")].into()),
                render_self: true,
            }),
            &state,
        );
        assert_eq!(manager.layers.len(), 2);
        assert!(manager.layers[1].layer.is::<HelpPopup>());

        manager.handle_layer_action(&LayerManageAction::Pop, &state);
        assert_eq!(manager.layers.len(), 1);
        assert!(manager.layers[0].layer.is::<DemoPage>());

        // popping the last layer falls back to the demo page
        manager.handle_layer_action(&LayerManageAction::Pop, &state);
        assert_eq!(manager.layers.len(), 1);
        assert!(manager.layers[0].render);
    }

    #[test]
    fn test_empty_help_is_not_pushed() {
        let state = state();
        let mut manager = LayerManager::new(&Layers::Demo, &state);
        manager.handle_layer_action(
            &LayerManageAction::Push(TargetLayer {
                layer: Layers::Help(Default::default()),
                render_self: false,
            }),
            &state,
        );
        assert_eq!(manager.layers.len(), 1);
        assert!(manager.layers[0].render);
    }
}
