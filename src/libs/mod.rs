//! Picker core: value normalization and the open/commit/dismiss state machine.
//!
//! Nothing in here knows about the terminal; the widgets in
//! [`crate::component::picker`] drive it.

pub(crate) mod clock;
pub(crate) mod format;
pub(crate) mod picker;
pub(crate) mod value;
