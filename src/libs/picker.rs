//! Open/close coordination shared by every picker variant.
//!
//! ```text
//!            open()                        commit() [draft ok]
//!  Closed ───────────▶ Open { draft } ─────────────────────────▶ Closed  (callback once)
//!    ▲                  │    ▲                                     ▲
//!    │   dismiss()      │    │ change_draft()                      │
//!    └──────────────────┘    └─────────┘                           │
//!                       commit() [draft invalid / refused]         │
//!                         KeepOpen: stay Open                      │
//!                         CloseSilently: ──────────────────────────┘ (no callback)
//! ```

use std::fmt::Debug;

use serde::Deserialize;
use strum::Display;
use tracing::{debug, info};

use super::value::{DateInput, DateValue, Precision, ReturnShape, Unit, ValueModel};

/// What `commit()` does when the draft cannot be published.
///
/// The same policy applies to invalid drafts and to drafts whose latest
/// candidate was refused by a `disable_future`/`disable_past` bound.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum InvalidCommitPolicy {
    /// Stay open so the user can fix the selection
    #[default]
    KeepOpen,
    /// Close the overlay without publishing anything
    CloseSilently,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOptions {
    /// Display pattern for the text field
    pub format: String,
    pub auto_ok: bool,
    pub disable_future: bool,
    pub disable_past: bool,
    pub invalid_label: Option<String>,
    pub return_shape: ReturnShape,
    pub invalid_commit: InvalidCommitPolicy,
    /// The precision at which a selection counts as complete for `auto_ok`
    pub complete_at: Precision,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            format: "MMMM Do".to_string(),
            auto_ok: false,
            disable_future: false,
            disable_past: false,
            invalid_label: None,
            return_shape: ReturnShape::default(),
            invalid_commit: InvalidCommitPolicy::default(),
            complete_at: Precision::Day,
        }
    }
}

impl PickerOptions {
    pub fn auto_ok(self, auto_ok: bool) -> Self {
        Self { auto_ok, ..self }
    }

    pub fn disable_future(self, disable_future: bool) -> Self {
        Self {
            disable_future,
            ..self
        }
    }

    pub fn disable_past(self, disable_past: bool) -> Self {
        Self {
            disable_past,
            ..self
        }
    }

    pub fn format<T: Into<String>>(self, format: T) -> Self {
        Self {
            format: format.into(),
            ..self
        }
    }

    pub fn invalid_label<T: Into<String>>(self, label: Option<T>) -> Self {
        Self {
            invalid_label: label.map(Into::into),
            ..self
        }
    }

    pub fn return_shape(self, return_shape: ReturnShape) -> Self {
        Self {
            return_shape,
            ..self
        }
    }

    pub fn invalid_commit(self, invalid_commit: InvalidCommitPolicy) -> Self {
        Self {
            invalid_commit,
            ..self
        }
    }

    pub fn complete_at(self, complete_at: Precision) -> Self {
        Self {
            complete_at,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Rejection {
    #[strum(to_string = "draft is not a valid date")]
    Invalid,
    #[strum(to_string = "date is after today")]
    AfterToday,
    #[strum(to_string = "date is before today")]
    BeforeToday,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerState {
    Closed,
    Open {
        draft: DateValue,
        /// Set when the latest candidate was refused; blocks commit
        rejection: Option<Rejection>,
    },
}

/// Outcome of a single event, returned for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Opened,
    DraftChanged,
    Committed(DateInput),
    /// The commit was refused; `closed` tells whether the overlay closed anyway
    CommitBlocked { reason: Rejection, closed: bool },
    Rejected(Rejection),
    Dismissed,
    /// The event does not apply to the current state
    Ignored,
}

pub type ChangeCallback = Box<dyn FnMut(DateInput) + Send + Sync>;

/// Owns the draft of one picker and mediates between the view and the
/// consumer's `on_change` callback.
pub struct PickerController {
    model: ValueModel,
    options: PickerOptions,
    committed: DateValue,
    state: PickerState,
    on_change: ChangeCallback,
}

impl Debug for PickerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickerController")
            .field("options", &self.options)
            .field("committed", &self.committed)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl PickerController {
    pub fn new(
        model: ValueModel,
        options: PickerOptions,
        value: &DateInput,
        on_change: ChangeCallback,
    ) -> Self {
        let committed = model.normalize(value);
        Self {
            model,
            options,
            committed,
            state: PickerState::Closed,
            on_change,
        }
    }

    pub fn model(&self) -> &ValueModel {
        &self.model
    }

    pub fn options(&self) -> &PickerOptions {
        &self.options
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PickerState::Open { .. })
    }

    pub fn committed(&self) -> DateValue {
        self.committed
    }

    pub fn draft(&self) -> Option<DateValue> {
        match &self.state {
            PickerState::Open { draft, .. } => Some(*draft),
            PickerState::Closed => None,
        }
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match &self.state {
            PickerState::Open { rejection, .. } => *rejection,
            PickerState::Closed => None,
        }
    }

    /// The committed value formatted for the text field
    pub fn label(&self) -> String {
        self.model.format(
            &self.committed,
            &self.options.format,
            self.options.invalid_label.as_deref(),
        )
    }

    /// Replace the committed value from outside. Never calls `on_change`.
    pub fn set_value(&mut self, value: &DateInput) {
        self.committed = self.model.normalize(value);
        debug!("Committed value set from outside to {}", self.committed);
    }

    pub fn open(&mut self) -> Transition {
        if self.is_open() {
            return Transition::Ignored;
        }
        let draft = if self.committed.is_valid() {
            self.committed
        } else {
            self.model.now()
        };
        // a committed value pushed from outside may already be out of bounds
        let rejection = self.check_bounds(&draft);
        self.state = PickerState::Open { draft, rejection };
        debug!("Picker opened with draft {draft}, rejection {rejection:?}");
        Transition::Opened
    }

    pub fn change_draft(&mut self, candidate: &DateInput, precision: Precision) -> Transition {
        if !self.is_open() {
            return Transition::Ignored;
        }
        let candidate = self.model.normalize(candidate);

        if let Some(reason) = self.check_bounds(&candidate) {
            if let PickerState::Open { rejection, .. } = &mut self.state {
                *rejection = Some(reason);
            }
            debug!("Candidate {candidate} rejected: {reason}");
            return Transition::Rejected(reason);
        }

        self.state = PickerState::Open {
            draft: candidate,
            rejection: None,
        };
        debug!("Draft changed to {candidate} at {precision:?}");

        if self.options.auto_ok && candidate.is_valid() && precision >= self.options.complete_at {
            return self.commit();
        }
        Transition::DraftChanged
    }

    pub fn commit(&mut self) -> Transition {
        let PickerState::Open { draft, rejection } = self.state.clone() else {
            return Transition::Ignored;
        };

        // the clock may have moved since the draft was checked
        let blocked = rejection.or_else(|| self.check_bounds(&draft));
        let published = self.model.try_export(&draft, self.options.return_shape);

        match (blocked, published) {
            (None, Some(published)) => {
                self.committed = draft;
                self.state = PickerState::Closed;
                info!("Committed {draft}");
                (self.on_change)(published.clone());
                Transition::Committed(published)
            }
            (blocked, _) => {
                // an unpublishable draft is invalid or has no instant in the zone
                let reason = blocked.unwrap_or(Rejection::Invalid);
                let closed = match self.options.invalid_commit {
                    InvalidCommitPolicy::KeepOpen => false,
                    InvalidCommitPolicy::CloseSilently => {
                        self.state = PickerState::Closed;
                        true
                    }
                };
                debug!("Commit blocked ({reason}), closed: {closed}");
                Transition::CommitBlocked { reason, closed }
            }
        }
    }

    pub fn dismiss(&mut self) -> Transition {
        if !self.is_open() {
            return Transition::Ignored;
        }
        self.state = PickerState::Closed;
        debug!("Picker dismissed, draft discarded");
        Transition::Dismissed
    }

    /// Whether a valid value violates the configured bounds, compared by day
    pub fn check_bounds(&self, value: &DateValue) -> Option<Rejection> {
        if !value.is_valid() {
            return None;
        }
        let today = self.model.now();
        if self.options.disable_future && value.is_after_unit(&today, Unit::Day) {
            return Some(Rejection::AfterToday);
        }
        if self.options.disable_past && value.is_before_unit(&today, Unit::Day) {
            return Some(Rejection::BeforeToday);
        }
        None
    }
}

#[cfg(test)]
impl PickerController {
    pub fn state(&self) -> &PickerState {
        &self.state
    }
}
