//! Per-form request lifecycle and mode selection state

use super::command::RequestId;

/// Where a form's latest request stands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestState {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// Waiting for the response to this request
    Pending(RequestId),
    /// The backend answered, with results or with its own error
    Resolved(RequestId),
    /// The request never produced a usable answer
    Failed(RequestId),
}

impl RequestState {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending(_))
    }

    /// Whether a response for `id` is the one this form is waiting for
    #[must_use]
    pub fn awaits(&self, id: RequestId) -> bool {
        *self == RequestState::Pending(id)
    }
}

/// The mode option currently marked selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeSelection {
    pub index: usize,
    pub mode: String,
}
