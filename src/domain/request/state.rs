use serde::de::DeserializeOwned;

use crate::domain::cache::Payload;
use crate::domain::DomainError;

/// Lifecycle of a consumer's request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Failed,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Idle => write!(f, "idle"),
            RequestStatus::Loading => write!(f, "loading"),
            RequestStatus::Success => write!(f, "success"),
            RequestStatus::Failed => write!(f, "failed"),
        }
    }
}

/// What a consumer currently observes for its key
///
/// `data` keeps the last successful payload across later failures;
/// `error_message` is only set while `status` is `Failed`.
#[derive(Debug, Clone, Default)]
pub struct RequestState {
    pub status: RequestStatus,
    pub data: Option<Payload>,
    pub error_message: Option<String>,
}

impl RequestState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.status == RequestStatus::Loading
    }

    pub(crate) fn mark_loading(&mut self) {
        self.status = RequestStatus::Loading;
        self.error_message = None;
    }

    pub(crate) fn mark_success(&mut self, payload: Payload) {
        self.status = RequestStatus::Success;
        self.data = Some(payload);
        self.error_message = None;
    }

    pub(crate) fn mark_failed(&mut self, message: impl Into<String>) {
        self.status = RequestStatus::Failed;
        self.error_message = Some(message.into());
    }

    /// Decodes the current payload into a typed model
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<Option<T>, DomainError> {
        self.data
            .as_deref()
            .map(|value| {
                T::deserialize(value).map_err(|e| DomainError::decode(e.to_string()))
            })
            .transpose()
    }
}
