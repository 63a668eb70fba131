//! Request domain - Fetch options and the per-consumer request state

mod options;
mod state;

pub use options::{FetchOptions, DEFAULT_TTL};
pub use state::{RequestState, RequestStatus};
