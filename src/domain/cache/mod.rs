//! Cache domain - Response cache abstraction and request keys

mod clock;
mod key;
mod repository;

pub use clock::{Clock, ManualClock, SystemClock};
pub use key::RequestKey;
pub use repository::{CacheEntry, Payload, ResponseCache};

#[cfg(test)]
pub use repository::mock::MockResponseCache;
