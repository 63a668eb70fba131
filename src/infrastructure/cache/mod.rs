//! Cache infrastructure - Response cache implementations

mod in_memory;

pub use in_memory::{InMemoryCacheConfig, InMemoryResponseCache};
