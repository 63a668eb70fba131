//! Request infrastructure - Cache coordination and consumer handles

mod consumer;
mod coordinator;

pub use consumer::ApiConsumer;
pub use coordinator::RequestCoordinator;
