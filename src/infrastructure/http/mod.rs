//! HTTP infrastructure - Transport over the dashboard REST API

mod client;

pub use client::{FileUpload, HttpClient, HttpTransport};

#[cfg(test)]
pub use client::mock::{MockHttpTransport, MockReply};
