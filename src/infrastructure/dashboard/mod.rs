//! Dashboard infrastructure - Typed client over the REST API

mod client;

pub use client::DashboardApi;
