//! Concrete analytics clients.

pub mod http;

pub use http::{HttpAnalyticsClient, HttpClientFactory, HttpSinkOptions};
