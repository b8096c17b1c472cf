//! HTTP layer: request construction and the rate-limited client

pub mod client;
pub mod request;

pub use client::{HttpClient, HttpResponse};
pub use request::RequestSpec;
