//! Transport layer for the Conductor client.

pub mod http;

pub use http::HttpTransport;
