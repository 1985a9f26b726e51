//! Page validator implementations.

pub mod http;

pub use http::HttpValidator;
