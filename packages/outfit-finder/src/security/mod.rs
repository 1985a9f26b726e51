//! Secret handling for API keys and tokens.

pub mod credentials;

pub use credentials::{ModelCredentials, SecretString};
