//! OAuth2 provider implementations
//!
//! Only Google is supported.

pub mod google;

pub use google::GoogleProvider;
