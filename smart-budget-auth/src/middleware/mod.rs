//! Middleware layers for smart-budget-auth
//!
//! Provides middleware for:
//! - Authentication (route protection)

pub mod auth;

pub use auth::AuthMiddleware;
