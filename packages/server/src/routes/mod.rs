//! HTTP route handlers.

pub mod exercises;
pub mod health;
pub mod oauth;
pub mod populate;
