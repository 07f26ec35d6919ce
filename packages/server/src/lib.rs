//! CRM field enrichment service.
//!
//! HTTP surface over two subsystems: the two-pass enrichment pipeline
//! (fill empty CRM fields from a record's website and the open web) and
//! a German language exercise generator. OAuth tokens, one-time CSRF
//! states, and the exercise dictionary live in a local SQLite store.

pub mod app;
pub mod config;
pub mod error;
pub mod exercises;
pub mod routes;
pub mod store;

pub use app::{build_app, AppState};
pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use store::Store;
