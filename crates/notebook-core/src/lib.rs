//! Core types and trait definitions for the notebook application.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends and the web layer depend on it, never the reverse.

pub mod error;
pub mod note;
pub mod notebook;
pub mod store;

pub use error::ValidationError;
