//! # TaskDesk API Server Library
//!
//! This library provides the HTTP surface of the TaskDesk backend.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error taxonomy and the `{status, message, data?}` envelope
//! - `routes`: Route handlers (health, auth, tasks)

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
