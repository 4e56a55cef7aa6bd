//! # TaskDesk Shared Library
//!
//! This crate contains the data layer and authentication primitives used by
//! the TaskDesk API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, sessions, tasks)
//! - `auth`: Password hashing, session tokens, and the auth gate middleware
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the TaskDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
