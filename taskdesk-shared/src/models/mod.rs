/// Database models for TaskDesk
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts (credential hash, approval status, soft delete)
/// - `session`: Issued sign-in credentials with expiry and revocation flags
/// - `task`: To-do items with soft delete and the filtered listing query
///
/// Every query in this module excludes soft-deleted rows; a record with a
/// deletion timestamp is invisible everywhere except the row itself.

pub mod session;
pub mod task;
pub mod user;
