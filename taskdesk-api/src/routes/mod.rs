/// Route handlers for the TaskDesk API
///
/// All mutating endpoints accept form-encoded bodies and reply with the
/// `{status, message, data?}` envelope from [`crate::error`].

pub mod auth;
pub mod health;
pub mod tasks;
