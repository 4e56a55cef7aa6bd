/// Database access layer
///
/// # Modules
///
/// - [`pool`]: PostgreSQL connection pool management
/// - [`migrations`]: Migration runner built on sqlx migrations

pub mod migrations;
pub mod pool;
