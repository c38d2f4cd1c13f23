/// Database utilities
///
/// - `pool`: PostgreSQL connection pool construction and health checks
/// - `migrations`: migration runner over the `migrations/` directory

pub mod migrations;
pub mod pool;
