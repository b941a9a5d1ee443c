pub mod diesel;

pub use diesel::{check_migration_status, run_migrations, MigrationStatus};
