#[cfg(feature = "config")]
pub mod config;
mod confirm;
pub mod ddl;
mod drivers;
pub mod error;
pub mod executor;
mod migration;
mod runner;
mod schema;
pub mod traits;
mod util;

pub use crate::confirm::{Confirm, NonInteractive, Prompt};
pub use crate::ddl::{types, ColumnSpec, Columns, DefaultValue, ForeignKey, TableSpec};
pub use crate::error::Error;
pub use crate::executor::{Condition, Executor, Value};
pub use crate::migration::{AppliedMigration, Migration, Step};
pub use crate::runner::{Outcome, Report, RollbackOutcome, Runner};
pub use crate::schema::Schema;
pub use crate::traits::sync::{Ledger, QueryLedger};
pub use crate::util::{
    find_migration_files, load_sql_migrations, parse_migration_name, MigrationType,
};

#[cfg(feature = "rusqlite")]
pub use rusqlite;

#[cfg(feature = "mysql")]
pub use mysql;
