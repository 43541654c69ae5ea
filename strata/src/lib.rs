/*!
Versioned schema migrations for Rust.

`strata` applies an ordered set of migrations to a database connection and keeps a ledger table,
`migration` by default, recording which versions are applied and when. Migrations can be rolled
back one at a time, newest first, when they carry a revert script.\
Currently [`Rusqlite`](https://crates.io/crates/rusqlite) and [`Mysql`](https://crates.io/crates/mysql) are supported.

## Usage

- Migrations are either directories holding an `up.sql` and optional `down.sql` script, or Rust
  modules declaring `pub fn up(schema: &mut Schema) -> Result<(), Error>` and optionally `down`.
- Migrations must be named `m{YYMMDD_HHMMSS}_{name}`, their version is that name and they are
  applied in version order.
- Rust migrations describe their changes through [`Schema`], which renders DDL from
  [`ColumnSpec`] and [`TableSpec`] values, see [`types`] for the common column types.
- Migrations can be run by embedding them in your Rust code with the [`embed_migrations!`] and
  [`include_migration_mods!`] macros, or via `strata_cli`.

[`embed_migrations!`]: macro.embed_migrations.html
[`include_migration_mods!`]: macro.include_migration_mods.html

### Example
```rust,no_run
use strata::rusqlite::Connection;

mod embedded {
    use strata::embed_migrations;
    embed_migrations!("./tests/sql_migrations");
}

let mut conn = Connection::open_in_memory().unwrap();
embedded::migrations::runner().run(&mut conn).unwrap();
```

### Asking before each step
```rust,no_run
use strata::rusqlite::Connection;
use strata::{Migration, Prompt, Runner};

let runner = Runner::new(&[Migration::from_sql(
    "m250501_120000_create_persons",
    "CREATE TABLE persons (id int, name varchar(255));",
    Some("DROP TABLE persons;"),
)
.unwrap()]);

let mut conn = Connection::open_in_memory().unwrap();
let mut gate = |prompt: &Prompt<'_>| prompt.version() != "m250501_120000_create_persons";
let report = runner.run_with(&mut conn, &mut gate).unwrap();
assert!(report.applied_migrations().is_empty());
```
*/

#[cfg(feature = "config")]
pub use strata_core::config;
pub use strata_core::error::Kind;
pub use strata_core::{
    ddl, executor, find_migration_files, load_sql_migrations, types, AppliedMigration,
    ColumnSpec, Columns, Condition, Confirm, DefaultValue, Error, Executor, ForeignKey, Ledger,
    Migration, MigrationType, NonInteractive, Outcome, Prompt, QueryLedger, Report,
    RollbackOutcome, Runner, Schema, TableSpec, Value,
};
pub use strata_macros::{embed_migrations, include_migration_mods};

#[cfg(feature = "rusqlite")]
pub use strata_core::rusqlite;

#[cfg(feature = "mysql")]
pub use strata_core::mysql;
