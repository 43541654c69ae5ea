use std::fmt;

use crate::traits::sync::{migrate, rollback, Ledger};
use crate::traits::{pending_migrations, DEFAULT_LEDGER_TABLE_NAME};
use crate::{AppliedMigration, Confirm, Error, Migration, NonInteractive};

/// How a migration cycle ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every pending migration was applied
    Completed,
    /// There were no pending migrations
    NothingToDo,
    /// The confirmation gate declined the migration with this version, nothing after it ran
    Stopped(String),
    /// A migration or a ledger write failed, only set on the report carried by an [`Error`]
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Completed => write!(f, "completed"),
            Outcome::NothingToDo => write!(f, "nothing to do"),
            Outcome::Stopped(version) => write!(f, "stopped before {}", version),
            Outcome::Failed => write!(f, "failed"),
        }
    }
}

/// Struct that represents the report of the migration cycle.
/// A `Report` instance is returned by [`Runner::run`] via [`Result`]`<Report, Error>`.
/// If there is an [`Error`] during a migration, the `Report` of what was applied before it
/// is available through [`Error::report`].
#[derive(Clone, Debug)]
pub struct Report {
    applied_migrations: Vec<AppliedMigration>,
    outcome: Outcome,
}

impl Report {
    /// Instantiate a new Report
    pub(crate) fn new(applied_migrations: Vec<AppliedMigration>, outcome: Outcome) -> Report {
        Report {
            applied_migrations,
            outcome,
        }
    }

    /// Retrieves the migrations applied and recorded during the cycle, in the order they ran
    pub fn applied_migrations(&self) -> &Vec<AppliedMigration> {
        &self.applied_migrations
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }
}

/// What a rollback did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RollbackOutcome {
    /// The migration was reverted and removed from the ledger
    RolledBack(AppliedMigration),
    /// The ledger is empty
    NothingToRollBack,
    /// The confirmation gate declined, nothing changed
    Cancelled(AppliedMigration),
}

/// Struct that represents the entrypoint to run the migrations,
/// an instance of this struct is returned by the [`embed_migrations!`] and
/// [`include_migration_mods!`] macros.
///
/// [`embed_migrations!`]: macro.embed_migrations.html
/// [`include_migration_mods!`]: macro.include_migration_mods.html
pub struct Runner {
    migrations: Vec<Migration>,
    migration_table_name: String,
}

impl Runner {
    /// instantiate a new Runner
    pub fn new(migrations: &[Migration]) -> Runner {
        Runner {
            migrations: migrations.to_vec(),
            migration_table_name: DEFAULT_LEDGER_TABLE_NAME.into(),
        }
    }

    /// Get the gathered migrations.
    pub fn get_migrations(&self) -> &Vec<Migration> {
        &self.migrations
    }

    pub fn get_migration_table_name(&self) -> &str {
        &self.migration_table_name
    }

    /// Set the table name to use for the ledger. The default name is `migration`
    ///
    /// ### Warning
    /// Pointing an existing project at a different table makes every migration look pending.
    ///
    /// # Panics
    ///
    /// If the provided `migration_table_name` is empty
    pub fn set_migration_table_name<S: AsRef<str>>(
        &mut self,
        migration_table_name: S,
    ) -> &mut Self {
        if migration_table_name.as_ref().is_empty() {
            panic!("Migration table name must not be empty");
        }

        self.migration_table_name = migration_table_name.as_ref().to_string();
        self
    }

    /// Queries the database for the most recently applied migration, returns None if the ledger is empty
    pub fn get_last_applied_migration<C>(
        &self,
        conn: &'_ mut C,
    ) -> Result<Option<AppliedMigration>, Error>
    where
        C: Ledger,
    {
        conn.ensure_schema(&self.migration_table_name)?;
        conn.most_recently_applied(&self.migration_table_name)
    }

    /// Queries the database for every applied migration, ordered by version
    pub fn get_applied_migrations<C>(&self, conn: &'_ mut C) -> Result<Vec<AppliedMigration>, Error>
    where
        C: Ledger,
    {
        conn.ensure_schema(&self.migration_table_name)?;
        conn.list_applied(&self.migration_table_name)
    }

    /// The migrations a [`Runner::run`] would apply, in the order it would apply them
    pub fn get_pending_migrations<C>(&self, conn: &'_ mut C) -> Result<Vec<Migration>, Error>
    where
        C: Ledger,
    {
        let applied = self.get_applied_migrations(conn)?;
        pending_migrations(&applied, &self.migrations)
    }

    /// Applies every pending migration in the supplied database connection without asking
    pub fn run<C>(&self, connection: &mut C) -> Result<Report, Error>
    where
        C: Ledger,
    {
        self.run_with(connection, &mut NonInteractive)
    }

    /// Applies the pending migrations, consulting `gate` before each one.
    /// A declined migration ends the cycle with [`Outcome::Stopped`].
    pub fn run_with<C, G>(&self, connection: &mut C, gate: &mut G) -> Result<Report, Error>
    where
        C: Ledger,
        G: Confirm + ?Sized,
    {
        migrate(
            connection,
            &self.migrations,
            &self.migration_table_name,
            gate,
        )
    }

    /// Reverts the most recently applied migration without asking
    pub fn rollback<C>(&self, connection: &mut C) -> Result<RollbackOutcome, Error>
    where
        C: Ledger,
    {
        self.rollback_with(connection, &mut NonInteractive)
    }

    /// Reverts the most recently applied migration if `gate` agrees
    pub fn rollback_with<C, G>(
        &self,
        connection: &mut C,
        gate: &mut G,
    ) -> Result<RollbackOutcome, Error>
    where
        C: Ledger,
        G: Confirm + ?Sized,
    {
        rollback(
            connection,
            &self.migrations,
            &self.migration_table_name,
            gate,
        )
    }
}
