use crate::runner::Outcome;
use crate::{AppliedMigration, Report};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error as TError;

/// An Error occurred while rendering a schema change or during a migration cycle
#[derive(Debug)]
pub struct Error {
    kind: Box<Kind>,
    report: Option<Report>,
}

impl Error {
    /// Instantiate a new Error
    pub(crate) fn new(kind: Kind, report: Option<Report>) -> Error {
        Error {
            kind: Box::new(kind),
            report,
        }
    }

    /// Shorthand for an [`Kind::InvalidSpec`] error
    pub(crate) fn invalid_spec(msg: impl Into<String>) -> Error {
        Error::new(Kind::InvalidSpec(msg.into()), None)
    }

    /// Return the Report of the migration cycle if any
    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    /// Return the kind of error occurred
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    // attaches the report of the current cycle, keeping the one already set if any
    pub(crate) fn with_report(self, applied: &[AppliedMigration]) -> Error {
        match self.report {
            Some(_) => self,
            None => Error {
                kind: self.kind,
                report: Some(Report::new(applied.to_vec(), Outcome::Failed)),
            },
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

/// Enum listing possible errors from strata.
#[derive(Debug, TError)]
pub enum Kind {
    /// A column or table specification that cannot be rendered into a statement
    #[error("invalid schema specification: {0}")]
    InvalidSpec(String),
    /// The ledger already holds an entry for this version
    #[error("migration {0} is already recorded as applied")]
    DuplicateVersion(String),
    /// The ledger holds no entry for this version
    #[error("migration {0} is not recorded as applied")]
    NotFound(String),
    /// The most recently applied migration has no revert available
    #[error("migration {0} has no revert script available, rollback aborted")]
    MissingScript(String),
    /// The executor rejected a statement
    #[error("{0}: {1}")]
    ExecutionFailure(String, #[source] Box<dyn std::error::Error + Sync + Send>),
    /// An Error from an invalid migration name
    #[error("invalid migration name {0}, migrations must be named m{{YYMMDD_HHMMSS}}_{{name}}")]
    InvalidName(String),
    /// Two migrations share the same version, migration versions must be unique
    #[error("migration {0} is repeated, migration versions must be unique")]
    RepeatedVersion(String),
    /// An Error from an invalid migrations path location
    #[error("invalid migrations path {0}, {1}")]
    InvalidMigrationPath(PathBuf, std::io::Error),
    /// An Error from an unreadable migration file (not UTF-8 etc)
    #[error("invalid migration file at path {0}, {1}")]
    InvalidMigrationFile(PathBuf, std::io::Error),
    /// An Error parsing strata Config
    #[error("Error parsing config: {0}")]
    ConfigError(String),
    /// An Error from an underlying database connection Error
    #[error("`{0}`, `{1}`")]
    Connection(String, #[source] Box<dyn std::error::Error + Sync + Send>),
}

// Helper trait for adding custom messages and applied migrations to driver errors.
pub trait WrapMigrationError<T, E> {
    fn migration_err(self, msg: &str, report: Option<&[AppliedMigration]>) -> Result<T, Error>;

    fn connection_err(self, msg: &str) -> Result<T, Error>;
}

impl<T, E> WrapMigrationError<T, E> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn migration_err(
        self,
        msg: &str,
        applied_migrations: Option<&[AppliedMigration]>,
    ) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(Error {
                kind: Box::new(Kind::ExecutionFailure(msg.into(), Box::new(err))),
                report: applied_migrations.map(|am| Report::new(am.to_vec(), Outcome::Failed)),
            }),
        }
    }

    fn connection_err(self, msg: &str) -> Result<T, Error> {
        self.map_err(|err| Error::new(Kind::Connection(msg.into(), Box::new(err)), None))
    }
}
