use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use time::OffsetDateTime;

use crate::error::Kind;
use crate::{Error, Schema};

/// One direction of a migration: receives the [`Schema`] and issues its statements through it.
pub type Step = Arc<dyn for<'a, 'b> Fn(&'a mut Schema<'b>) -> Result<(), Error> + Send + Sync>;

fn step<F>(f: F) -> Step
where
    F: for<'a, 'b> Fn(&'a mut Schema<'b>) -> Result<(), Error> + Send + Sync + 'static,
{
    Arc::new(f)
}

// versions are ledger keys and file stems, keep them to word characters
fn check_version(version: &str) -> Result<(), Error> {
    if !version.is_empty()
        && version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Ok(())
    } else {
        Err(Error::new(Kind::InvalidName(version.to_string()), None))
    }
}

/// A versioned unit of schema change, with the code that applies it and,
/// optionally, the code that reverts it.
///
/// Migrations are ordered by their version, compared lexically, which yields
/// chronological order for the conventional `m{YYMMDD_HHMMSS}_{name}` versions.
#[derive(Clone)]
pub struct Migration {
    version: String,
    up: Step,
    down: Option<Step>,
}

impl Migration {
    /// Create a migration from its apply and revert functions.
    pub fn new<U, D>(version: &str, up: U, down: D) -> Result<Migration, Error>
    where
        U: for<'a, 'b> Fn(&'a mut Schema<'b>) -> Result<(), Error> + Send + Sync + 'static,
        D: for<'a, 'b> Fn(&'a mut Schema<'b>) -> Result<(), Error> + Send + Sync + 'static,
    {
        check_version(version)?;
        Ok(Migration {
            version: version.to_string(),
            up: step(up),
            down: Some(step(down)),
        })
    }

    /// Create a migration that can be applied but not rolled back.
    pub fn irreversible<U>(version: &str, up: U) -> Result<Migration, Error>
    where
        U: for<'a, 'b> Fn(&'a mut Schema<'b>) -> Result<(), Error> + Send + Sync + 'static,
    {
        check_version(version)?;
        Ok(Migration {
            version: version.to_string(),
            up: step(up),
            down: None,
        })
    }

    /// Create a migration from raw SQL, `down` being `None` when there is no revert script.
    pub fn from_sql(version: &str, up: &str, down: Option<&str>) -> Result<Migration, Error> {
        check_version(version)?;
        let up_sql = up.to_string();
        let down = down.map(|down| {
            let down_sql = down.to_string();
            step(move |schema| schema.execute(&down_sql))
        });

        Ok(Migration {
            version: version.to_string(),
            up: step(move |schema| schema.execute(&up_sql)),
            down,
        })
    }

    /// Get the Migration version
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Whether this migration can be reverted
    pub fn is_reversible(&self) -> bool {
        self.down.is_some()
    }

    pub(crate) fn apply(&self, schema: &mut Schema<'_>) -> Result<(), Error> {
        (self.up)(schema)
    }

    pub(crate) fn revert(&self, schema: &mut Schema<'_>) -> Result<(), Error> {
        match &self.down {
            Some(down) => down(schema),
            None => Err(Error::new(Kind::MissingScript(self.version.clone()), None)),
        }
    }
}

impl fmt::Debug for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migration")
            .field("version", &self.version)
            .field("reversible", &self.is_reversible())
            .finish()
    }
}

impl fmt::Display for Migration {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{}", self.version)
    }
}

impl Eq for Migration {}

impl PartialEq for Migration {
    fn eq(&self, other: &Migration) -> bool {
        self.version == other.version
    }
}

impl Ord for Migration {
    fn cmp(&self, other: &Migration) -> Ordering {
        self.version.cmp(&other.version)
    }
}

impl PartialOrd for Migration {
    fn partial_cmp(&self, other: &Migration) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A ledger entry: a migration version and when it was applied, in epoch seconds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppliedMigration {
    version: String,
    applied_at: i64,
}

impl AppliedMigration {
    pub fn new(version: impl Into<String>, applied_at: i64) -> AppliedMigration {
        AppliedMigration {
            version: version.into(),
            applied_at,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Seconds since the unix epoch
    pub fn applied_at(&self) -> i64 {
        self.applied_at
    }

    /// The apply time as a UTC timestamp, `None` if it is out of range.
    pub fn applied_on(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp(self.applied_at).ok()
    }
}

impl fmt::Display for AppliedMigration {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{}", self.version)
    }
}
