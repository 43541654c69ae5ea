#[cfg(feature = "mysql")]
use crate::config::build_db_url;
use crate::config::{Config, ConfigDbType};
#[allow(unused_imports)]
use crate::error::{Kind, WrapMigrationError};
use crate::runner::RollbackOutcome;
use crate::{Confirm, Error, Report, Runner};

// this is written as macro so that we don't have to deal with type signatures
macro_rules! with_connection {
    ($config:ident, $op: expr) => {
        match $config.db_type() {
            ConfigDbType::Mysql => {
                cfg_if::cfg_if! {
                    if #[cfg(feature = "mysql")] {
                        let url = build_db_url("mysql", $config);
                        let conn = mysql::Conn::new(url.as_str()).connection_err("could not connect to database")?;
                        $op(conn)
                    } else {
                        Err(Error::new(Kind::ConfigError("tried to migrate from config for a mysql database, but feature mysql not enabled!".into()), None))
                    }
                }
            }
            ConfigDbType::Sqlite => {
                cfg_if::cfg_if! {
                    if #[cfg(feature = "rusqlite")] {
                        // may have been checked on config parsing, if not let it fail with a file not found error
                        let path = $config.db_path().map(|p| p.to_path_buf()).unwrap_or_default();
                        let conn = rusqlite::Connection::open_with_flags(path, rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE).connection_err("could not open database")?;
                        $op(conn)
                    } else {
                        Err(Error::new(Kind::ConfigError("tried to migrate from config for a sqlite database, but feature rusqlite not enabled!".into()), None))
                    }
                }
            }
        }
    }
}

impl Runner {
    /// Opens a connection described by `config` and applies the pending migrations, consulting
    /// `gate` before each one.
    pub fn run_with_config<G>(&self, config: &Config, gate: &mut G) -> Result<Report, Error>
    where
        G: Confirm + ?Sized,
    {
        with_connection!(config, |mut conn| self.run_with(&mut conn, gate))
    }

    /// Opens a connection described by `config` and reverts the most recently applied migration.
    pub fn rollback_with_config<G>(
        &self,
        config: &Config,
        gate: &mut G,
    ) -> Result<RollbackOutcome, Error>
    where
        G: Confirm + ?Sized,
    {
        with_connection!(config, |mut conn| self.rollback_with(&mut conn, gate))
    }
}

#[cfg(all(test, feature = "rusqlite"))]
mod tests {
    use crate::config::{Config, ConfigDbType};
    use crate::{Migration, NonInteractive, Outcome, RollbackOutcome, Runner};

    #[test]
    fn runs_and_rolls_back_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("app.db");
        rusqlite::Connection::open(&db).unwrap();

        let config =
            Config::new(ConfigDbType::Sqlite).set_db_path(db.to_str().unwrap());
        let runner = Runner::new(&[Migration::from_sql(
            "m250501_000000_initial",
            "CREATE TABLE persons (id int);",
            Some("DROP TABLE persons;"),
        )
        .unwrap()]);

        let report = runner
            .run_with_config(&config, &mut NonInteractive)
            .unwrap();
        assert_eq!(&Outcome::Completed, report.outcome());
        assert_eq!(1, report.applied_migrations().len());

        let outcome = runner
            .rollback_with_config(&config, &mut NonInteractive)
            .unwrap();
        assert!(matches!(outcome, RollbackOutcome::RolledBack(m) if m.version() == "m250501_000000_initial"));
    }

    #[test]
    fn fails_on_missing_sqlite_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new(ConfigDbType::Sqlite)
            .set_db_path(dir.path().join("missing.db").to_str().unwrap());
        let runner = Runner::new(&[]);
        assert!(runner.run_with_config(&config, &mut NonInteractive).is_err());
    }
}
