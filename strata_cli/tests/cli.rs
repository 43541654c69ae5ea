mod cli {
    use assert_cmd::Command;
    use predicates::str::contains;
    use std::fs;
    use std::path::{Path, PathBuf};
    use strata_core::rusqlite::Connection;
    use tempfile::TempDir;

    fn strata() -> Command {
        Command::cargo_bin("strata").unwrap()
    }

    // a sqlite database, its config file and two migrations, the second one irreversible
    fn project() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        fs::File::create(dir.path().join("app.db")).unwrap();
        fs::write(
            dir.path().join("strata.toml"),
            "[main]\ndb_type = \"Sqlite\"\ndb_path = \"app.db\"\n",
        )
        .unwrap();

        let migrations = dir.path().join("migrations");
        let initial = migrations.join("m250501_000000_initial");
        fs::create_dir_all(&initial).unwrap();
        fs::write(
            initial.join("up.sql"),
            "CREATE TABLE persons (id int, name varchar(255));",
        )
        .unwrap();
        fs::write(initial.join("down.sql"), "DROP TABLE persons;").unwrap();

        let cars = migrations.join("m250502_000000_add_cars_table");
        fs::create_dir_all(&cars).unwrap();
        fs::write(cars.join("up.sql"), "CREATE TABLE cars (id int);").unwrap();

        let db = dir.path().join("app.db");
        (dir, db)
    }

    fn applied(db: &Path) -> Vec<String> {
        let conn = Connection::open(db).unwrap();
        let has_ledger: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='migration'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        if has_ledger == 0 {
            return Vec::new();
        }

        let mut stmt = conn
            .prepare("SELECT version FROM migration ORDER BY version")
            .unwrap();
        let versions = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap();
        versions
    }

    // `strata` with no args should exit with a non-zero code.
    #[test]
    fn cli_no_args() {
        strata().assert().failure();
    }

    #[test]
    fn cli_version() {
        strata()
            .args(["-V"])
            .assert()
            .stdout(contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn migrate_fails_without_config() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("migrations")).unwrap();
        strata()
            .current_dir(dir.path())
            .args(["migrate"])
            .assert()
            .failure();
    }

    #[test]
    fn generate_creates_sql_migration() {
        let dir = TempDir::new().unwrap();
        strata()
            .current_dir(dir.path())
            .args(["generate", "Create Users", "-p", "db"])
            .assert()
            .success()
            .stdout(contains("Created migration: m"));

        let created: Vec<PathBuf> = fs::read_dir(dir.path().join("db"))
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(1, created.len());
        let name = created[0].file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with('m') && name.ends_with("_create_users"));
        assert!(created[0].join("up.sql").is_file());
        assert!(created[0].join("down.sql").is_file());
    }

    #[test]
    fn generate_creates_rust_migration() {
        let dir = TempDir::new().unwrap();
        strata()
            .current_dir(dir.path())
            .args(["generate", "seed", "--rust"])
            .assert()
            .success();

        let created: Vec<PathBuf> = fs::read_dir(dir.path().join("migrations"))
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(1, created.len());
        assert!(created[0].to_str().unwrap().ends_with("_seed.rs"));
    }

    #[test]
    fn migrate_non_interactive_applies_everything() {
        let (dir, db) = project();
        strata()
            .current_dir(dir.path())
            .args(["migrate", "--non-interactive"])
            .assert()
            .success()
            .stdout(contains("All migrations completed."));

        assert_eq!(
            vec!["m250501_000000_initial", "m250502_000000_add_cars_table"],
            applied(&db)
        );

        strata()
            .current_dir(dir.path())
            .args(["migrate", "--non-interactive"])
            .assert()
            .success()
            .stdout(contains("up-to-date"));
    }

    #[test]
    fn migrate_stops_when_declined() {
        let (dir, db) = project();
        strata()
            .current_dir(dir.path())
            .args(["migrate"])
            .write_stdin("yes\nno\n")
            .assert()
            .success()
            .stdout(contains("Apply this migration? (yes/no)"))
            .stdout(contains("Migration process stopped by user."));

        assert_eq!(vec!["m250501_000000_initial"], applied(&db));
    }

    #[test]
    fn migrate_reads_database_url_from_env_var() {
        let (dir, db) = project();
        strata()
            .current_dir(dir.path())
            .env("STRATA_DB_URL", format!("sqlite://{}", db.display()))
            .args(["migrate", "-e", "STRATA_DB_URL", "-c", "missing.toml", "--non-interactive"])
            .assert()
            .success();

        assert_eq!(2, applied(&db).len());
    }

    #[test]
    fn rollback_reverts_most_recent_migration() {
        let (dir, db) = project();
        strata()
            .current_dir(dir.path())
            .args(["migrate"])
            .write_stdin("y\nn\n")
            .assert()
            .success();

        strata()
            .current_dir(dir.path())
            .args(["rollback"])
            .write_stdin("no\n")
            .assert()
            .success()
            .stdout(contains("Rollback migration m250501_000000_initial? (yes/no)"))
            .stdout(contains("Rollback cancelled by user."));
        assert_eq!(vec!["m250501_000000_initial"], applied(&db));

        strata()
            .current_dir(dir.path())
            .args(["rollback"])
            .write_stdin("Y\n")
            .assert()
            .success()
            .stdout(contains("m250501_000000_initial rolled back successfully"));
        assert!(applied(&db).is_empty());

        strata()
            .current_dir(dir.path())
            .args(["rollback", "--non-interactive"])
            .assert()
            .success()
            .stdout(contains("No migrations to roll back"));
    }

    #[test]
    fn rollback_fails_without_revert_script() {
        let (dir, db) = project();
        strata()
            .current_dir(dir.path())
            .args(["migrate", "--non-interactive"])
            .assert()
            .success();

        strata()
            .current_dir(dir.path())
            .args(["rollback", "--non-interactive"])
            .assert()
            .failure();
        assert_eq!(2, applied(&db).len());
    }
}
