use crate::ddl::{self, ColumnSpec, ForeignKey, TableSpec, DEFAULT_TABLE_OPTIONS};
use crate::executor::{Condition, DynExecutor, Value};
use crate::Error;

/// Handle given to a migration's apply and revert functions.
///
/// Every statement is rendered with the [`ddl`](crate::ddl) builders, logged, and run on the
/// underlying connection. A rejected statement comes back as
/// [`Kind::ExecutionFailure`](crate::error::Kind::ExecutionFailure).
pub struct Schema<'a> {
    conn: &'a mut dyn DynExecutor,
}

impl<'a> Schema<'a> {
    pub(crate) fn new(conn: &'a mut dyn DynExecutor) -> Schema<'a> {
        Schema { conn }
    }

    /// Runs raw SQL.
    pub fn execute(&mut self, sql: &str) -> Result<(), Error> {
        log::debug!("{}", sql);
        self.conn.run(sql)?;
        Ok(())
    }

    /// Creates a table with the default InnoDB/utf8 options.
    pub fn create_table<I, S>(&mut self, name: &str, columns: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (S, ColumnSpec)>,
        S: Into<String>,
    {
        self.create_table_with_options(name, columns, DEFAULT_TABLE_OPTIONS)
    }

    pub fn create_table_with_options<I, S>(
        &mut self,
        name: &str,
        columns: I,
        options: &str,
    ) -> Result<(), Error>
    where
        I: IntoIterator<Item = (S, ColumnSpec)>,
        S: Into<String>,
    {
        let table = columns
            .into_iter()
            .fold(TableSpec::new(name), |table, (column, spec)| {
                table.column(column, spec)
            })
            .options(options);
        self.create(&table)
    }

    /// Creates the table described by `table`, options included as given.
    pub fn create(&mut self, table: &TableSpec) -> Result<(), Error> {
        let sql = table.render()?;
        self.execute(&sql)
    }

    pub fn drop_table(&mut self, name: &str) -> Result<(), Error> {
        let sql = ddl::drop_table(name)?;
        self.execute(&sql)
    }

    pub fn add_column(&mut self, table: &str, column: &str, spec: ColumnSpec) -> Result<(), Error> {
        let sql = ddl::add_column(table, column, &spec)?;
        self.execute(&sql)
    }

    pub fn drop_column(&mut self, table: &str, column: &str) -> Result<(), Error> {
        let sql = ddl::drop_column(table, column)?;
        self.execute(&sql)
    }

    pub fn add_foreign_key(&mut self, foreign_key: ForeignKey) -> Result<(), Error> {
        let sql = foreign_key.render()?;
        self.execute(&sql)
    }

    pub fn drop_foreign_key(&mut self, name: &str, table: &str) -> Result<(), Error> {
        let sql = ddl::drop_foreign_key(name, table)?;
        self.execute(&sql)
    }

    /// Inserts a row, returning the generated id.
    pub fn insert(&mut self, table: &str, values: &[(&str, Value)]) -> Result<i64, Error> {
        log::debug!("insert into {}: {:?}", table, values);
        self.conn.insert(table, values)
    }

    /// Deletes the rows matching `condition`, returning how many were removed.
    pub fn delete(&mut self, table: &str, condition: Condition) -> Result<u64, Error> {
        log::debug!("delete from {}: {:?}", table, condition);
        self.conn.delete(table, &condition)
    }

    /// Runs a query and collects the first column of each row.
    pub fn query_column(&mut self, query: &str, params: &[Value]) -> Result<Vec<Value>, Error> {
        self.conn.select(query, params)
    }
}
