use crate::ddl::quote_ident;
use crate::error::WrapMigrationError;
use crate::Error;

/// A value bound to, or read back from, a statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            Value::Bool(value) => Some(*value as i64),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Row filter for [`Executor::delete_rows`].
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    /// Matches every row
    All,
    /// `column = value` pairs joined with `AND`, a [`Value::Null`] matches with `IS NULL`
    Eq(Vec<(String, Value)>),
    /// A raw `WHERE` clause body, used verbatim
    Raw(String),
}

impl Condition {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Condition {
        Condition::Eq(vec![(column.into(), value.into())])
    }

    pub fn and(self, column: impl Into<String>, value: impl Into<Value>) -> Condition {
        match self {
            Condition::Eq(mut pairs) => {
                pairs.push((column.into(), value.into()));
                Condition::Eq(pairs)
            }
            Condition::All => Condition::eq(column, value),
            Condition::Raw(raw) => {
                let column = column.into();
                let value = value.into();
                let clause = match value {
                    Value::Null => format!("{} IS NULL", quote_ident(&column)),
                    other => format!("{} = {}", quote_ident(&column), literal(&other)),
                };
                Condition::Raw(format!("({}) AND {}", raw, clause))
            }
        }
    }

    pub fn raw(clause: impl Into<String>) -> Condition {
        Condition::Raw(clause.into())
    }

    /// Renders the `WHERE` clause (with leading space) and the values to bind, in order.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        match self {
            Condition::All => (String::new(), Vec::new()),
            Condition::Raw(raw) => (format!(" WHERE {}", raw), Vec::new()),
            Condition::Eq(pairs) if pairs.is_empty() => (String::new(), Vec::new()),
            Condition::Eq(pairs) => {
                let mut params = Vec::new();
                let clauses = pairs
                    .iter()
                    .map(|(column, value)| match value {
                        Value::Null => format!("{} IS NULL", quote_ident(column)),
                        value => {
                            params.push(value.clone());
                            format!("{} = ?", quote_ident(column))
                        }
                    })
                    .collect::<Vec<String>>();
                (format!(" WHERE {}", clauses.join(" AND ")), params)
            }
        }
    }
}

fn literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".into(),
        Value::Bool(value) => String::from(if *value { "1" } else { "0" }),
        Value::Int(value) => value.to_string(),
        Value::Float(value) => value.to_string(),
        Value::Text(value) => format!("'{}'", crate::ddl::escape_string(value)),
    }
}

/// Builds a positional `INSERT` statement and the values to bind with it.
pub fn insert_query(table: &str, values: &[(&str, Value)]) -> (String, Vec<Value>) {
    let columns = values
        .iter()
        .map(|(column, _)| quote_ident(column))
        .collect::<Vec<String>>()
        .join(", ");
    let placeholders = vec!["?"; values.len()].join(", ");
    (
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(table),
            columns,
            placeholders
        ),
        values.iter().map(|(_, value)| value.clone()).collect(),
    )
}

/// Builds a positional `DELETE` statement and the values to bind with it.
pub fn delete_query(table: &str, condition: &Condition) -> (String, Vec<Value>) {
    let (clause, params) = condition.to_sql();
    (format!("DELETE FROM {}{}", quote_ident(table), clause), params)
}

/// The capability migrations and the ledger need from a database connection.
///
/// Implementations are free to wrap each call in its own transaction.
pub trait Executor {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Runs raw SQL, possibly holding several statements.
    fn execute(&mut self, sql: &str) -> Result<usize, Self::Error>;

    /// Inserts a single row returning the generated id.
    fn insert_row(&mut self, table: &str, values: &[(&str, Value)]) -> Result<i64, Self::Error>;

    /// Deletes the rows matching `condition` returning how many were removed.
    fn delete_rows(&mut self, table: &str, condition: &Condition) -> Result<u64, Self::Error>;

    /// Runs a query returning the first column of every row.
    fn query_column(&mut self, query: &str, params: &[Value]) -> Result<Vec<Value>, Self::Error>;
}

// object safe view of an Executor with its errors converted, handed to migrations through Schema
pub(crate) trait DynExecutor {
    fn run(&mut self, sql: &str) -> Result<usize, Error>;

    fn insert(&mut self, table: &str, values: &[(&str, Value)]) -> Result<i64, Error>;

    fn delete(&mut self, table: &str, condition: &Condition) -> Result<u64, Error>;

    fn select(&mut self, query: &str, params: &[Value]) -> Result<Vec<Value>, Error>;
}

impl<T: Executor> DynExecutor for T {
    fn run(&mut self, sql: &str) -> Result<usize, Error> {
        self.execute(sql)
            .migration_err("error executing statement", None)
    }

    fn insert(&mut self, table: &str, values: &[(&str, Value)]) -> Result<i64, Error> {
        self.insert_row(table, values)
            .migration_err(&format!("error inserting into {}", table), None)
    }

    fn delete(&mut self, table: &str, condition: &Condition) -> Result<u64, Error> {
        self.delete_rows(table, condition)
            .migration_err(&format!("error deleting from {}", table), None)
    }

    fn select(&mut self, query: &str, params: &[Value]) -> Result<Vec<Value>, Error> {
        self.query_column(query, params)
            .migration_err("error running query", None)
    }
}
