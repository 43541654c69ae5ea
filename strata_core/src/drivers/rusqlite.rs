use crate::executor::{delete_query, insert_query, Condition, Executor, Value};
use crate::traits::sync::{Ledger, QueryLedger};
use crate::AppliedMigration;

use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection as RqlConnection, Error as RqlError};

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
            Value::Bool(value) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*value))),
            Value::Int(value) => ToSqlOutput::Owned(SqlValue::Integer(*value)),
            Value::Float(value) => ToSqlOutput::Owned(SqlValue::Real(*value)),
            Value::Text(value) => ToSqlOutput::Borrowed(ValueRef::Text(value.as_bytes())),
        })
    }
}

fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(value) => Value::Int(value),
        ValueRef::Real(value) => Value::Float(value),
        ValueRef::Text(value) | ValueRef::Blob(value) => {
            Value::Text(String::from_utf8_lossy(value).into_owned())
        }
    }
}

impl Executor for RqlConnection {
    type Error = RqlError;

    fn execute(&mut self, sql: &str) -> Result<usize, Self::Error> {
        let transaction = self.transaction()?;
        transaction.execute_batch(sql)?;
        let changes = transaction.changes() as usize;
        transaction.commit()?;
        Ok(changes)
    }

    fn insert_row(&mut self, table: &str, values: &[(&str, Value)]) -> Result<i64, Self::Error> {
        let (query, params) = insert_query(table, values);
        let mut stmt = self.prepare(&query)?;
        stmt.execute(params_from_iter(params.iter()))?;
        Ok(self.last_insert_rowid())
    }

    fn delete_rows(&mut self, table: &str, condition: &Condition) -> Result<u64, Self::Error> {
        let (query, params) = delete_query(table, condition);
        let mut stmt = self.prepare(&query)?;
        let removed = stmt.execute(params_from_iter(params.iter()))?;
        Ok(removed as u64)
    }

    fn query_column(&mut self, query: &str, params: &[Value]) -> Result<Vec<Value>, Self::Error> {
        let mut stmt = self.prepare(query)?;
        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        let mut values = Vec::new();
        while let Some(row) = rows.next()? {
            values.push(from_sql(row.get_ref(0)?));
        }
        Ok(values)
    }
}

impl QueryLedger for RqlConnection {
    fn query_ledger(
        &mut self,
        query: &str,
        params: &[Value],
    ) -> Result<Vec<AppliedMigration>, Self::Error> {
        let mut stmt = self.prepare(query)?;
        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        let mut applied = Vec::new();
        while let Some(row) = rows.next()? {
            let version: String = row.get(0)?;
            let applied_at: i64 = row.get(1)?;
            applied.push(AppliedMigration::new(version, applied_at));
        }
        Ok(applied)
    }
}

impl Ledger for RqlConnection {}
