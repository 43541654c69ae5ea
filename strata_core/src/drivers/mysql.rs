use crate::executor::{delete_query, insert_query, Condition, Executor, Value};
use crate::traits::sync::{Ledger, QueryLedger};
use crate::AppliedMigration;

use mysql::{
    error::Error as MError, from_row_opt, prelude::Queryable, Conn, Params, PooledConn,
    Value as MValue,
};

impl From<&Value> for MValue {
    fn from(value: &Value) -> MValue {
        match value {
            Value::Null => MValue::NULL,
            Value::Bool(value) => MValue::Int(i64::from(*value)),
            Value::Int(value) => MValue::Int(*value),
            Value::Float(value) => MValue::Double(*value),
            Value::Text(value) => MValue::Bytes(value.as_bytes().to_vec()),
        }
    }
}

fn from_mysql(value: &MValue) -> Value {
    match value {
        MValue::NULL => Value::Null,
        MValue::Int(value) => Value::Int(*value),
        MValue::UInt(value) => Value::Int(*value as i64),
        MValue::Float(value) => Value::Float(f64::from(*value)),
        MValue::Double(value) => Value::Float(*value),
        MValue::Bytes(value) => Value::Text(String::from_utf8_lossy(value).into_owned()),
        // dates and times come back as their SQL literal, quotes stripped
        other => Value::Text(other.as_sql(true).trim_matches('\'').to_string()),
    }
}

fn params(values: &[Value]) -> Params {
    if values.is_empty() {
        Params::Empty
    } else {
        Params::Positional(values.iter().map(MValue::from).collect())
    }
}

fn execute(conn: &mut Conn, sql: &str) -> Result<usize, MError> {
    conn.query_drop(sql)?;
    Ok(conn.affected_rows() as usize)
}

fn insert_row(conn: &mut Conn, table: &str, values: &[(&str, Value)]) -> Result<i64, MError> {
    let (query, values) = insert_query(table, values);
    conn.exec_drop(query, params(&values))?;
    Ok(conn.last_insert_id() as i64)
}

fn delete_rows(conn: &mut Conn, table: &str, condition: &Condition) -> Result<u64, MError> {
    let (query, values) = delete_query(table, condition);
    conn.exec_drop(query, params(&values))?;
    Ok(conn.affected_rows())
}

fn query_column(conn: &mut Conn, query: &str, values: &[Value]) -> Result<Vec<Value>, MError> {
    let rows = conn.exec_iter(query, params(values))?;
    let mut result = Vec::new();
    for row in rows {
        let row = row?;
        result.push(row.as_ref(0).map(from_mysql).unwrap_or(Value::Null));
    }
    Ok(result)
}

fn query_applied_migrations(
    conn: &mut Conn,
    query: &str,
    values: &[Value],
) -> Result<Vec<AppliedMigration>, MError> {
    let rows = conn.exec_iter(query, params(values))?;
    let mut applied = Vec::new();
    for row in rows {
        let (version, applied_at): (String, i64) = from_row_opt(row?)?;
        applied.push(AppliedMigration::new(version, applied_at));
    }
    Ok(applied)
}

impl Executor for Conn {
    type Error = MError;

    fn execute(&mut self, sql: &str) -> Result<usize, Self::Error> {
        execute(self, sql)
    }

    fn insert_row(&mut self, table: &str, values: &[(&str, Value)]) -> Result<i64, Self::Error> {
        insert_row(self, table, values)
    }

    fn delete_rows(&mut self, table: &str, condition: &Condition) -> Result<u64, Self::Error> {
        delete_rows(self, table, condition)
    }

    fn query_column(&mut self, query: &str, params: &[Value]) -> Result<Vec<Value>, Self::Error> {
        query_column(self, query, params)
    }
}

// PooledConn derefs to Conn only immutably, the helpers reach the connection through as_mut
impl Executor for PooledConn {
    type Error = MError;

    fn execute(&mut self, sql: &str) -> Result<usize, Self::Error> {
        execute(self.as_mut(), sql)
    }

    fn insert_row(&mut self, table: &str, values: &[(&str, Value)]) -> Result<i64, Self::Error> {
        insert_row(self.as_mut(), table, values)
    }

    fn delete_rows(&mut self, table: &str, condition: &Condition) -> Result<u64, Self::Error> {
        delete_rows(self.as_mut(), table, condition)
    }

    fn query_column(&mut self, query: &str, params: &[Value]) -> Result<Vec<Value>, Self::Error> {
        query_column(self.as_mut(), query, params)
    }
}

impl QueryLedger for Conn {
    fn query_ledger(
        &mut self,
        query: &str,
        params: &[Value],
    ) -> Result<Vec<AppliedMigration>, Self::Error> {
        query_applied_migrations(self, query, params)
    }
}

impl QueryLedger for PooledConn {
    fn query_ledger(
        &mut self,
        query: &str,
        params: &[Value],
    ) -> Result<Vec<AppliedMigration>, Self::Error> {
        query_applied_migrations(self.as_mut(), query, params)
    }
}

impl Ledger for Conn {}
impl Ledger for PooledConn {}
