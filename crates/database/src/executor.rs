//! The seam between query construction and the database driver.
//!
//! Everything above this module speaks in `QueryPlan`s and JSON-object rows;
//! only `PgExecutor` knows about `sqlx` and PostgreSQL column types.

use crate::error::DbError;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use sqlx::postgres::{PgArguments, PgPool, PgRow, Postgres};
use sqlx::{Column, Row as _, TypeInfo};
use std::future::Future;

/// A result row, keyed by column name.
pub type Row = Map<String, Value>;

/// A positional query parameter (`$1`, `$2`, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i32),
    BigInt(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Null,
}

impl From<i32> for SqlParam {
    fn from(v: i32) -> Self {
        SqlParam::Int(v)
    }
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        SqlParam::BigInt(v)
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        SqlParam::Text(v.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(v)
    }
}

impl From<DateTime<Utc>> for SqlParam {
    fn from(v: DateTime<Utc>) -> Self {
        SqlParam::Timestamp(v)
    }
}

impl<T: Into<SqlParam>> From<Option<T>> for SqlParam {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlParam::Null)
    }
}

/// A SQL template together with the values for its placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl QueryPlan {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Appends a parameter and returns its placeholder, e.g. `$3`.
    pub fn push_param(&mut self, param: impl Into<SqlParam>) -> String {
        self.params.push(param.into());
        format!("${}", self.params.len())
    }

    pub fn bind(mut self, param: impl Into<SqlParam>) -> Self {
        self.params.push(param.into());
        self
    }
}

/// Executes query plans against a relational store.
pub trait QueryExecutor: Send + Sync {
    /// Runs a single statement and returns every row it produced.
    fn execute(&self, plan: &QueryPlan) -> impl Future<Output = Result<Vec<Row>, DbError>> + Send;

    /// Runs all statements in one transaction. Either every statement commits or none does.
    fn execute_atomic(
        &self,
        plans: &[QueryPlan],
    ) -> impl Future<Output = Result<Vec<Vec<Row>>, DbError>> + Send;
}

/// The production executor, backed by a shared `PgPool`.
#[derive(Debug, Clone)]
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Closes the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl QueryExecutor for PgExecutor {
    async fn execute(&self, plan: &QueryPlan) -> Result<Vec<Row>, DbError> {
        tracing::debug!(sql = %plan.sql, params = plan.params.len(), "Executing query.");
        let rows = bind_params(plan).fetch_all(&self.pool).await?;
        rows.iter().map(decode_row).collect()
    }

    async fn execute_atomic(&self, plans: &[QueryPlan]) -> Result<Vec<Vec<Row>>, DbError> {
        let mut tx = self.pool.begin().await?;
        let mut results = Vec::with_capacity(plans.len());

        for plan in plans {
            tracing::debug!(
                sql = %plan.sql,
                params = plan.params.len(),
                "Executing query in transaction."
            );
            let rows = bind_params(plan).fetch_all(&mut *tx).await?;
            results.push(rows.iter().map(decode_row).collect::<Result<Vec<_>, _>>()?);
        }

        // Dropping `tx` on any early return above rolls the transaction back.
        tx.commit().await?;
        Ok(results)
    }
}

fn bind_params(plan: &QueryPlan) -> sqlx::query::Query<'_, Postgres, PgArguments> {
    plan.params
        .iter()
        .fold(sqlx::query(&plan.sql), |query, param| match param {
            SqlParam::Int(v) => query.bind(*v),
            SqlParam::BigInt(v) => query.bind(*v),
            SqlParam::Text(v) => query.bind(v.as_str()),
            SqlParam::Timestamp(v) => query.bind(v.naive_utc()),
            SqlParam::Null => query.bind(Option::<String>::None),
        })
}

/// Formats a timestamp the way every row exposes it: RFC 3339, UTC, milliseconds.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn decode_row(row: &PgRow) -> Result<Row, DbError> {
    let mut decoded = Row::new();

    for column in row.columns() {
        let idx = column.ordinal();
        let value = match column.type_info().name() {
            "INT2" => row.try_get::<Option<i16>, _>(idx)?.map(Value::from),
            "INT4" => row.try_get::<Option<i32>, _>(idx)?.map(Value::from),
            "INT8" => row.try_get::<Option<i64>, _>(idx)?.map(Value::from),
            "BOOL" => row.try_get::<Option<bool>, _>(idx)?.map(Value::from),
            "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => {
                row.try_get::<Option<String>, _>(idx)?.map(Value::from)
            }
            "TIMESTAMP" => row
                .try_get::<Option<NaiveDateTime>, _>(idx)?
                .map(|ts| Value::from(format_timestamp(ts.and_utc()))),
            "TIMESTAMPTZ" => row
                .try_get::<Option<DateTime<Utc>>, _>(idx)?
                .map(|ts| Value::from(format_timestamp(ts))),
            other => {
                return Err(DbError::UnsupportedColumn {
                    column: column.name().to_string(),
                    type_name: other.to_string(),
                });
            }
        };
        decoded.insert(column.name().to_string(), value.unwrap_or(Value::Null));
    }

    Ok(decoded)
}
