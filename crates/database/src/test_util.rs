//! An in-memory `QueryExecutor` for tests.
//!
//! `ScriptedExecutor` replays queued responses in order and records every plan
//! it was asked to run, which lets tests assert both on what reached storage
//! and on how the caller handled the answer.

use crate::error::DbError;
use crate::executor::{QueryExecutor, QueryPlan, Row};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Script {
    responses: VecDeque<Result<Vec<Row>, DbError>>,
    executed: Vec<QueryPlan>,
    commits: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedExecutor {
    script: Arc<Mutex<Script>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues rows for the next statement. Unscripted statements return no rows.
    pub fn respond(&self, rows: Vec<Row>) -> &Self {
        self.lock().responses.push_back(Ok(rows));
        self
    }

    pub fn fail(&self, err: DbError) -> &Self {
        self.lock().responses.push_back(Err(err));
        self
    }

    /// Every plan received so far, including those of rolled-back transactions.
    pub fn executed(&self) -> Vec<QueryPlan> {
        self.lock().executed.clone()
    }

    /// Number of `execute_atomic` calls that ran to completion.
    pub fn commits(&self) -> usize {
        self.lock().commits
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        // A test that panicked while holding the lock has already failed.
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn next(&self, plan: &QueryPlan) -> Result<Vec<Row>, DbError> {
        let mut script = self.lock();
        script.executed.push(plan.clone());
        script.responses.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

impl QueryExecutor for ScriptedExecutor {
    async fn execute(&self, plan: &QueryPlan) -> Result<Vec<Row>, DbError> {
        self.next(plan)
    }

    async fn execute_atomic(&self, plans: &[QueryPlan]) -> Result<Vec<Vec<Row>>, DbError> {
        let results = plans
            .iter()
            .map(|plan| self.next(plan))
            .collect::<Result<Vec<_>, _>>()?;
        self.lock().commits += 1;
        Ok(results)
    }
}

/// Builds a row from a JSON object literal.
///
/// # Panics
/// If `value` is not an object.
pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object for a row, got {other}"),
    }
}
