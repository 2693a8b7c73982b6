//! Turns raw executor rows into response records.

use crate::executor::Row;
use core_types::{ArticlePage, ArticleWithCount, NewsError};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Deserializes one row into a typed record. A mismatch is a server-side fault.
pub fn record<T: DeserializeOwned>(row: Row) -> Result<T, NewsError> {
    serde_json::from_value(Value::Object(row)).map_err(|e| {
        tracing::error!(error = %e, "Row does not match the expected record shape.");
        NewsError::InternalError(format!("malformed row: {e}"))
    })
}

pub fn records<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, NewsError> {
    rows.into_iter().map(record).collect()
}

/// Reads an integer column that may have been delivered as a number or as a
/// numeric string (drivers differ in how they hand back `COUNT(...)`).
pub fn integer(row: &Row, column: &str) -> Result<i64, NewsError> {
    let parsed = match row.get(column) {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| NewsError::InternalError(format!("column `{column}` is not an integer")))
}

pub fn article_with_count(mut row: Row) -> Result<ArticleWithCount, NewsError> {
    let count = integer(&row, "comment_count")?;
    row.insert("comment_count".to_string(), Value::from(count));
    record(row)
}

/// Builds a listing page. `total_count` defaults to the size of the page itself
/// unless the caller supplies a separately counted total.
pub fn article_page(rows: Vec<Row>, matching_total: Option<i64>) -> Result<ArticlePage, NewsError> {
    let articles = rows
        .into_iter()
        .map(article_with_count)
        .collect::<Result<Vec<_>, _>>()?;
    let total_count = matching_total.unwrap_or(articles.len() as i64);
    Ok(ArticlePage {
        articles,
        total_count,
    })
}
