//! Validation and defaulting of listing query parameters.
//!
//! Raw parameters arrive as optional strings exactly as the client sent them.
//! Nothing here touches storage: a plan either comes out fully validated or
//! the request is rejected before any query is built.

use crate::enums::{SortColumn, SortOrder};
use crate::error::NewsError;
use serde::Deserialize;

/// Page size used when a request does not supply `limit`.
pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_PAGE: u32 = 1;

/// Raw query parameters of `GET /api/articles`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleListParams {
    pub topic: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub limit: Option<String>,
    #[serde(alias = "p")]
    pub page: Option<String>,
}

/// Raw query parameters of `GET /api/articles/:article_id/comments`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentListParams {
    pub limit: Option<String>,
    #[serde(alias = "p")]
    pub page: Option<String>,
}

/// A validated 1-based page of `limit` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u32,
    pub page: u32,
}

impl Pagination {
    pub fn new(
        limit: Option<&str>,
        page: Option<&str>,
        default_limit: u32,
    ) -> Result<Self, NewsError> {
        let limit = match limit {
            Some(raw) => {
                positive_integer(raw).ok_or_else(|| NewsError::InvalidLimit(raw.to_string()))?
            }
            None => default_limit,
        };
        let page = match page {
            Some(raw) => {
                positive_integer(raw).ok_or_else(|| NewsError::InvalidPage(raw.to_string()))?
            }
            None => DEFAULT_PAGE,
        };
        Ok(Self { limit, page })
    }

    /// Rows skipped before this page begins, saturating at `i64::MAX`.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1).saturating_mul(i64::from(self.limit))
    }
}

/// A fully validated article listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleListPlan {
    pub topic: Option<String>,
    pub sort_by: SortColumn,
    pub order: SortOrder,
    pub pagination: Pagination,
}

impl ArticleListParams {
    /// Checks limit, page, sort column and order, in that order.
    pub fn validate(&self, default_limit: u32) -> Result<ArticleListPlan, NewsError> {
        let pagination =
            Pagination::new(self.limit.as_deref(), self.page.as_deref(), default_limit)?;
        let sort_by = match self.sort_by.as_deref() {
            Some(raw) => raw.parse()?,
            None => SortColumn::default(),
        };
        let order = match self.order.as_deref() {
            Some(raw) => raw.parse()?,
            None => SortOrder::default(),
        };
        Ok(ArticleListPlan {
            topic: self.topic.clone(),
            sort_by,
            order,
            pagination,
        })
    }
}

impl CommentListParams {
    pub fn validate(&self, default_limit: u32) -> Result<Pagination, NewsError> {
        Pagination::new(self.limit.as_deref(), self.page.as_deref(), default_limit)
    }
}

/// Parses a path id.
///
/// Text that is not an integer is `InvalidId`. An integer too large for the
/// key column yields `None`: it is a valid id that no row can carry.
pub fn parse_id(raw: &str) -> Result<Option<i32>, NewsError> {
    if let Ok(id) = raw.parse::<i32>() {
        return Ok(Some(id));
    }
    let digits = raw.strip_prefix(['-', '+']).unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Ok(None)
    } else {
        Err(NewsError::InvalidId(raw.to_string()))
    }
}

fn positive_integer(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<&str>, page: Option<&str>) -> ArticleListParams {
        ArticleListParams {
            limit: limit.map(str::to_string),
            page: page.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_apply_when_nothing_is_given() {
        let plan = ArticleListParams::default().validate(DEFAULT_LIMIT).unwrap();
        assert_eq!(plan.topic, None);
        assert_eq!(plan.sort_by, SortColumn::CreatedAt);
        assert_eq!(plan.order, SortOrder::Desc);
        assert_eq!(plan.pagination, Pagination { limit: 10, page: 1 });
        assert_eq!(plan.pagination.offset(), 0);
    }

    #[test]
    fn configured_default_limit_is_honoured() {
        let plan = ArticleListParams::default().validate(25).unwrap();
        assert_eq!(plan.pagination.limit, 25);
    }

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        let plan = params(Some("5"), Some("3")).validate(DEFAULT_LIMIT).unwrap();
        assert_eq!(plan.pagination.offset(), 10);
    }

    #[test]
    fn offset_saturates_for_huge_pages() {
        let pagination = Pagination::new(Some("4294967295"), Some("4294967295"), 10).unwrap();
        assert_eq!(pagination.offset(), i64::MAX);
    }

    #[test]
    fn bad_limits_are_rejected() {
        for raw in ["0", "abc", "-1", "5abc", "", "1.5"] {
            let err = params(Some(raw), None).validate(DEFAULT_LIMIT).unwrap_err();
            assert_eq!(err, NewsError::InvalidLimit(raw.to_string()), "limit {raw:?}");
        }
    }

    #[test]
    fn bad_pages_are_rejected() {
        for raw in ["0", "abc", "-3"] {
            let err = params(None, Some(raw)).validate(DEFAULT_LIMIT).unwrap_err();
            assert_eq!(err, NewsError::InvalidPage(raw.to_string()), "page {raw:?}");
        }
    }

    #[test]
    fn limit_is_checked_before_sort_column() {
        let raw = ArticleListParams {
            limit: Some("0".into()),
            sort_by: Some("banana".into()),
            ..Default::default()
        };
        assert!(matches!(raw.validate(DEFAULT_LIMIT), Err(NewsError::InvalidLimit(_))));
    }

    #[test]
    fn sort_and_order_are_whitelisted() {
        let raw = ArticleListParams {
            sort_by: Some("banana".into()),
            ..Default::default()
        };
        assert_eq!(
            raw.validate(DEFAULT_LIMIT).unwrap_err(),
            NewsError::UnknownSortColumn("banana".into())
        );

        let raw = ArticleListParams {
            order: Some("colour".into()),
            ..Default::default()
        };
        assert_eq!(
            raw.validate(DEFAULT_LIMIT).unwrap_err(),
            NewsError::InvalidOrder("colour".into())
        );
    }

    #[test]
    fn page_accepts_the_short_alias() {
        let raw: ArticleListParams = serde_json::from_str(r#"{"p": "2", "limit": "3"}"#).unwrap();
        let plan = raw.validate(DEFAULT_LIMIT).unwrap();
        assert_eq!(plan.pagination, Pagination { limit: 3, page: 2 });
    }

    #[test]
    fn ids_must_be_integers() {
        assert_eq!(parse_id("1").unwrap(), Some(1));
        assert_eq!(parse_id("9999").unwrap(), Some(9999));
        for raw in ["banana", "1.0", "", "-", "12abc", "0x10"] {
            assert_eq!(parse_id(raw), Err(NewsError::InvalidId(raw.to_string())), "{raw:?}");
        }
    }

    #[test]
    fn oversized_ids_are_numeric_but_unmatchable() {
        assert_eq!(parse_id("3000000000").unwrap(), None);
        assert_eq!(parse_id("-3000000000").unwrap(), None);
        assert_eq!(parse_id("99999999999999999999999").unwrap(), None);
    }

    #[test]
    fn order_must_be_lowercase() {
        for raw in ["ASC", "Desc"] {
            let params = ArticleListParams {
                order: Some(raw.into()),
                ..Default::default()
            };
            assert_eq!(
                params.validate(DEFAULT_LIMIT).unwrap_err(),
                NewsError::InvalidOrder(raw.into())
            );
        }
    }
}
