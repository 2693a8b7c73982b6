use crate::error::NewsError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The article columns a listing may be sorted by.
///
/// Each variant maps to a fixed, fully-qualified column token, so the value
/// placed into an `ORDER BY` clause never comes from request text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    ArticleId,
    Title,
    Topic,
    Author,
    Body,
    #[default]
    CreatedAt,
    Votes,
    ArticleImgUrl,
}

impl SortColumn {
    pub const ALL: [SortColumn; 8] = [
        SortColumn::ArticleId,
        SortColumn::Title,
        SortColumn::Topic,
        SortColumn::Author,
        SortColumn::Body,
        SortColumn::CreatedAt,
        SortColumn::Votes,
        SortColumn::ArticleImgUrl,
    ];

    /// The query-string spelling of this column.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::ArticleId => "article_id",
            SortColumn::Title => "title",
            SortColumn::Topic => "topic",
            SortColumn::Author => "author",
            SortColumn::Body => "body",
            SortColumn::CreatedAt => "created_at",
            SortColumn::Votes => "votes",
            SortColumn::ArticleImgUrl => "article_img_url",
        }
    }

    /// The trusted SQL token for this column.
    pub fn sql_column(&self) -> &'static str {
        match self {
            SortColumn::ArticleId => "articles.article_id",
            SortColumn::Title => "articles.title",
            SortColumn::Topic => "articles.topic",
            SortColumn::Author => "articles.author",
            SortColumn::Body => "articles.body",
            SortColumn::CreatedAt => "articles.created_at",
            SortColumn::Votes => "articles.votes",
            SortColumn::ArticleImgUrl => "articles.article_img_url",
        }
    }
}

impl FromStr for SortColumn {
    type Err = NewsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortColumn::ALL
            .into_iter()
            .find(|column| column.as_str() == s)
            .ok_or_else(|| NewsError::UnknownSortColumn(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn sql_keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = NewsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(NewsError::InvalidOrder(s.to_string())),
        }
    }
}

/// What `total_count` reports on an article listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TotalCountMode {
    /// Number of articles in the returned page.
    #[default]
    Page,
    /// Number of articles matching the filter, across all pages.
    Matching,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_whitelisted_column_parses_back_to_itself() {
        for column in SortColumn::ALL {
            assert_eq!(column.as_str().parse::<SortColumn>().unwrap(), column);
            assert!(column.sql_column().starts_with("articles."));
        }
    }

    #[test]
    fn unknown_column_is_rejected() {
        let err = "banana".parse::<SortColumn>().unwrap_err();
        assert!(matches!(err, NewsError::UnknownSortColumn(ref c) if c == "banana"));
    }

    #[test]
    fn column_names_are_case_sensitive() {
        assert!("Votes".parse::<SortColumn>().is_err());
    }

    #[test]
    fn order_is_lowercase_only() {
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        for raw in ["ASC", "Desc", "colour"] {
            assert_eq!(
                raw.parse::<SortOrder>(),
                Err(NewsError::InvalidOrder(raw.to_string()))
            );
        }
    }

    #[test]
    fn total_count_mode_reads_from_lowercase() {
        let mode: TotalCountMode = serde_json::from_str("\"matching\"").unwrap();
        assert_eq!(mode, TotalCountMode::Matching);
        assert_eq!(TotalCountMode::default(), TotalCountMode::Page);
    }
}
