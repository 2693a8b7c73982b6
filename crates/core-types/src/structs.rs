use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Timestamps go out as RFC 3339 in UTC with millisecond precision.
pub fn serialize_date<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// A subject articles are filed under, identified by its slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub name: String,
    pub avatar_url: String,
}

/// A row of the `articles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub article_id: i32,
    pub author: String,
    pub title: String,
    pub body: String,
    pub topic: String,
    #[serde(serialize_with = "serialize_date")]
    pub created_at: DateTime<Utc>,
    /// May go negative; there is no floor.
    pub votes: i32,
    pub article_img_url: String,
}

/// An article together with the number of comments attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleWithCount {
    #[serde(flatten)]
    pub article: Article,
    pub comment_count: i64,
}

impl ArticleWithCount {
    /// Wraps an article that cannot have comments yet.
    pub fn fresh(article: Article) -> Self {
        Self {
            article,
            comment_count: 0,
        }
    }
}

/// One page of an article listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticlePage {
    pub articles: Vec<ArticleWithCount>,
    pub total_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: i32,
    pub body: String,
    pub article_id: i32,
    pub author: String,
    pub votes: i32,
    #[serde(serialize_with = "serialize_date")]
    pub created_at: DateTime<Utc>,
}
