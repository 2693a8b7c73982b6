//! Request payloads and their validation.
//!
//! Payload structs mirror the JSON a client sends, with every field optional so
//! that an absent field becomes a `MissingField` error rather than a parse failure.

use crate::error::NewsError;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentPayload {
    pub username: Option<String>,
    pub body: Option<String>,
}

/// A comment ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub author: String,
    pub body: String,
}

impl TryFrom<CommentPayload> for NewComment {
    type Error = NewsError;

    fn try_from(payload: CommentPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            author: required("username", payload.username)?,
            body: required("body", payload.body)?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticlePayload {
    pub author: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub topic: Option<String>,
    pub article_img_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub author: String,
    pub title: String,
    pub body: String,
    pub topic: String,
    /// Falls back to the column default when absent.
    pub article_img_url: Option<String>,
}

impl TryFrom<ArticlePayload> for NewArticle {
    type Error = NewsError;

    fn try_from(payload: ArticlePayload) -> Result<Self, Self::Error> {
        Ok(Self {
            author: required("author", payload.author)?,
            title: required("title", payload.title)?,
            body: required("body", payload.body)?,
            topic: required("topic", payload.topic)?,
            article_img_url: payload.article_img_url.filter(|url| !url.trim().is_empty()),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopicPayload {
    pub slug: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTopic {
    pub slug: String,
    pub description: String,
}

impl TryFrom<TopicPayload> for NewTopic {
    type Error = NewsError;

    fn try_from(payload: TopicPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            slug: required("slug", payload.slug)?,
            description: required("description", payload.description)?,
        })
    }
}

/// Body of a vote PATCH. `inc_votes` is kept as raw JSON so that a string or a
/// fraction is reported as an invalid field instead of an unreadable body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoteUpdate {
    pub inc_votes: Option<Value>,
}

impl VoteUpdate {
    pub fn by(delta: i32) -> Self {
        Self {
            inc_votes: Some(Value::from(delta)),
        }
    }

    pub fn delta(&self) -> Result<i32, NewsError> {
        match &self.inc_votes {
            None | Some(Value::Null) => Err(NewsError::MissingField("inc_votes".to_string())),
            Some(value) => value
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| NewsError::InvalidField("inc_votes".to_string())),
        }
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, NewsError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| NewsError::MissingField(field.to_string()))
}
