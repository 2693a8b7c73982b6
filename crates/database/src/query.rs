//! SQL construction for every news operation.
//!
//! Values always travel as bound parameters. The only text spliced into a
//! statement is a sort column or direction, and those come from the fixed
//! tokens on `SortColumn` and `SortOrder`.

use crate::executor::QueryPlan;
use core_types::{ArticleListPlan, NewArticle, NewComment, NewTopic, Pagination, SortColumn};
use std::fmt::Write;

const ARTICLE_COLUMNS: &str = "articles.article_id, articles.author, articles.title, articles.body, \
     articles.topic, articles.created_at, articles.votes, articles.article_img_url";

const ARTICLE_RETURNING: &str =
    "article_id, author, title, body, topic, created_at, votes, article_img_url";

const COMMENT_COLUMNS: &str = "comment_id, body, article_id, author, votes, created_at";

fn articles_with_counts() -> String {
    format!(
        "SELECT {ARTICLE_COLUMNS}, COUNT(comments.comment_id) AS comment_count \
         FROM articles LEFT JOIN comments ON comments.article_id = articles.article_id"
    )
}

/// One page of articles with their comment counts, filtered, sorted and paginated.
pub fn list_articles(plan: &ArticleListPlan) -> QueryPlan {
    let mut query = QueryPlan::new(String::new());
    let mut sql = articles_with_counts();

    if let Some(topic) = &plan.topic {
        let placeholder = query.push_param(topic.as_str());
        let _ = write!(sql, " WHERE articles.topic = {placeholder}");
    }

    let column = plan.sort_by.sql_column();
    let direction = plan.order.sql_keyword();
    let _ = write!(sql, " GROUP BY articles.article_id ORDER BY {column} {direction}");
    // Ties fall back to the primary key so identical requests page identically.
    if plan.sort_by != SortColumn::ArticleId {
        let _ = write!(sql, ", articles.article_id {direction}");
    }

    push_pagination(&mut query, &mut sql, &plan.pagination);
    query.sql = sql;
    query
}

/// The number of articles matching an optional topic filter, ignoring pagination.
pub fn count_articles(topic: Option<&str>) -> QueryPlan {
    match topic {
        Some(topic) => QueryPlan::new(
            "SELECT COUNT(*) AS total_count FROM articles WHERE articles.topic = $1",
        )
        .bind(topic),
        None => QueryPlan::new("SELECT COUNT(*) AS total_count FROM articles"),
    }
}

pub fn article_by_id(article_id: i32) -> QueryPlan {
    QueryPlan::new(format!(
        "{} WHERE articles.article_id = $1 GROUP BY articles.article_id",
        articles_with_counts()
    ))
    .bind(article_id)
}

pub fn article_exists(article_id: i32) -> QueryPlan {
    QueryPlan::new("SELECT article_id FROM articles WHERE article_id = $1").bind(article_id)
}

/// Newest-first comments of one article.
pub fn article_comments(article_id: i32, pagination: &Pagination) -> QueryPlan {
    let mut query = QueryPlan::new(String::new());
    let placeholder = query.push_param(article_id);
    let mut sql = format!(
        "SELECT {COMMENT_COLUMNS} FROM comments WHERE article_id = {placeholder} \
         ORDER BY created_at DESC, comment_id DESC"
    );
    push_pagination(&mut query, &mut sql, pagination);
    query.sql = sql;
    query
}

fn push_pagination(query: &mut QueryPlan, sql: &mut String, pagination: &Pagination) {
    let limit = query.push_param(i64::from(pagination.limit));
    let offset = query.push_param(pagination.offset());
    let _ = write!(sql, " LIMIT {limit} OFFSET {offset}");
}

pub fn insert_comment(article_id: i32, comment: &NewComment) -> QueryPlan {
    QueryPlan::new(format!(
        "INSERT INTO comments (body, article_id, author) VALUES ($1, $2, $3) \
         RETURNING {COMMENT_COLUMNS}"
    ))
    .bind(comment.body.as_str())
    .bind(article_id)
    .bind(comment.author.as_str())
}

pub fn update_article_votes(article_id: i32, delta: i32) -> QueryPlan {
    QueryPlan::new(format!(
        "UPDATE articles SET votes = votes + $1 WHERE article_id = $2 RETURNING {ARTICLE_RETURNING}"
    ))
    .bind(delta)
    .bind(article_id)
}

pub fn update_comment_votes(comment_id: i32, delta: i32) -> QueryPlan {
    QueryPlan::new(format!(
        "UPDATE comments SET votes = votes + $1 WHERE comment_id = $2 RETURNING {COMMENT_COLUMNS}"
    ))
    .bind(delta)
    .bind(comment_id)
}

pub fn delete_comment(comment_id: i32) -> QueryPlan {
    QueryPlan::new("DELETE FROM comments WHERE comment_id = $1").bind(comment_id)
}

/// Dependent comments first, then the article. Must run as one transaction.
pub fn delete_article(article_id: i32) -> [QueryPlan; 2] {
    [
        QueryPlan::new("DELETE FROM comments WHERE article_id = $1").bind(article_id),
        QueryPlan::new("DELETE FROM articles WHERE article_id = $1 RETURNING article_id")
            .bind(article_id),
    ]
}

pub fn insert_article(article: &NewArticle) -> QueryPlan {
    let plan = match &article.article_img_url {
        Some(_) => QueryPlan::new(format!(
            "INSERT INTO articles (author, title, body, topic, article_img_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {ARTICLE_RETURNING}"
        )),
        None => QueryPlan::new(format!(
            "INSERT INTO articles (author, title, body, topic) \
             VALUES ($1, $2, $3, $4) RETURNING {ARTICLE_RETURNING}"
        )),
    };
    let plan = plan
        .bind(article.author.as_str())
        .bind(article.title.as_str())
        .bind(article.body.as_str())
        .bind(article.topic.as_str());
    match &article.article_img_url {
        Some(url) => plan.bind(url.as_str()),
        None => plan,
    }
}

pub fn insert_topic(topic: &NewTopic) -> QueryPlan {
    QueryPlan::new(
        "INSERT INTO topics (slug, description) VALUES ($1, $2) RETURNING slug, description",
    )
        .bind(topic.slug.as_str())
        .bind(topic.description.as_str())
}

pub fn all_topics() -> QueryPlan {
    QueryPlan::new("SELECT slug, description FROM topics ORDER BY slug ASC")
}

pub fn all_users() -> QueryPlan {
    QueryPlan::new("SELECT username, name, avatar_url FROM users ORDER BY username ASC")
}

pub fn user_by_username(username: &str) -> QueryPlan {
    QueryPlan::new("SELECT username, name, avatar_url FROM users WHERE username = $1")
        .bind(username)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::SqlParam;
    use core_types::{ArticleListParams, SortOrder};

    fn plan(raw: ArticleListParams) -> ArticleListPlan {
        raw.validate(10).unwrap()
    }

    #[test]
    fn default_listing_sorts_newest_first_with_stable_ties() {
        let query = list_articles(&plan(ArticleListParams::default()));
        assert!(query.sql.starts_with("SELECT articles.article_id"));
        assert!(query.sql.contains("COUNT(comments.comment_id) AS comment_count"));
        assert!(query.sql.contains("LEFT JOIN comments"));
        assert!(!query.sql.contains("WHERE"));
        assert!(query.sql.contains(
            "GROUP BY articles.article_id ORDER BY articles.created_at DESC, articles.article_id DESC"
        ));
        assert!(query.sql.ends_with("LIMIT $1 OFFSET $2"));
        assert_eq!(query.params, vec![SqlParam::BigInt(10), SqlParam::BigInt(0)]);
    }

    #[test]
    fn topic_is_bound_not_inlined() {
        let query = list_articles(&plan(ArticleListParams {
            topic: Some("cats'; DROP TABLE articles; --".into()),
            ..Default::default()
        }));
        assert!(query.sql.contains("WHERE articles.topic = $1"));
        assert!(!query.sql.contains("DROP"));
        assert_eq!(
            query.params[0],
            SqlParam::Text("cats'; DROP TABLE articles; --".into())
        );
        assert!(query.sql.ends_with("LIMIT $2 OFFSET $3"));
    }

    #[test]
    fn every_sort_column_uses_its_trusted_token() {
        for column in SortColumn::ALL {
            for order in [SortOrder::Asc, SortOrder::Desc] {
                let query = list_articles(&ArticleListPlan {
                    topic: None,
                    sort_by: column,
                    order,
                    pagination: Pagination { limit: 10, page: 1 },
                });
                let clause = format!("ORDER BY {} {}", column.sql_column(), order.sql_keyword());
                assert!(query.sql.contains(&clause), "{}", query.sql);
            }
        }
    }

    #[test]
    fn sorting_by_id_needs_no_tie_breaker() {
        let query = list_articles(&plan(ArticleListParams {
            sort_by: Some("article_id".into()),
            order: Some("asc".into()),
            ..Default::default()
        }));
        assert!(query.sql.contains("ORDER BY articles.article_id ASC LIMIT"));
    }

    #[test]
    fn pagination_binds_limit_and_offset() {
        let query = list_articles(&plan(ArticleListParams {
            limit: Some("5".into()),
            page: Some("3".into()),
            ..Default::default()
        }));
        assert_eq!(query.params, vec![SqlParam::BigInt(5), SqlParam::BigInt(10)]);
    }

    #[test]
    fn count_query_follows_the_filter() {
        assert!(count_articles(None).params.is_empty());
        let filtered = count_articles(Some("cats"));
        assert!(filtered.sql.contains("WHERE articles.topic = $1"));
        assert_eq!(filtered.params, vec![SqlParam::Text("cats".into())]);
    }

    #[test]
    fn single_article_groups_by_id() {
        let query = article_by_id(3);
        assert!(query.sql.contains("WHERE articles.article_id = $1 GROUP BY articles.article_id"));
        assert_eq!(query.params, vec![SqlParam::Int(3)]);
    }

    #[test]
    fn comments_are_newest_first_and_paginated() {
        let query = article_comments(1, &Pagination { limit: 2, page: 2 });
        assert!(query.sql.contains("WHERE article_id = $1"));
        assert!(query.sql.contains("ORDER BY created_at DESC, comment_id DESC"));
        assert!(query.sql.ends_with("LIMIT $2 OFFSET $3"));
        assert_eq!(
            query.params,
            vec![SqlParam::Int(1), SqlParam::BigInt(2), SqlParam::BigInt(2)]
        );
    }

    #[test]
    fn votes_are_incremented_in_place() {
        let query = update_article_votes(1, -60);
        assert!(
            query
                .sql
                .starts_with("UPDATE articles SET votes = votes + $1 WHERE article_id = $2")
        );
        assert_eq!(query.params, vec![SqlParam::Int(-60), SqlParam::Int(1)]);

        let query = update_comment_votes(4, 1);
        assert!(
            query
                .sql
                .starts_with("UPDATE comments SET votes = votes + $1 WHERE comment_id = $2")
        );
    }

    #[test]
    fn article_delete_removes_comments_first() {
        let [comments, article] = delete_article(9);
        assert!(comments.sql.starts_with("DELETE FROM comments"));
        assert!(article.sql.starts_with("DELETE FROM articles"));
        assert!(article.sql.ends_with("RETURNING article_id"));
        assert_eq!(comments.params, article.params);
    }

    #[test]
    fn article_insert_only_names_the_image_when_given() {
        let mut article = NewArticle {
            author: "icellusedkars".into(),
            title: "Sony Vaio".into(),
            body: "Text".into(),
            topic: "mitch".into(),
            article_img_url: None,
        };
        let query = insert_article(&article);
        assert!(!query.sql.contains("article_img_url)"));
        assert_eq!(query.params.len(), 4);

        article.article_img_url = Some("https://example.com/a.png".into());
        let query = insert_article(&article);
        assert!(query.sql.contains("topic, article_img_url)"));
        assert_eq!(query.params.len(), 5);
    }

    #[test]
    fn comment_insert_binds_in_column_order() {
        let query = insert_comment(
            2,
            &NewComment {
                author: "lurker".into(),
                body: "First!".into(),
            },
        );
        assert_eq!(
            query.params,
            vec![
                SqlParam::Text("First!".into()),
                SqlParam::Int(2),
                SqlParam::Text("lurker".into()),
            ]
        );
    }
}
