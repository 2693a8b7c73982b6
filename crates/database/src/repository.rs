use crate::classifier::{classify, expect_row};
use crate::executor::{PgExecutor, QueryExecutor, QueryPlan, Row};
use crate::{query, shaping};
use core_types::params::parse_id;
use core_types::{
    Article, ArticleListParams, ArticlePage, ArticlePayload, ArticleWithCount, Comment,
    CommentListParams, CommentPayload, DEFAULT_LIMIT, NewArticle, NewComment, NewTopic, NewsError,
    Topic, TopicPayload, TotalCountMode, User, VoteUpdate,
};

/// Tunables that change how listings are answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuerySettings {
    /// Page size when a request omits `limit`.
    pub default_limit: u32,
    pub total_count: TotalCountMode,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            total_count: TotalCountMode::default(),
        }
    }
}

/// The `NewsRepository` provides the news operations the HTTP layer calls into.
/// It validates raw request input, builds the SQL, runs it through the injected
/// executor and shapes the rows into response records.
#[derive(Debug, Clone)]
pub struct NewsRepository<E = PgExecutor> {
    executor: E,
    settings: QuerySettings,
}

impl<E: QueryExecutor> NewsRepository<E> {
    /// Creates a new `NewsRepository` with default query settings.
    pub fn new(executor: E) -> Self {
        Self::with_settings(executor, QuerySettings::default())
    }

    pub fn with_settings(executor: E, settings: QuerySettings) -> Self {
        Self { executor, settings }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn settings(&self) -> &QuerySettings {
        &self.settings
    }

    async fn fetch(&self, plan: &QueryPlan) -> Result<Vec<Row>, NewsError> {
        self.executor.execute(plan).await.map_err(classify)
    }

    async fn fetch_one(&self, plan: &QueryPlan, not_found: NewsError) -> Result<Row, NewsError> {
        expect_row(self.executor.execute(plan).await, not_found)
    }

    // --- Topics ---

    pub async fn list_topics(&self) -> Result<Vec<Topic>, NewsError> {
        let rows = self.fetch(&query::all_topics()).await?;
        shaping::records(rows)
    }

    pub async fn create_topic(&self, payload: TopicPayload) -> Result<Topic, NewsError> {
        let topic = NewTopic::try_from(payload)?;
        let row = self
            .fetch_one(&query::insert_topic(&topic), internal("insert returned no row"))
            .await?;
        tracing::info!(slug = %topic.slug, "Topic created.");
        shaping::record(row)
    }

    // --- Articles ---

    /// Lists one page of articles. `total_count` follows `QuerySettings::total_count`.
    pub async fn list_articles(
        &self,
        params: &ArticleListParams,
    ) -> Result<ArticlePage, NewsError> {
        let plan = params.validate(self.settings.default_limit)?;
        let rows = self.fetch(&query::list_articles(&plan)).await?;

        let matching_total = match self.settings.total_count {
            TotalCountMode::Page => None,
            TotalCountMode::Matching => {
                let row = self
                    .fetch_one(
                        &query::count_articles(plan.topic.as_deref()),
                        internal("count returned no row"),
                    )
                    .await?;
                Some(shaping::integer(&row, "total_count")?)
            }
        };

        shaping::article_page(rows, matching_total)
    }

    pub async fn get_article(&self, article_id: &str) -> Result<ArticleWithCount, NewsError> {
        let Some(article_id) = parse_id(article_id)? else {
            return Err(NewsError::ArticleNotFound);
        };
        let row = self
            .fetch_one(&query::article_by_id(article_id), NewsError::ArticleNotFound)
            .await?;
        shaping::article_with_count(row)
    }

    /// Inserts an article. The response carries `comment_count: 0`, since
    /// nothing can have commented on it yet.
    pub async fn create_article(
        &self,
        payload: ArticlePayload,
    ) -> Result<ArticleWithCount, NewsError> {
        let article = NewArticle::try_from(payload)?;
        let row = self
            .fetch_one(&query::insert_article(&article), internal("insert returned no row"))
            .await?;
        let created: Article = shaping::record(row)?;
        tracing::info!(article_id = created.article_id, "Article created.");
        Ok(ArticleWithCount::fresh(created))
    }

    pub async fn update_article_votes(
        &self,
        article_id: &str,
        update: &VoteUpdate,
    ) -> Result<Article, NewsError> {
        let article_id = parse_id(article_id)?;
        let delta = update.delta()?;
        let Some(article_id) = article_id else {
            return Err(NewsError::ArticleNotFound);
        };
        let row = self
            .fetch_one(
                &query::update_article_votes(article_id, delta),
                NewsError::ArticleNotFound,
            )
            .await?;
        shaping::record(row)
    }

    /// Deletes an article and its comments in one transaction.
    pub async fn delete_article(&self, article_id: &str) -> Result<(), NewsError> {
        let Some(article_id) = parse_id(article_id)? else {
            return Err(NewsError::ArticleNotFound);
        };
        let results = self
            .executor
            .execute_atomic(&query::delete_article(article_id))
            .await
            .map_err(classify)?;

        let deleted = results.last().is_some_and(|rows| !rows.is_empty());
        if !deleted {
            return Err(NewsError::ArticleNotFound);
        }
        tracing::info!(article_id, "Article deleted with its comments.");
        Ok(())
    }

    // --- Comments ---

    /// Lists comments of an existing article, newest first. An article without
    /// comments yields an empty list; a missing article is `ArticleNotFound`.
    pub async fn list_article_comments(
        &self,
        article_id: &str,
        params: &CommentListParams,
    ) -> Result<Vec<Comment>, NewsError> {
        let article_id = parse_id(article_id)?;
        let pagination = params.validate(self.settings.default_limit)?;
        let Some(article_id) = article_id else {
            return Err(NewsError::ArticleNotFound);
        };

        self.fetch_one(&query::article_exists(article_id), NewsError::ArticleNotFound)
            .await?;
        let rows = self
            .fetch(&query::article_comments(article_id, &pagination))
            .await?;
        shaping::records(rows)
    }

    pub async fn create_comment(
        &self,
        article_id: &str,
        payload: CommentPayload,
    ) -> Result<Comment, NewsError> {
        let article_id = parse_id(article_id)?;
        let comment = NewComment::try_from(payload)?;
        let Some(article_id) = article_id else {
            return Err(NewsError::ArticleNotFound);
        };
        let row = self
            .fetch_one(
                &query::insert_comment(article_id, &comment),
                NewsError::ArticleNotFound,
            )
            .await?;
        shaping::record(row)
    }

    pub async fn update_comment_votes(
        &self,
        comment_id: &str,
        update: &VoteUpdate,
    ) -> Result<Comment, NewsError> {
        let comment_id = parse_id(comment_id)?;
        let delta = update.delta()?;
        let Some(comment_id) = comment_id else {
            return Err(NewsError::CommentNotFound);
        };
        let row = self
            .fetch_one(
                &query::update_comment_votes(comment_id, delta),
                NewsError::CommentNotFound,
            )
            .await?;
        shaping::record(row)
    }

    /// Deletes a comment. Deleting an id that does not exist is not an error.
    pub async fn delete_comment(&self, comment_id: &str) -> Result<(), NewsError> {
        // An id beyond the key range cannot match a row, so there is nothing to delete.
        if let Some(comment_id) = parse_id(comment_id)? {
            self.fetch(&query::delete_comment(comment_id)).await?;
        }
        Ok(())
    }

    // --- Users ---

    pub async fn list_users(&self) -> Result<Vec<User>, NewsError> {
        let rows = self.fetch(&query::all_users()).await?;
        shaping::records(rows)
    }

    pub async fn get_user(&self, username: &str) -> Result<User, NewsError> {
        let row = self
            .fetch_one(&query::user_by_username(username), NewsError::UserNotFound)
            .await?;
        shaping::record(row)
    }
}

fn internal(message: &str) -> NewsError {
    NewsError::InternalError(message.to_string())
}
