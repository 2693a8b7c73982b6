//! End-to-end checks against a real PostgreSQL instance.
//!
//! These are ignored by default. Point `DATABASE_URL` at a disposable database
//! and run them with `--ignored`; each test migrates and reseeds first, so they
//! must not run in parallel (`--test-threads=1`).

use core_types::{
    ArticleListParams, ArticlePayload, CommentListParams, CommentPayload, NewsError, TotalCountMode,
    VoteUpdate,
};
use database::{
    ConnectionSettings, NewsRepository, PgExecutor, QuerySettings, connect, run_migrations, seed,
};

async fn fresh_repository(settings: QuerySettings) -> NewsRepository<PgExecutor> {
    let pool = connect(&ConnectionSettings::default()).await.expect("database reachable");
    run_migrations(&pool).await.expect("migrations apply");
    let executor = PgExecutor::new(pool);
    seed(&executor).await.expect("fixtures load");
    NewsRepository::with_settings(executor, settings)
}

#[tokio::test]
#[ignore]
async fn cats_filter_returns_the_single_cats_article() {
    let repo = fresh_repository(QuerySettings::default()).await;
    let params = ArticleListParams {
        topic: Some("cats".into()),
        ..Default::default()
    };
    let page = repo.list_articles(&params).await.unwrap();
    assert_eq!(page.articles.len(), 1);
    assert_eq!(page.articles[0].article.topic, "cats");
    assert_eq!(page.total_count, 1);
}

#[tokio::test]
#[ignore]
async fn article_one_loses_sixty_votes() {
    let repo = fresh_repository(QuerySettings::default()).await;
    let article = repo.update_article_votes("1", &VoteUpdate::by(-60)).await.unwrap();
    assert_eq!(article.votes, 40);

    let up = repo.update_article_votes("1", &VoteUpdate::by(1)).await.unwrap();
    let down = repo.update_article_votes("1", &VoteUpdate::by(-1)).await.unwrap();
    assert_eq!(up.votes, 41);
    assert_eq!(down.votes, 40);
}

#[tokio::test]
#[ignore]
async fn deleting_an_article_removes_its_comments() {
    let repo = fresh_repository(QuerySettings::default()).await;
    repo.delete_article("1").await.unwrap();

    assert_eq!(repo.get_article("1").await.unwrap_err(), NewsError::ArticleNotFound);
    assert_eq!(
        repo.list_article_comments("1", &CommentListParams::default())
            .await
            .unwrap_err(),
        NewsError::ArticleNotFound
    );
    assert_eq!(repo.delete_article("1").await.unwrap_err(), NewsError::ArticleNotFound);

    // Comment ids follow fixture order, starting at 1.
    let former: Vec<usize> = database::seed::COMMENTS
        .iter()
        .enumerate()
        .filter(|(_, comment)| comment.0 == 1)
        .map(|(index, _)| index + 1)
        .collect();
    assert_eq!(former.len(), 11);
    for comment_id in former {
        assert_eq!(
            repo.update_comment_votes(&comment_id.to_string(), &VoteUpdate::by(1))
                .await
                .unwrap_err(),
            NewsError::CommentNotFound,
            "comment {comment_id} survived its article"
        );
    }

    // Comments on other articles are untouched.
    let kept = repo.update_comment_votes("1", &VoteUpdate::by(0)).await.unwrap();
    assert_eq!(kept.article_id, 9);
}

#[tokio::test]
#[ignore]
async fn vote_overflow_is_rejected_as_bad_input() {
    let repo = fresh_repository(QuerySettings::default()).await;
    let err = repo
        .update_article_votes("1", &VoteUpdate::by(i32::MAX))
        .await
        .unwrap_err();
    assert!(matches!(err, NewsError::InvalidField(_)), "{err:?}");
    assert_eq!(repo.get_article("1").await.unwrap().article.votes, 100);
}

#[tokio::test]
#[ignore]
async fn pages_concatenate_to_the_full_listing() {
    let repo = fresh_repository(QuerySettings::default()).await;
    let all = repo
        .list_articles(&ArticleListParams {
            limit: Some("100".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(all.articles.len(), 13);

    let mut paged = Vec::new();
    for page in 1..=3 {
        let params = ArticleListParams {
            limit: Some("5".into()),
            page: Some(page.to_string()),
            ..Default::default()
        };
        paged.extend(repo.list_articles(&params).await.unwrap().articles);
    }
    let ids = |articles: &[core_types::ArticleWithCount]| {
        articles.iter().map(|a| a.article.article_id).collect::<Vec<_>>()
    };
    assert_eq!(ids(&paged), ids(&all.articles));
}

#[tokio::test]
#[ignore]
async fn sorting_is_honoured() {
    let repo = fresh_repository(QuerySettings::default()).await;
    let params = ArticleListParams {
        sort_by: Some("votes".into()),
        order: Some("asc".into()),
        limit: Some("20".into()),
        ..Default::default()
    };
    let page = repo.list_articles(&params).await.unwrap();
    let votes: Vec<i32> = page.articles.iter().map(|a| a.article.votes).collect();
    assert!(votes.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(page.articles.last().map(|a| a.article.article_id), Some(1));
}

#[tokio::test]
#[ignore]
async fn comment_counts_and_quiet_articles() {
    let repo = fresh_repository(QuerySettings::default()).await;
    assert_eq!(repo.get_article("1").await.unwrap().comment_count, 11);
    let comments = repo
        .list_article_comments("2", &CommentListParams::default())
        .await
        .unwrap();
    assert!(comments.is_empty());
}

#[tokio::test]
#[ignore]
async fn foreign_keys_are_reported_by_entity() {
    let repo = fresh_repository(QuerySettings::default()).await;
    let comment = |username: &str| CommentPayload {
        username: Some(username.into()),
        body: Some("Hello".into()),
    };
    assert_eq!(
        repo.create_comment("9999", comment("lurker")).await.unwrap_err(),
        NewsError::ArticleNotFound
    );
    assert_eq!(
        repo.create_comment("1", comment("nobody")).await.unwrap_err(),
        NewsError::UserNotFound
    );

    let article = ArticlePayload {
        author: Some("lurker".into()),
        title: Some("Dogs".into()),
        body: Some("Woof".into()),
        topic: Some("dogs".into()),
        article_img_url: None,
    };
    assert_eq!(repo.create_article(article).await.unwrap_err(), NewsError::TopicNotFound);
}

#[tokio::test]
#[ignore]
async fn matching_total_counts_past_the_page() {
    let repo = fresh_repository(QuerySettings {
        total_count: TotalCountMode::Matching,
        ..Default::default()
    })
    .await;
    let params = ArticleListParams {
        topic: Some("mitch".into()),
        limit: Some("5".into()),
        ..Default::default()
    };
    let page = repo.list_articles(&params).await.unwrap();
    assert_eq!(page.articles.len(), 5);
    assert_eq!(page.total_count, 12);
}

#[tokio::test]
#[ignore]
async fn numeric_and_time_columns_sort_both_ways() {
    let repo = fresh_repository(QuerySettings::default()).await;
    for column in ["article_id", "votes", "created_at"] {
        for order in ["asc", "desc"] {
            let params = ArticleListParams {
                sort_by: Some(column.into()),
                order: Some(order.into()),
                limit: Some("20".into()),
                ..Default::default()
            };
            let page = repo.list_articles(&params).await.unwrap();
            let keys: Vec<(i64, String)> = page
                .articles
                .iter()
                .map(|a| {
                    let article = &a.article;
                    match column {
                        "article_id" => (i64::from(article.article_id), String::new()),
                        "votes" => (i64::from(article.votes), String::new()),
                        _ => (0, article.created_at.to_rfc3339()),
                    }
                })
                .collect();
            let mut expected = keys.clone();
            expected.sort();
            if order == "desc" {
                expected.reverse();
            }
            assert_eq!(keys, expected, "sort_by={column} order={order}");
        }
    }
}

#[tokio::test]
#[ignore]
async fn repeated_listings_are_identical() {
    let repo = fresh_repository(QuerySettings::default()).await;
    // Articles 12 and 13 share a timestamp; the id tie-break keeps them stable.
    let params = ArticleListParams::default();
    let first = repo.list_articles(&params).await.unwrap();
    let second = repo.list_articles(&params).await.unwrap();
    assert_eq!(first, second);
}
