use crate::{AppState, endpoints, error::AppError};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use core_types::{
    ArticleListParams, ArticlePayload, CommentListParams, CommentPayload, TopicPayload, VoteUpdate,
};
use database::QueryExecutor;
use serde_json::{Value, json};
use std::sync::Arc;

type SharedState<E> = State<Arc<AppState<E>>>;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

fn query<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    params
        .map(|Query(inner)| inner)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// # GET /api
/// Describes every endpoint the server exposes.
pub async fn get_endpoints() -> Json<Value> {
    Json(endpoints::catalogue())
}

/// # GET /api/topics
pub async fn get_topics<E: QueryExecutor>(
    State(state): SharedState<E>,
) -> Result<Json<Value>, AppError> {
    let topics = state.repo.list_topics().await?;
    Ok(Json(json!({ "topics": topics })))
}

/// # POST /api/topics
pub async fn post_topic<E: QueryExecutor>(
    State(state): SharedState<E>,
    payload: Result<Json<TopicPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let topic = state.repo.create_topic(body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(json!({ "topic": topic }))))
}

/// # GET /api/articles
/// Accepts `topic`, `sort_by`, `order`, `limit` and `p`.
pub async fn get_articles<E: QueryExecutor>(
    State(state): SharedState<E>,
    params: Result<Query<ArticleListParams>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let page = state.repo.list_articles(&query(params)?).await?;
    Ok(Json(json!(page)))
}

/// # POST /api/articles
pub async fn post_article<E: QueryExecutor>(
    State(state): SharedState<E>,
    payload: Result<Json<ArticlePayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let article = state.repo.create_article(body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(json!({ "article": article }))))
}

/// # GET /api/articles/:article_id
pub async fn get_article<E: QueryExecutor>(
    Path(article_id): Path<String>,
    State(state): SharedState<E>,
) -> Result<Json<Value>, AppError> {
    let article = state.repo.get_article(&article_id).await?;
    Ok(Json(json!({ "article": article })))
}

/// # PATCH /api/articles/:article_id
/// Body: `{ "inc_votes": <integer> }`.
pub async fn patch_article<E: QueryExecutor>(
    Path(article_id): Path<String>,
    State(state): SharedState<E>,
    payload: Result<Json<VoteUpdate>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let article = state
        .repo
        .update_article_votes(&article_id, &body(payload)?)
        .await?;
    Ok(Json(json!({ "article": article })))
}

/// # DELETE /api/articles/:article_id
/// Removes the article together with its comments.
pub async fn delete_article<E: QueryExecutor>(
    Path(article_id): Path<String>,
    State(state): SharedState<E>,
) -> Result<StatusCode, AppError> {
    state.repo.delete_article(&article_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// # GET /api/articles/:article_id/comments
pub async fn get_article_comments<E: QueryExecutor>(
    Path(article_id): Path<String>,
    State(state): SharedState<E>,
    params: Result<Query<CommentListParams>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let comments = state
        .repo
        .list_article_comments(&article_id, &query(params)?)
        .await?;
    Ok(Json(json!({ "comments": comments })))
}

/// # POST /api/articles/:article_id/comments
pub async fn post_article_comment<E: QueryExecutor>(
    Path(article_id): Path<String>,
    State(state): SharedState<E>,
    payload: Result<Json<CommentPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let comment = state
        .repo
        .create_comment(&article_id, body(payload)?)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "comment": comment }))))
}

/// # PATCH /api/comments/:comment_id
pub async fn patch_comment<E: QueryExecutor>(
    Path(comment_id): Path<String>,
    State(state): SharedState<E>,
    payload: Result<Json<VoteUpdate>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let comment = state
        .repo
        .update_comment_votes(&comment_id, &body(payload)?)
        .await?;
    Ok(Json(json!({ "comment": comment })))
}

/// # DELETE /api/comments/:comment_id
pub async fn delete_comment<E: QueryExecutor>(
    Path(comment_id): Path<String>,
    State(state): SharedState<E>,
) -> Result<StatusCode, AppError> {
    state.repo.delete_comment(&comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// # GET /api/users
pub async fn get_users<E: QueryExecutor>(
    State(state): SharedState<E>,
) -> Result<Json<Value>, AppError> {
    let users = state.repo.list_users().await?;
    Ok(Json(json!({ "users": users })))
}

/// # GET /api/users/:username
pub async fn get_user<E: QueryExecutor>(
    Path(username): Path<String>,
    State(state): SharedState<E>,
) -> Result<Json<Value>, AppError> {
    let user = state.repo.get_user(&username).await?;
    Ok(Json(json!({ "user": user })))
}

pub async fn route_not_found() -> AppError {
    AppError::RouteNotFound
}
