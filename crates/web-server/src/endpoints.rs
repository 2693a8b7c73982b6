//! The self-describing catalogue served at `GET /api`.

use serde_json::{Map, Value, json};

struct Endpoint {
    route: &'static str,
    description: &'static str,
    queries: &'static [&'static str],
    example_request: Option<fn() -> Value>,
    example_response: fn() -> Value,
}

const ENDPOINTS: &[Endpoint] = &[
    Endpoint {
        route: "GET /api",
        description: "serves up a json representation of all the available endpoints of the api",
        queries: &[],
        example_request: None,
        example_response: || json!({ "GET /api/topics": { "description": "..." } }),
    },
    Endpoint {
        route: "GET /api/health",
        description: "responds with OK while the server is running",
        queries: &[],
        example_request: None,
        example_response: || json!("OK"),
    },
    Endpoint {
        route: "GET /api/topics",
        description: "serves an array of all topics",
        queries: &[],
        example_request: None,
        example_response: || {
            json!({ "topics": [{ "slug": "football", "description": "Footie!" }] })
        },
    },
    Endpoint {
        route: "POST /api/topics",
        description: "adds a topic and serves it back",
        queries: &[],
        example_request: Some(|| json!({ "slug": "dogs", "description": "Not cats" })),
        example_response: || json!({ "topic": { "slug": "dogs", "description": "Not cats" } }),
    },
    Endpoint {
        route: "GET /api/articles",
        description: "serves a page of articles with their comment counts",
        queries: &["topic", "sort_by", "order", "limit", "p"],
        example_request: None,
        example_response: || {
            json!({
                "articles": [example_article(6)],
                "total_count": 1,
            })
        },
    },
    Endpoint {
        route: "POST /api/articles",
        description: "adds an article; article_img_url is optional",
        queries: &[],
        example_request: Some(|| {
            json!({
                "author": "weegembump",
                "title": "Seafood substitutions are increasing",
                "body": "Text from the article..",
                "topic": "cooking",
            })
        }),
        example_response: || json!({ "article": example_article(0) }),
    },
    Endpoint {
        route: "GET /api/articles/:article_id",
        description: "serves a single article with its comment count",
        queries: &[],
        example_request: None,
        example_response: || json!({ "article": example_article(6) }),
    },
    Endpoint {
        route: "PATCH /api/articles/:article_id",
        description: "changes the votes of an article by inc_votes and serves the updated article",
        queries: &[],
        example_request: Some(|| json!({ "inc_votes": 1 })),
        example_response: || {
            let mut article = example_article(6);
            article.remove("comment_count");
            json!({ "article": article })
        },
    },
    Endpoint {
        route: "DELETE /api/articles/:article_id",
        description: "deletes an article and all of its comments, responding with no content",
        queries: &[],
        example_request: None,
        example_response: || Value::Null,
    },
    Endpoint {
        route: "GET /api/articles/:article_id/comments",
        description: "serves the comments of an article, most recent first",
        queries: &["limit", "p"],
        example_request: None,
        example_response: || json!({ "comments": [example_comment()] }),
    },
    Endpoint {
        route: "POST /api/articles/:article_id/comments",
        description: "adds a comment to an article and serves it back",
        queries: &[],
        example_request: Some(|| json!({ "username": "butter_bridge", "body": "Great article!" })),
        example_response: || json!({ "comment": example_comment() }),
    },
    Endpoint {
        route: "PATCH /api/comments/:comment_id",
        description: "changes the votes of a comment by inc_votes and serves the updated comment",
        queries: &[],
        example_request: Some(|| json!({ "inc_votes": -1 })),
        example_response: || json!({ "comment": example_comment() }),
    },
    Endpoint {
        route: "DELETE /api/comments/:comment_id",
        description: "deletes a comment, responding with no content",
        queries: &[],
        example_request: None,
        example_response: || Value::Null,
    },
    Endpoint {
        route: "GET /api/users",
        description: "serves an array of all users",
        queries: &[],
        example_request: None,
        example_response: || json!({ "users": [example_user()] }),
    },
    Endpoint {
        route: "GET /api/users/:username",
        description: "serves a single user",
        queries: &[],
        example_request: None,
        example_response: || json!({ "user": example_user() }),
    },
];

fn example_article(comment_count: i64) -> Map<String, Value> {
    let article = json!({
        "article_id": 34,
        "title": "Seafood substitutions are increasing",
        "topic": "cooking",
        "author": "weegembump",
        "body": "Text from the article..",
        "created_at": "2018-05-30T15:59:13.341Z",
        "votes": 0,
        "article_img_url": "https://images.pexels.com/photos/97050/pexels-photo-97050.jpeg?w=700&h=700",
        "comment_count": comment_count,
    });
    match article {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn example_comment() -> Value {
    json!({
        "comment_id": 19,
        "body": "Great article!",
        "article_id": 34,
        "author": "butter_bridge",
        "votes": 0,
        "created_at": "2020-11-03T21:00:00.000Z",
    })
}

fn example_user() -> Value {
    json!({
        "username": "butter_bridge",
        "name": "jonny",
        "avatar_url": "https://www.healthytherapies.com/wp-content/uploads/2016/06/Lime3.jpg",
    })
}

/// Every route keyed by `"<METHOD> <path>"`.
pub fn catalogue() -> Value {
    let mut routes = Map::new();
    for endpoint in ENDPOINTS {
        let mut entry = Map::new();
        entry.insert("description".into(), json!(endpoint.description));
        entry.insert("queries".into(), json!(endpoint.queries));
        if let Some(example) = endpoint.example_request {
            entry.insert("exampleRequest".into(), example());
        }
        entry.insert("exampleResponse".into(), (endpoint.example_response)());
        routes.insert(endpoint.route.to_string(), Value::Object(entry));
    }
    Value::Object(routes)
}
