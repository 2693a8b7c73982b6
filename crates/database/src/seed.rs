//! Fixture data and the routine that loads it.
//!
//! `seed` empties every table, resets the serial counters and inserts the
//! fixture set in a single transaction, so a failed load leaves the previous
//! contents in place.

use crate::error::DbError;
use crate::executor::{QueryExecutor, QueryPlan};

const DEFAULT_AVATAR: &str =
    "https://www.golenbock.com/wp-content/uploads/2015/01/placeholder-user.png";
const DEFAULT_IMG: &str =
    "https://images.pexels.com/photos/158651/news-newsletter-newspaper-information-158651.jpeg?w=700&h=700";

pub const TOPICS: [(&str, &str); 3] = [
    ("mitch", "The man, the Mitch, the legend"),
    ("cats", "Not dogs"),
    ("paper", "what books are made of"),
];

/// `(username, name, avatar_url)`
pub const USERS: [(&str, &str, &str); 4] = [
    (
        "butter_bridge",
        "jonny",
        "https://www.healthytherapies.com/wp-content/uploads/2016/06/Lime3.jpg",
    ),
    (
        "icellusedkars",
        "sam",
        "https://avatars2.githubusercontent.com/u/24604688?s=460&v=4",
    ),
    (
        "rogersop",
        "paul",
        "https://avatars2.githubusercontent.com/u/24394918?s=400&v=4",
    ),
    ("lurker", "do_nothing", DEFAULT_AVATAR),
];

pub struct ArticleFixture {
    pub title: &'static str,
    pub topic: &'static str,
    pub author: &'static str,
    pub body: &'static str,
    /// UTC, `YYYY-MM-DD HH:MM:SS`.
    pub created_at: &'static str,
    pub votes: i32,
}

/// Serial ids follow slice order, starting at 1.
pub const ARTICLES: [ArticleFixture; 13] = [
    ArticleFixture {
        title: "Living in the shadow of a great man",
        topic: "mitch",
        author: "butter_bridge",
        body: "I find this existence challenging",
        created_at: "2020-07-09 20:11:00",
        votes: 100,
    },
    ArticleFixture {
        title: "Sony Vaio; or, The Laptop",
        topic: "mitch",
        author: "icellusedkars",
        body: "Call me Mitchell. Some years ago I wanted to see the watery part of the world.",
        created_at: "2020-10-16 05:03:00",
        votes: 0,
    },
    ArticleFixture {
        title: "Eight pug gifs that remind me of mitch",
        topic: "mitch",
        author: "icellusedkars",
        body: "some gifs",
        created_at: "2020-11-03 09:12:00",
        votes: 0,
    },
    ArticleFixture {
        title: "Student SUES Mitch!",
        topic: "mitch",
        author: "rogersop",
        body: "We all love Mitch and his wonderful, unique typing style.",
        created_at: "2020-05-06 01:14:00",
        votes: 0,
    },
    ArticleFixture {
        title: "UNCOVERED: catspiracy to bring down democracy",
        topic: "cats",
        author: "rogersop",
        body: "Bastet walks amongst us, and the cats are taking arms!",
        created_at: "2020-08-03 13:14:00",
        votes: 0,
    },
    ArticleFixture {
        title: "A",
        topic: "mitch",
        author: "icellusedkars",
        body: "Delicious tin of cat food",
        created_at: "2020-10-18 01:00:00",
        votes: 0,
    },
    ArticleFixture {
        title: "Z",
        topic: "mitch",
        author: "icellusedkars",
        body: "I was hungry.",
        created_at: "2020-01-07 14:08:00",
        votes: 0,
    },
    ArticleFixture {
        title: "Does Mitch predate civilisation?",
        topic: "mitch",
        author: "icellusedkars",
        body: "Archaeologists have uncovered a gigantic statue from the dawn of humanity.",
        created_at: "2020-04-17 01:08:00",
        votes: 0,
    },
    ArticleFixture {
        title: "They're not exactly dogs, are they?",
        topic: "mitch",
        author: "butter_bridge",
        body: "Well? Think about it.",
        created_at: "2020-06-06 09:10:00",
        votes: 0,
    },
    ArticleFixture {
        title: "Seven inspirational thought leaders from Manchester UK",
        topic: "mitch",
        author: "rogersop",
        body: "Who are we kidding, there is only one, and it's Mitch!",
        created_at: "2020-05-14 04:15:00",
        votes: 0,
    },
    ArticleFixture {
        title: "Am I a cat?",
        topic: "mitch",
        author: "icellusedkars",
        body: "Having run out of ideas for articles, I am staring at the wall.",
        created_at: "2020-01-15 22:21:00",
        votes: 0,
    },
    ArticleFixture {
        title: "Moustache",
        topic: "mitch",
        author: "butter_bridge",
        body: "Have you seen the size of that thing?",
        created_at: "2020-10-11 11:24:00",
        votes: 0,
    },
    ArticleFixture {
        title: "Another article about Mitch",
        topic: "mitch",
        author: "butter_bridge",
        body: "There will never be enough articles about Mitch!",
        created_at: "2020-10-11 11:24:00",
        votes: 0,
    },
];

/// `(article_id, author, body, votes, created_at)`
pub const COMMENTS: [(i32, &str, &str, i32, &str); 18] = [
    (
        9,
        "butter_bridge",
        "Oh, I've got compassion running out of my nose, pal!",
        16,
        "2020-04-06 12:17:00",
    ),
    (
        1,
        "butter_bridge",
        "The beautiful thing about treasure is that it exists.",
        14,
        "2020-10-31 03:03:00",
    ),
    (
        1,
        "icellusedkars",
        "Replacing the quiet elegance of the dark suit and tie with the casual indifference of these muted earth tones.",
        100,
        "2020-03-01 01:13:00",
    ),
    (
        1,
        "icellusedkars",
        " I carry a log - yes. Is it funny to you? It is not to me.",
        -100,
        "2020-02-23 12:01:00",
    ),
    (1, "icellusedkars", "I hate streaming noses", 0, "2020-11-03 21:00:00"),
    (1, "icellusedkars", "I hate streaming eyes even more", 0, "2020-04-11 21:02:00"),
    (1, "icellusedkars", "Lobster pot", 0, "2020-05-15 20:19:00"),
    (1, "icellusedkars", "Delicious crackerbreads", 0, "2020-04-14 20:19:00"),
    (1, "icellusedkars", "Superficially charming", 0, "2020-01-01 03:08:00"),
    (3, "icellusedkars", "git push origin master", 0, "2020-06-20 07:24:00"),
    (3, "icellusedkars", "Ambidextrous marsupial", 0, "2020-09-19 23:10:00"),
    (1, "icellusedkars", "Massive intercranial brain haemorrhage", 0, "2020-03-02 07:10:00"),
    (1, "icellusedkars", "Fruit pastilles", 0, "2020-06-15 10:25:00"),
    (
        5,
        "icellusedkars",
        "What do you see? I have no idea where this will lead us.",
        16,
        "2020-06-09 05:00:00",
    ),
    (
        5,
        "butter_bridge",
        "I am 100% sure that we're not completely sure.",
        1,
        "2020-11-24 00:08:00",
    ),
    (6, "butter_bridge", "This is a bad article name", 1, "2020-10-11 15:23:00"),
    (9, "icellusedkars", "The owls are not what they seem.", 20, "2020-03-14 17:02:00"),
    (1, "butter_bridge", "This morning, I showered for nine minutes.", 16, "2020-07-21 00:20:00"),
];

/// Row counts inserted by one `seed` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub topics: usize,
    pub users: usize,
    pub articles: usize,
    pub comments: usize,
}

/// The statements `seed` runs, in order.
pub fn plans() -> Vec<QueryPlan> {
    let mut topics = QueryPlan::new(String::new());
    let rows: Vec<String> = TOPICS
        .iter()
        .map(|(slug, description)| {
            format!("({}, {})", topics.push_param(*slug), topics.push_param(*description))
        })
        .collect();
    topics.sql = format!("INSERT INTO topics (slug, description) VALUES {}", rows.join(", "));

    let mut users = QueryPlan::new(String::new());
    let rows: Vec<String> = USERS
        .iter()
        .map(|(username, name, avatar_url)| {
            format!(
                "({}, {}, {})",
                users.push_param(*username),
                users.push_param(*name),
                users.push_param(*avatar_url)
            )
        })
        .collect();
    users.sql = format!(
        "INSERT INTO users (username, name, avatar_url) VALUES {}",
        rows.join(", ")
    );

    let mut articles = QueryPlan::new(String::new());
    let rows: Vec<String> = ARTICLES
        .iter()
        .map(|a| {
            format!(
                "({}, {}, {}, {}, {}::timestamp, {}, {})",
                articles.push_param(a.title),
                articles.push_param(a.topic),
                articles.push_param(a.author),
                articles.push_param(a.body),
                articles.push_param(a.created_at),
                articles.push_param(a.votes),
                articles.push_param(DEFAULT_IMG),
            )
        })
        .collect();
    articles.sql = format!(
        "INSERT INTO articles (title, topic, author, body, created_at, votes, article_img_url) \
         VALUES {}",
        rows.join(", ")
    );

    let mut comments = QueryPlan::new(String::new());
    let rows: Vec<String> = COMMENTS
        .iter()
        .map(|(article_id, author, body, votes, created_at)| {
            format!(
                "({}, {}, {}, {}, {}::timestamp)",
                comments.push_param(*article_id),
                comments.push_param(*author),
                comments.push_param(*body),
                comments.push_param(*votes),
                comments.push_param(*created_at),
            )
        })
        .collect();
    comments.sql = format!(
        "INSERT INTO comments (article_id, author, body, votes, created_at) VALUES {}",
        rows.join(", ")
    );

    vec![
        QueryPlan::new("TRUNCATE comments, articles, users, topics RESTART IDENTITY CASCADE"),
        topics,
        users,
        articles,
        comments,
    ]
}

/// Replaces the contents of every table with the fixture set.
pub async fn seed<E: QueryExecutor>(executor: &E) -> Result<SeedReport, DbError> {
    executor.execute_atomic(&plans()).await?;

    let report = SeedReport {
        topics: TOPICS.len(),
        users: USERS.len(),
        articles: ARTICLES.len(),
        comments: COMMENTS.len(),
    };
    tracing::info!(?report, "Database seeded.");
    Ok(report)
}
