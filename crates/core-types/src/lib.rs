pub mod enums;
pub mod error;
pub mod input;
pub mod params;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{SortColumn, SortOrder, TotalCountMode};
pub use error::{ErrorClass, NewsError};
pub use input::{
    ArticlePayload, CommentPayload, NewArticle, NewComment, NewTopic, TopicPayload, VoteUpdate,
};
pub use params::{
    ArticleListParams, ArticleListPlan, CommentListParams, DEFAULT_LIMIT, Pagination, parse_id,
};
pub use structs::{Article, ArticlePage, ArticleWithCount, Comment, Topic, User};
