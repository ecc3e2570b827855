use serde::{Deserialize, Serialize};

use super::de;

/// Channel name that lists posts from every category
pub const ALL_POSTS_CHANNEL: &str = "All Posts";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub post_id: i64,
    pub content: String,
    pub category: Option<String>,
    pub author_name: Option<String>,
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "de::count")]
    pub likes_count: i64,
    #[serde(default, deserialize_with = "de::count")]
    pub comment_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub content: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: i64,
    pub content: String,
    pub author_name: Option<String>,
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_counts_from_strings() {
        let json = r#"{"post_id": 9, "content": "Hello", "category": "General", "author_name": "Ana", "created_at": "2024-01-02T03:04:05.000Z", "likes_count": "3", "comment_count": 2}"#;
        let post: Post = serde_json::from_str(json).expect("Failed to parse post JSON");
        assert_eq!(post.likes_count, 3);
        assert_eq!(post.comment_count, 2);
    }

    #[test]
    fn test_post_counts_default_to_zero() {
        let json = r#"{"post_id": 9, "content": "Hello", "category": null, "author_name": null, "created_at": null}"#;
        let post: Post = serde_json::from_str(json).expect("Failed to parse post JSON");
        assert_eq!(post.likes_count, 0);
        assert_eq!(post.comment_count, 0);
    }

    #[test]
    fn test_post_blank_count_is_zero() {
        let json = r#"{"post_id": 9, "content": "Hello", "category": null, "author_name": null, "created_at": null, "likes_count": "", "comment_count": " "}"#;
        let post: Post = serde_json::from_str(json).expect("Failed to parse post JSON");
        assert_eq!(post.likes_count, 0);
        assert_eq!(post.comment_count, 0);
    }
}
