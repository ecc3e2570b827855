use serde::{Deserialize, Serialize};

/// Library categories in display order; the first entry means "no filter"
pub const ALL_CATEGORIES: [&str; 6] = ["All", "Speech", "Behavioral", "Sensory", "Education", "Parenting"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub resource_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub url: Option<String>,
    pub author_id: Option<i64>,
    pub author_name: Option<String>,
}

impl Resource {
    /// Whether `user_id` may delete this resource
    pub fn is_authored_by(&self, user_id: i64) -> bool {
        self.author_id == Some(user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewResource {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}
