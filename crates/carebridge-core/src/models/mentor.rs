use serde::{Deserialize, Serialize};

/// A mentor as listed for parents who have not connected yet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mentor {
    pub user_id: i64,
    pub name: String,
    pub email: String,
}

/// A parent connected to the signed-in mentor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub children_names: Option<Vec<String>>,
}

impl Client {
    pub fn children_display(&self) -> String {
        match self.children_names.as_deref() {
            Some(names) if !names.is_empty() => names.join(", "),
            _ => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentoringSession {
    pub session_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_time: Option<String>,
    pub meeting_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSession {
    pub title: String,
    pub description: String,
    pub start_time: String,
    pub meeting_link: String,
}
