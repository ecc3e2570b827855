use serde::{Deserialize, Serialize};

/// Access profile of an account. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Parent,
    Mentor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Parent => "parent",
            Role::Mentor => "mentor",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "parent" => Ok(Role::Parent),
            "mentor" => Ok(Role::Mentor),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// The signed-in account as returned by the login and verification endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn is_mentor(&self) -> bool {
        self.role == Role::Mentor
    }

    /// First letter of the display name, used as an avatar placeholder
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('U')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user() {
        let json = r#"{"user_id": 7, "name": "Dana", "email": "dana@example.com", "role": "mentor"}"#;
        let user: User = serde_json::from_str(json).expect("Failed to parse user JSON");
        assert_eq!(user.user_id, 7);
        assert_eq!(user.role, Role::Mentor);
        assert!(user.is_mentor());
        assert_eq!(user.initial(), 'D');
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let json = r#"{"user_id": 7, "name": "Dana", "email": "dana@example.com", "role": "admin"}"#;
        assert!(serde_json::from_str::<User>(json).is_err());
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("Parent".parse::<Role>(), Ok(Role::Parent));
        assert_eq!(" mentor ".parse::<Role>(), Ok(Role::Mentor));
        assert!("guest".parse::<Role>().is_err());
    }

    #[test]
    fn test_initial_of_empty_name() {
        let user = User {
            user_id: 1,
            name: String::new(),
            email: "x@example.com".to_string(),
            role: Role::Parent,
        };
        assert_eq!(user.initial(), 'U');
    }
}
