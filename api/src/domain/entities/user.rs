//! User domain entity
//!
//! A team member who can author pull requests and review them.

use serde::{Deserialize, Serialize};

use super::team::TeamName;
use crate::error::{require_non_empty, DomainError};

/// Opaque user identifier, supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A team member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub team_name: TeamName,
    /// Inactive users are never picked as reviewers
    pub is_active: bool,
}

impl User {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_non_empty("user_id", self.id.as_str())?;
        require_non_empty("username", &self.username)?;
        require_non_empty("team_name", self.team_name.as_str())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_user(id: &str, username: &str, team: &str) -> User {
        User {
            id: UserId::from(id),
            username: username.to_string(),
            team_name: TeamName::from(team),
            is_active: true,
        }
    }

    #[test]
    fn valid_user_passes() {
        assert!(make_user("u1", "Alice", "backend").validate().is_ok());
    }

    #[test]
    fn empty_fields_are_named() {
        let cases = [
            (make_user("", "Alice", "backend"), "user_id"),
            (make_user("u1", "", "backend"), "username"),
            (make_user("u1", "Alice", ""), "team_name"),
        ];

        for (user, expected) in cases {
            match user.validate() {
                Err(DomainError::Validation { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected validation error for {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn user_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&UserId::from("u42")).unwrap();
        assert_eq!(json, "\"u42\"");
    }
}
