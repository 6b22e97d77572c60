//! Team domain entity

use serde::{Deserialize, Serialize};

use super::user::User;
use crate::error::{require_non_empty, DomainError};

/// Unique team name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamName(pub String);

impl TeamName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TeamName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for TeamName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl std::fmt::Display for TeamName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A team and its members
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    pub name: TeamName,
    pub members: Vec<User>,
}

impl Team {
    /// Validate the team and each member, reporting the first failure
    pub fn validate(&self) -> Result<(), DomainError> {
        require_non_empty("team_name", self.name.as_str())?;

        for (i, member) in self.members.iter().enumerate() {
            member.validate().map_err(|e| match e {
                DomainError::Validation { field, message } => {
                    DomainError::validation(format!("members[{}].{}", i, field), message)
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Point every member at this team
    pub fn normalize_membership(&mut self) {
        for member in &mut self.members {
            member.team_name = self.name.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UserId;

    fn member(id: &str, team: &str) -> User {
        User {
            id: UserId::from(id),
            username: format!("name-{}", id),
            team_name: TeamName::from(team),
            is_active: true,
        }
    }

    #[test]
    fn empty_team_name_is_rejected() {
        let team = Team {
            name: TeamName::from(""),
            members: vec![],
        };
        assert!(matches!(
            team.validate(),
            Err(DomainError::Validation { ref field, .. }) if field == "team_name"
        ));
    }

    #[test]
    fn invalid_member_reports_its_index() {
        let mut bad = member("u2", "backend");
        bad.username.clear();
        let team = Team {
            name: TeamName::from("backend"),
            members: vec![member("u1", "backend"), bad],
        };

        match team.validate() {
            Err(DomainError::Validation { field, .. }) => assert_eq!(field, "members[1].username"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn normalize_membership_rewrites_team_names() {
        let mut team = Team {
            name: TeamName::from("payments"),
            members: vec![member("u1", "other"), member("u2", "")],
        };
        team.normalize_membership();
        assert!(team
            .members
            .iter()
            .all(|m| m.team_name == TeamName::from("payments")));
        assert!(team.validate().is_ok());
    }
}
