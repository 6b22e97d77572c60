//! Team Service
//!
//! Team creation (with member upsert) and lookup.

use std::sync::Arc;

use crate::domain::entities::{Team, TeamName};
use crate::domain::ports::{TeamRepository, UserRepository};
use crate::error::{require_non_empty, DomainError};

pub struct TeamService<TR, UR>
where
    TR: TeamRepository,
    UR: UserRepository,
{
    teams: Arc<TR>,
    users: Arc<UR>,
}

impl<TR, UR> TeamService<TR, UR>
where
    TR: TeamRepository,
    UR: UserRepository,
{
    pub fn new(teams: Arc<TR>, users: Arc<UR>) -> Self {
        Self { teams, users }
    }

    /// Create a team and upsert its members into it
    ///
    /// Existing users listed as members are moved into the new team.
    pub async fn add_team(&self, mut team: Team) -> Result<Team, DomainError> {
        team.normalize_membership();
        team.validate()?;

        self.teams.create(&team).await.inspect_err(|e| {
            tracing::error!(team = %team.name, error = %e, "create team");
        })?;

        self.users.upsert_users(&team.members).await.inspect_err(|e| {
            tracing::error!(team = %team.name, error = %e, "upsert team members");
        })?;

        tracing::info!(team = %team.name, members = team.members.len(), "team created");

        self.teams.find_by_name(&team.name).await.inspect_err(|e| {
            tracing::error!(team = %team.name, error = %e, "get team after create");
        })
    }

    pub async fn get_team(&self, name: &TeamName) -> Result<Team, DomainError> {
        require_non_empty("team_name", name.as_str())?;

        self.teams.find_by_name(name).await.inspect_err(|e| {
            tracing::error!(team = %name, error = %e, "get team");
        })
    }
}
