use chrono::NaiveDateTime;
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamStatus {
    Pending,
    Unregistered,
    Registered,
}

impl TeamStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Unregistered => "Unregistered",
            Self::Registered => "Registered",
        }
    }
}

impl fmt::Display for TeamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TeamStatus {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Unregistered" => Ok(Self::Unregistered),
            "Registered" => Ok(Self::Registered),
            other => Err(StorageError::InvalidRow(format!(
                "unknown team status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Team {
    pub team_id: Uuid,
    pub competition_id: Uuid,
    pub name: String,
    pub pending_name: Option<String>,
    pub team_size: i16,
    pub participants: Vec<Uuid>,
    pub university: String,
    pub coach_id: Option<Uuid>,
    pub site_id: Option<Uuid>,
    pub pending_site_id: Option<Uuid>,
    pub seat: Option<String>,
    pub status: TeamStatus,
    pub created_at: NaiveDateTime,
}

/// Raw `competition_teams` row
#[derive(Debug, Clone, FromRow)]
pub struct TeamRow {
    pub team_id: Uuid,
    pub competition_id: Uuid,
    pub name: String,
    pub pending_name: Option<String>,
    pub team_size: i16,
    pub participants: Vec<Uuid>,
    pub university: String,
    pub coach_id: Option<Uuid>,
    pub site_id: Option<Uuid>,
    pub pending_site_id: Option<Uuid>,
    pub seat: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
}

impl TryFrom<TeamRow> for Team {
    type Error = StorageError;

    fn try_from(row: TeamRow) -> Result<Self, Self::Error> {
        let status = row.status.parse()?;

        Ok(Self {
            team_id: row.team_id,
            competition_id: row.competition_id,
            name: row.name,
            pending_name: row.pending_name,
            team_size: row.team_size,
            participants: row.participants,
            university: row.university,
            coach_id: row.coach_id,
            site_id: row.site_id,
            pending_site_id: row.pending_site_id,
            seat: row.seat,
            status,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> TeamRow {
        TeamRow {
            team_id: Uuid::new_v4(),
            competition_id: Uuid::new_v4(),
            name: "Segfault Sorcerers".to_string(),
            pending_name: None,
            team_size: 1,
            participants: vec![Uuid::new_v4()],
            university: "UNSW".to_string(),
            coach_id: None,
            site_id: None,
            pending_site_id: None,
            seat: None,
            status: status.to_string(),
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_status_maps_from_row() {
        let team = Team::try_from(row("Registered")).unwrap();
        assert_eq!(team.status, TeamStatus::Registered);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = Team::try_from(row("registered")).unwrap_err();
        assert!(matches!(err, StorageError::InvalidRow(_)));
    }
}
