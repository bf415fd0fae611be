//! Ranking and greedy merging of undersized teams.
//!
//! Teams are ranked strongest first, then a single forward pass tops up each
//! team with members taken from teams ranked below it. Donor teams are always
//! absorbed whole and reported for deletion.

use std::collections::HashSet;

use thiserror::Error;
use uuid::Uuid;

use crate::models::Student;

pub const MAX_TEAM_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormationError {
    #[error("Team {team_id} has {members} members, more than the maximum of {max}", max = MAX_TEAM_SIZE)]
    OversizedTeam { team_id: Uuid, members: usize },

    #[error("Team {team_id} appears more than once")]
    DuplicateTeam { team_id: Uuid },

    #[error("Student {user_id} belongs to more than one team")]
    DuplicateMember { user_id: Uuid },

    #[error("Competition team size is {team_size}, but teams are formed with exactly {max}", max = MAX_TEAM_SIZE)]
    UnsupportedTeamSize { team_size: i16 },
}

/// A pending team with its members resolved to student profiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormationTeam {
    pub team_id: Uuid,
    pub name: String,
    pub members: Vec<Student>,
}

impl FormationTeam {
    pub fn new(team_id: Uuid, name: impl Into<String>, members: Vec<Student>) -> Self {
        Self {
            team_id,
            name: name.into(),
            members,
        }
    }

    /// Highest `algorithm_point` among the members, 0 for an empty team.
    pub fn strength(&self) -> i32 {
        self.members
            .iter()
            .map(|m| m.algorithm_point)
            .max()
            .unwrap_or(0)
    }

    pub fn member_ids(&self) -> Vec<Uuid> {
        self.members.iter().map(|m| m.user_id).collect()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= MAX_TEAM_SIZE
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Surviving teams, in ranked order
    pub teams: Vec<FormationTeam>,
    /// Donor teams, in the order they were absorbed
    pub deleted: Vec<Uuid>,
    /// Surviving teams whose roster grew
    pub changed: Vec<Uuid>,
}

/// Sorts strongest team first; equal strengths fall back to ascending team id.
pub fn rank_teams(teams: &mut [FormationTeam]) {
    teams.sort_by(|a, b| {
        b.strength()
            .cmp(&a.strength())
            .then_with(|| a.team_id.cmp(&b.team_id))
    });
}

/// Teams are only ever formed at `MAX_TEAM_SIZE`.
pub fn check_team_size(team_size: i16) -> Result<(), FormationError> {
    if usize::try_from(team_size) == Ok(MAX_TEAM_SIZE) {
        Ok(())
    } else {
        Err(FormationError::UnsupportedTeamSize { team_size })
    }
}

/// Rejects input the merge pass cannot handle safely.
pub fn validate_teams(teams: &[FormationTeam]) -> Result<(), FormationError> {
    let mut team_ids = HashSet::new();
    let mut user_ids = HashSet::new();

    for team in teams {
        if team.members.len() > MAX_TEAM_SIZE {
            return Err(FormationError::OversizedTeam {
                team_id: team.team_id,
                members: team.members.len(),
            });
        }

        if !team_ids.insert(team.team_id) {
            return Err(FormationError::DuplicateTeam {
                team_id: team.team_id,
            });
        }

        for member in &team.members {
            if !user_ids.insert(member.user_id) {
                return Err(FormationError::DuplicateMember {
                    user_id: member.user_id,
                });
            }
        }
    }

    Ok(())
}

/// Greedily merges ranked teams into teams of `MAX_TEAM_SIZE`.
///
/// Expects `teams` already ranked. Members only ever move from a later team
/// into an earlier one.
pub fn merge_teams(mut teams: Vec<FormationTeam>) -> Result<MergeOutcome, FormationError> {
    validate_teams(&teams)?;

    let mut consumed = vec![false; teams.len()];
    let mut deleted = Vec::new();
    let mut changed = Vec::new();

    for i in 0..teams.len() {
        if consumed[i] || teams[i].is_full() {
            continue;
        }

        let donor = match teams[i].members.len() {
            2 => first_single(&teams, &consumed, i + 1),
            1 => donor_for_single(&teams, &consumed, i + 1),
            _ => None,
        };

        if let Some(j) = donor {
            let absorbed = std::mem::take(&mut teams[j].members);
            tracing::debug!(
                team_id = %teams[i].team_id,
                donor_id = %teams[j].team_id,
                absorbed = absorbed.len(),
                "Merging team"
            );
            teams[i].members.extend(absorbed);
            consumed[j] = true;
            deleted.push(teams[j].team_id);
            changed.push(teams[i].team_id);
        }
    }

    let teams = teams
        .into_iter()
        .zip(consumed)
        .filter_map(|(team, gone)| (!gone).then_some(team))
        .collect();

    Ok(MergeOutcome {
        teams,
        deleted,
        changed,
    })
}

fn first_single(teams: &[FormationTeam], consumed: &[bool], start: usize) -> Option<usize> {
    (start..teams.len()).find(|&j| !consumed[j] && teams[j].members.len() == 1)
}

/// A pair beats a single; the first single found is kept as the fallback.
fn donor_for_single(teams: &[FormationTeam], consumed: &[bool], start: usize) -> Option<usize> {
    let mut fallback = None;

    for j in start..teams.len() {
        if consumed[j] {
            continue;
        }
        match teams[j].members.len() {
            2 => return Some(j),
            1 if fallback.is_none() => fallback = Some(j),
            _ => {}
        }
    }

    fallback
}
