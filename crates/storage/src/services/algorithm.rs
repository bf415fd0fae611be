use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::algorithm::TeamSummary;
use crate::error::{Result, StorageError};
use crate::models::Student;
use crate::repository::team::TeamRepository;
use crate::services::scoring::apply_scores;
use crate::services::team_formation::{
    FormationError, FormationTeam, MergeOutcome, check_team_size, merge_teams, rank_teams,
};

#[derive(Debug, Clone)]
pub struct TeamFormationPlan {
    pub outcome: MergeOutcome,
    pub summaries: Vec<TeamSummary>,
}

/// Scores, ranks and merges an in-memory snapshot of pending teams.
pub fn plan_team_formation(
    mut teams: Vec<FormationTeam>,
) -> std::result::Result<TeamFormationPlan, FormationError> {
    for team in &mut teams {
        apply_scores(&mut team.members);
    }

    rank_teams(&mut teams);
    let outcome = merge_teams(teams)?;
    let summaries = outcome.teams.iter().map(TeamSummary::from).collect();

    Ok(TeamFormationPlan { outcome, summaries })
}

/// Merges the coach's pending teams for a competition and persists the result.
///
/// Runs in one transaction holding a per-competition advisory lock, so either
/// every roster update and deletion lands or none does.
pub async fn run_team_formation(
    pool: &PgPool,
    competition_id: Uuid,
    coach_user_id: Uuid,
) -> Result<Vec<TeamSummary>> {
    tracing::info!(%competition_id, %coach_user_id, "Running team formation");

    let repo = TeamRepository::new(pool);
    let mut tx = repo.begin().await?;

    repo.lock_competition(&mut tx, competition_id).await?;

    let team_size = repo.find_team_size(&mut tx, competition_id).await?;
    check_team_size(team_size)?;

    let university = repo
        .find_coach_university(&mut tx, competition_id, coach_user_id)
        .await?;

    let pending = repo
        .list_pending_for_coach(&mut tx, competition_id, coach_user_id, &university)
        .await?;

    if pending.is_empty() {
        tracing::info!(%competition_id, "No pending teams to merge");
        return Ok(Vec::new());
    }

    let member_ids: Vec<Uuid> = pending
        .iter()
        .flat_map(|team| team.participants.iter().copied())
        .collect();

    let profiles: HashMap<Uuid, Student> = repo
        .load_students(&mut tx, competition_id, &member_ids)
        .await?
        .into_iter()
        .map(|student| (student.user_id, student))
        .collect();

    let teams = pending
        .into_iter()
        .map(|team| {
            let members = team
                .participants
                .iter()
                .map(|user_id| {
                    profiles.get(user_id).cloned().unwrap_or_else(|| {
                        tracing::warn!(%user_id, team_id = %team.team_id, "Participant has no profile, scoring as zero");
                        Student::unscored(*user_id)
                    })
                })
                .collect();
            FormationTeam::new(team.team_id, team.name, members)
        })
        .collect();

    let plan = plan_team_formation(teams)?;

    persist_outcome(&repo, &mut tx, &plan.outcome)
        .await
        .map_err(into_commit_failure)?;

    tx.commit()
        .await
        .map_err(|e| into_commit_failure(StorageError::Database(e)))?;

    tracing::info!(
        %competition_id,
        teams = plan.summaries.len(),
        merged = plan.outcome.changed.len(),
        deleted = plan.outcome.deleted.len(),
        "Team formation committed"
    );

    Ok(plan.summaries)
}

async fn persist_outcome(
    repo: &TeamRepository<'_>,
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    outcome: &MergeOutcome,
) -> Result<()> {
    for team in outcome
        .teams
        .iter()
        .filter(|team| outcome.changed.contains(&team.team_id))
    {
        repo.update_roster(tx, team.team_id, &team.member_ids())
            .await?;
    }

    repo.delete_teams(tx, &outcome.deleted).await?;

    Ok(())
}

/// Any failure once writing has started is reported as one commit failure
fn into_commit_failure(error: StorageError) -> StorageError {
    StorageError::MergeCommitFailed(Box::new(error))
}
