use sqlx::PgPool;
use storage::{dto::algorithm::TeamSummary, error::Result, services::algorithm};
use uuid::Uuid;

/// Merge a coach's pending teams for a competition
pub async fn run_algorithm(
    pool: &PgPool,
    competition_id: Uuid,
    coach_user_id: Uuid,
) -> Result<Vec<TeamSummary>> {
    algorithm::run_team_formation(pool, competition_id, coach_user_id).await
}
