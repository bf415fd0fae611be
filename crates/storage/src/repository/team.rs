use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Student, StudentRow, Team, TeamRow};

/// Repository for team formation reads and writes.
///
/// Every method runs inside a caller-owned transaction so the snapshot that
/// gets merged is the one that gets written.
pub struct TeamRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TeamRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>> {
        Ok(self.pool.begin().await?)
    }

    /// Serializes formation runs for one competition until the transaction ends
    pub async fn lock_competition(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        competition_id: Uuid,
    ) -> Result<()> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(competition_id.to_string())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Configured team size of a competition
    pub async fn find_team_size(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        competition_id: Uuid,
    ) -> Result<i16> {
        let team_size: Option<i16> =
            sqlx::query_scalar("SELECT team_size FROM competitions WHERE competition_id = $1")
                .bind(competition_id)
                .fetch_optional(&mut **tx)
                .await?;

        team_size.ok_or(StorageError::NotFound)
    }

    /// University the coach supervises in this competition
    pub async fn find_coach_university(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        competition_id: Uuid,
        user_id: Uuid,
    ) -> Result<String> {
        let university: Option<String> = sqlx::query_scalar(
            r#"
            SELECT university
            FROM competition_users
            WHERE competition_id = $1
              AND user_id = $2
              AND access_level = 'Coach'
            LIMIT 1
            "#,
        )
        .bind(competition_id)
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await?;

        university.ok_or(StorageError::NotCoach)
    }

    /// Pending teams in the coach's scope, locked for update
    pub async fn list_pending_for_coach(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        competition_id: Uuid,
        coach_id: Uuid,
        university: &str,
    ) -> Result<Vec<Team>> {
        let rows = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT team_id, competition_id, name, pending_name, team_size, participants,
                   university, coach_id, site_id, pending_site_id, seat, status, created_at
            FROM competition_teams
            WHERE competition_id = $1
              AND coach_id = $2
              AND university = $3
              AND status = 'Pending'
            ORDER BY created_at, team_id
            FOR UPDATE
            "#,
        )
        .bind(competition_id)
        .bind(coach_id)
        .bind(university)
        .fetch_all(&mut **tx)
        .await?;

        rows.into_iter().map(Team::try_from).collect()
    }

    /// Participant profiles for the given users
    pub async fn load_students(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        competition_id: Uuid,
        user_ids: &[Uuid],
    ) -> Result<Vec<Student>> {
        let rows = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT user_id, icpc_eligible, boersen_eligible, completed_courses,
                   national_prizes, international_prizes, past_regional, codeforces_rating
            FROM competition_users
            WHERE competition_id = $1
              AND user_id = ANY($2)
              AND access_level = 'Participant'
            "#,
        )
        .bind(competition_id)
        .bind(user_ids)
        .fetch_all(&mut **tx)
        .await?;

        Ok(rows.into_iter().map(Student::from).collect())
    }

    pub async fn update_roster(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        team_id: Uuid,
        participants: &[Uuid],
    ) -> Result<()> {
        let team_size = i16::try_from(participants.len()).map_err(|_| {
            StorageError::ConstraintViolation(format!(
                "Team {team_id} has too many participants"
            ))
        })?;

        let result = sqlx::query(
            r#"
            UPDATE competition_teams
            SET participants = $2,
                team_size = $3
            WHERE team_id = $1
              AND status = 'Pending'
            "#,
        )
        .bind(team_id)
        .bind(participants)
        .bind(team_size)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Deletes teams and the notifications that reference them
    pub async fn delete_teams(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        team_ids: &[Uuid],
    ) -> Result<u64> {
        if team_ids.is_empty() {
            return Ok(0);
        }

        sqlx::query("DELETE FROM notifications WHERE team_id = ANY($1)")
            .bind(team_ids)
            .execute(&mut **tx)
            .await?;

        let result = sqlx::query("DELETE FROM competition_teams WHERE team_id = ANY($1)")
            .bind(team_ids)
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }
}
