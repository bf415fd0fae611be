use super::models::{CoachData, RosterFormat, StudentData, TeamData};
use crate::Result;
use sqlx::PgPool;
use std::collections::HashMap;
use storage::models::{CourseCategory, TeamStatus};
use tracing::info;
use uuid::Uuid;

type Tx<'t> = sqlx::Transaction<'t, sqlx::Postgres>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub competition_id: Uuid,
    pub coaches: usize,
    pub students: usize,
    pub teams: usize,
}

/// Writes a validated roster as a new competition with pending teams.
pub struct RosterLoader<'a> {
    pool: &'a PgPool,
}

impl<'a> RosterLoader<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn import_to_database(&self, roster: &RosterFormat) -> Result<ImportSummary> {
        let mut tx = self.pool.begin().await?;

        let competition_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO competitions (name, team_size)
            VALUES ($1, $2)
            RETURNING competition_id
            "#,
        )
        .bind(&roster.competition.name)
        .bind(roster.competition.team_size)
        .fetch_one(&mut *tx)
        .await?;

        let mut coach_ids = HashMap::new();
        for coach in &roster.coaches {
            let user_id = self.insert_coach(competition_id, coach, &mut tx).await?;
            coach_ids.insert(coach.email.to_lowercase(), user_id);
        }

        let mut students = 0;
        for team in &roster.teams {
            let coach_id = coach_ids.get(&team.coach_email.to_lowercase()).copied();
            let mut participants = Vec::with_capacity(team.members.len());

            for student in &team.members {
                let user_id = self
                    .insert_student(competition_id, &team.university, student, &mut tx)
                    .await?;
                participants.push(user_id);
            }
            students += participants.len();

            self.insert_team(competition_id, team, coach_id, &participants, &mut tx)
                .await?;
        }

        tx.commit().await?;

        let summary = ImportSummary {
            competition_id,
            coaches: roster.coaches.len(),
            students,
            teams: roster.teams.len(),
        };
        info!(
            "Imported competition {} with {} coaches, {} students in {} teams",
            summary.competition_id, summary.coaches, summary.students, summary.teams
        );

        Ok(summary)
    }

    async fn upsert_user(&self, name: &str, email: &str, tx: &mut Tx<'_>) -> Result<Uuid> {
        let user_id = sqlx::query_scalar(
            r#"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            ON CONFLICT (email)
            DO UPDATE SET name = EXCLUDED.name
            RETURNING user_id
            "#,
        )
        .bind(name)
        .bind(email.to_lowercase())
        .fetch_one(&mut **tx)
        .await?;

        Ok(user_id)
    }

    async fn insert_coach(
        &self,
        competition_id: Uuid,
        coach: &CoachData,
        tx: &mut Tx<'_>,
    ) -> Result<Uuid> {
        let user_id = self.upsert_user(&coach.name, &coach.email, tx).await?;

        sqlx::query(
            r#"
            INSERT INTO competition_users (competition_id, user_id, access_level, university)
            VALUES ($1, $2, 'Coach', $3)
            "#,
        )
        .bind(competition_id)
        .bind(user_id)
        .bind(&coach.university)
        .execute(&mut **tx)
        .await?;

        Ok(user_id)
    }

    async fn insert_student(
        &self,
        competition_id: Uuid,
        university: &str,
        student: &StudentData,
        tx: &mut Tx<'_>,
    ) -> Result<Uuid> {
        let user_id = self.upsert_user(&student.name, &student.email, tx).await?;

        sqlx::query(
            r#"
            INSERT INTO competition_users (
                competition_id, user_id, access_level, university,
                icpc_eligible, boersen_eligible, completed_courses,
                national_prizes, international_prizes, past_regional, codeforces_rating
            )
            VALUES ($1, $2, 'Participant', $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(competition_id)
        .bind(user_id)
        .bind(university)
        .bind(student.icpc_eligible)
        .bind(student.boersen_eligible)
        .bind(course_labels(&student.completed_courses))
        .bind(&student.national_prizes)
        .bind(&student.international_prizes)
        .bind(student.past_regional)
        .bind(student.codeforces_rating)
        .execute(&mut **tx)
        .await?;

        Ok(user_id)
    }

    async fn insert_team(
        &self,
        competition_id: Uuid,
        team: &TeamData,
        coach_id: Option<Uuid>,
        participants: &[Uuid],
        tx: &mut Tx<'_>,
    ) -> Result<Uuid> {
        let team_id = sqlx::query_scalar(
            r#"
            INSERT INTO competition_teams (
                competition_id, name, team_size, participants, university, coach_id, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING team_id
            "#,
        )
        .bind(competition_id)
        .bind(&team.name)
        .bind(participants.len() as i16)
        .bind(participants)
        .bind(&team.university)
        .bind(coach_id)
        .bind(TeamStatus::Pending.as_str())
        .fetch_one(&mut **tx)
        .await?;

        Ok(team_id)
    }
}

/// Canonical labels for the recognised courses; unknown ones are dropped
fn course_labels(courses: &[String]) -> Vec<String> {
    let mut parsed: Vec<CourseCategory> = courses.iter().filter_map(|c| c.parse().ok()).collect();
    parsed.sort();
    parsed.dedup();
    parsed.iter().map(|c| c.as_str().to_string()).collect()
}
