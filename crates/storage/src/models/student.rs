use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// University course categories, ordered by advancement level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CourseCategory {
    Introduction,
    DataStructures,
    AlgorithmDesign,
    ProgrammingChallenges,
}

impl CourseCategory {
    /// Label stored in `competition_users.completed_courses`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Introduction => "Introduction",
            Self::DataStructures => "Data Structures",
            Self::AlgorithmDesign => "Algorithm Design",
            Self::ProgrammingChallenges => "Programming Challenges",
        }
    }
}

impl fmt::Display for CourseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CourseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "introduction" => Ok(Self::Introduction),
            "datastructures" => Ok(Self::DataStructures),
            "algorithmdesign" => Ok(Self::AlgorithmDesign),
            "programmingchallenges" => Ok(Self::ProgrammingChallenges),
            _ => Err(format!("unknown course category '{s}'")),
        }
    }
}

/// A participating student's competitive-programming profile.
///
/// `algorithm_point` is derived by the scorer and is never read back from
/// the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub user_id: Uuid,
    pub icpc_eligible: bool,
    pub boersen_eligible: bool,
    pub completed_courses: Vec<CourseCategory>,
    pub national_prizes: Option<String>,
    pub international_prizes: Option<String>,
    pub past_regional: bool,
    pub codeforces_rating: i32,
    pub algorithm_point: i32,
}

impl Student {
    /// A student with no recorded profile attributes.
    pub fn unscored(user_id: Uuid) -> Self {
        Self {
            user_id,
            icpc_eligible: false,
            boersen_eligible: false,
            completed_courses: Vec::new(),
            national_prizes: None,
            international_prizes: None,
            past_regional: false,
            codeforces_rating: 0,
            algorithm_point: 0,
        }
    }
}

/// Raw `competition_users` row for a participant
#[derive(Debug, Clone, FromRow)]
pub struct StudentRow {
    pub user_id: Uuid,
    pub icpc_eligible: bool,
    pub boersen_eligible: bool,
    pub completed_courses: Vec<String>,
    pub national_prizes: Option<String>,
    pub international_prizes: Option<String>,
    pub past_regional: bool,
    pub codeforces_rating: Option<i32>,
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        let mut completed_courses: Vec<CourseCategory> = row
            .completed_courses
            .iter()
            .filter_map(|label| match label.parse() {
                Ok(course) => Some(course),
                Err(e) => {
                    tracing::warn!(user_id = %row.user_id, "Ignoring course: {}", e);
                    None
                }
            })
            .collect();
        completed_courses.sort();
        completed_courses.dedup();

        Self {
            user_id: row.user_id,
            icpc_eligible: row.icpc_eligible,
            boersen_eligible: row.boersen_eligible,
            completed_courses,
            national_prizes: non_blank(row.national_prizes),
            international_prizes: non_blank(row.international_prizes),
            past_regional: row.past_regional,
            codeforces_rating: row.codeforces_rating.unwrap_or(0),
            algorithm_point: 0,
        }
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}
