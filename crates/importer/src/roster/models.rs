use serde::{Deserialize, Serialize};
use validator::Validate;

/// Roster document accepted by `import roster`.
///
/// A student who registered alone is a team with a single member.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RosterFormat {
    #[validate(nested)]
    pub competition: CompetitionData,
    #[validate(nested)]
    pub coaches: Vec<CoachData>,
    #[validate(nested)]
    pub teams: Vec<TeamData>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompetitionData {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[serde(default = "default_team_size")]
    #[validate(range(min = 3, max = 3, message = "Teams have exactly 3 places"))]
    pub team_size: i16,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CoachData {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 255))]
    pub university: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TeamData {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(length(min = 1, max = 255))]
    pub university: String,

    #[validate(email)]
    pub coach_email: String,

    #[validate(length(min = 1, max = 3, message = "A team has between 1 and 3 members"), nested)]
    pub members: Vec<StudentData>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StudentData {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[serde(default)]
    pub icpc_eligible: bool,

    #[serde(default)]
    pub boersen_eligible: bool,

    #[serde(default)]
    pub completed_courses: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub national_prizes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub international_prizes: Option<String>,

    #[serde(default)]
    pub past_regional: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "Rating cannot be negative"))]
    pub codeforces_rating: Option<i32>,
}

impl RosterFormat {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn default_team_size() -> i16 {
    3
}
