use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::services::team_formation::FormationTeam;

/// Request body for running team formation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmRequest {
    pub comp_id: Uuid,
}

/// Identifies the coach running team formation
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CoachQuery {
    /// User id of the coach
    pub user_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub id: Uuid,
    pub name: String,
    pub participants: Vec<Uuid>,
    /// Strongest member's algorithm point, for display only
    pub algo_point: i32,
}

impl From<&FormationTeam> for TeamSummary {
    fn from(team: &FormationTeam) -> Self {
        Self {
            id: team.team_id,
            name: team.name.clone(),
            participants: team.member_ids(),
            algo_point: team.strength(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmResult {
    pub teams_participating: Vec<TeamSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AlgorithmResponse {
    pub algorithm: AlgorithmResult,
}

impl From<Vec<TeamSummary>> for AlgorithmResponse {
    fn from(teams_participating: Vec<TeamSummary>) -> Self {
        Self {
            algorithm: AlgorithmResult {
                teams_participating,
            },
        }
    }
}
