use axum::{
    Json,
    extract::{Query, State},
};
use storage::{
    Database,
    dto::algorithm::{AlgorithmRequest, AlgorithmResponse, CoachQuery},
};

use crate::error::WebResult;

use super::services;

#[utoipa::path(
    post,
    path = "/competition/algorithm",
    params(CoachQuery),
    request_body = AlgorithmRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Pending teams merged; surviving teams with their strongest member's score", body = AlgorithmResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "User is not a coach for this competition"),
        (status = 409, description = "Pending teams are malformed and were left untouched"),
        (status = 500, description = "Merge commit failed; no changes were written")
    ),
    tag = "algorithm"
)]
pub async fn run_algorithm(
    State(db): State<Database>,
    Query(query): Query<CoachQuery>,
    Json(req): Json<AlgorithmRequest>,
) -> WebResult<Json<AlgorithmResponse>> {
    let teams = services::run_algorithm(db.pool(), req.comp_id, query.user_id).await?;

    Ok(Json(AlgorithmResponse::from(teams)))
}
