use axum::{Router, middleware, routing::post};
use storage::Database;

use super::handlers::run_algorithm;
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    Router::new()
        .route("/algorithm", post(run_algorithm))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
