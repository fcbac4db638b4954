mod errors;
mod handlers;
mod middleware;
mod requests;
mod state;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

pub use errors::HttpError;
pub use requests::{AgentDataSetRequest, AgentRequest};
pub use state::{HttpState, TOKEN_HEADER, generate_token};

pub fn router(state: HttpState) -> Router<()> {
    let api = Router::new()
        .route("/avg_action_cost", post(handlers::avg_action_cost))
        .route("/agent_config", post(handlers::agent_config))
        .route("/agent_data", post(handlers::agent_data))
        .route("/agent_data_set", post(handlers::agent_data_set))
        .route("/agent_quota", post(handlers::agent_quota))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_token,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .fallback(handlers::not_found)
        .with_state(state)
}
