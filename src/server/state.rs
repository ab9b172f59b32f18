use axum::extract::FromRef;

use crate::recommend::Recommender;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

/// The recommender is never mutated after startup, so it is shared without a
/// lock.
pub type GuardedRecommender = Arc<Recommender>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub recommender: GuardedRecommender,
}

impl ServerState {
    pub fn new(config: ServerConfig, recommender: GuardedRecommender) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            recommender,
        }
    }
}

impl FromRef<ServerState> for GuardedRecommender {
    fn from_ref(input: &ServerState) -> Self {
        input.recommender.clone()
    }
}
