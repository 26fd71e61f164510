use std::sync::Arc;

use crate::{config::Config, pipeline::SubmissionPipeline};
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<SubmissionPipeline>,
    pub config: Config,
}

impl FromRef<AppState> for Arc<SubmissionPipeline> {
    fn from_ref(state: &AppState) -> Self {
        state.pipeline.clone()
    }
}
