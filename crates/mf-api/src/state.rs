//! Shared handler state

use mf_database_mysql::{
    AnalyticsRepository, FundRepository, NavRepository, PipelineStatusRepository,
    SyncStateRepository,
};
use mf_limiter::RateLimiter;
use mf_loaders::PipelineRunner;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub funds: Arc<FundRepository>,
    pub navs: Arc<NavRepository>,
    pub analytics: Arc<AnalyticsRepository>,
    pub sync_states: Arc<SyncStateRepository>,
    pub pipeline: Arc<PipelineStatusRepository>,
    pub limiter: Arc<RateLimiter>,
    pub runner: Arc<PipelineRunner>,
}
