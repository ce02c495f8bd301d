//! Service wiring: pool, limiter, client, repositories, pipeline runner

use anyhow::{Context, Result};
use mf_api::AppState;
use mf_client::MfApiClient;
use mf_core::config::KvStoreConfig;
use mf_core::Config;
use mf_database_mysql::{
  establish_pool, AnalyticsRepository, FundRepository, NavRepository, PipelineStatusRepository,
  SyncStateRepository,
};
use mf_limiter::{BucketStore, MemoryStore, RateLimiter, RedisStore, UpstashStore};
use mf_loaders::{LoaderConfig, LoaderContext, PipelineRunner};
use std::sync::Arc;
use tracing::{info, warn};

pub struct Runtime {
  pub state: AppState,
  pub runner: Arc<PipelineRunner>,
}

pub async fn build(config: &Config, show_progress: bool) -> Result<Runtime> {
  let pool = establish_pool(&config.database_url, config.db_pool_size)
    .await
    .context("failed to create database pool")?;

  let store = kv_store(&config.kv_store).await?;
  let limiter = Arc::new(RateLimiter::new(
    store,
    &config.rate_limits,
    mf_core::RATE_LIMIT_KEY_PREFIX,
  ));

  let client = Arc::new(MfApiClient::new(&config.mfapi, Arc::clone(&limiter))?);

  let funds = Arc::new(FundRepository::new(pool.clone()));
  let navs = Arc::new(NavRepository::new(pool.clone()));
  let analytics = Arc::new(AnalyticsRepository::new(pool.clone()));
  let sync_states = Arc::new(SyncStateRepository::new(pool.clone()));
  let pipeline = Arc::new(PipelineStatusRepository::new(pool));

  let context = Arc::new(LoaderContext {
    client,
    funds: Arc::clone(&funds),
    navs: Arc::clone(&navs),
    analytics: Arc::clone(&analytics),
    sync_states: Arc::clone(&sync_states),
    pipeline: Arc::clone(&pipeline),
    config: LoaderConfig { show_progress, ..LoaderConfig::default() },
  });

  let runner = Arc::new(PipelineRunner::new(context));
  runner.startup_recovery().await.context("pipeline startup recovery failed")?;

  let state = AppState {
    funds,
    navs,
    analytics,
    sync_states,
    pipeline,
    limiter,
    runner: Arc::clone(&runner),
  };

  Ok(Runtime { state, runner })
}

async fn kv_store(config: &KvStoreConfig) -> Result<Arc<dyn BucketStore>> {
  match config {
    KvStoreConfig::Redis { url } => match RedisStore::connect(url).await {
      Ok(store) => {
        info!("rate limiter backed by Redis at {}", url);
        Ok(Arc::new(store))
      }
      Err(e) => {
        // The limiter fails open per acquire; starting without the shared
        // store keeps the API usable but leaves admission unbounded, so say
        // so loudly and fall back to process-local accounting.
        warn!(error = %e, "Redis unreachable; falling back to in-memory limiter state");
        Ok(Arc::new(MemoryStore::new()))
      }
    },
    KvStoreConfig::Upstash { url, token } => {
      info!("rate limiter backed by Upstash REST at {}", url);
      Ok(Arc::new(UpstashStore::new(url.clone(), token.clone())?))
    }
  }
}
