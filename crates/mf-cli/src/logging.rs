//! Logging initialization
//!
//! Console output always; when LOG_DIR is set, a daily-rotated file under
//! that directory additionally captures everything at the same filter.

use anyhow::Result;
use mf_core::Config;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub fn init(config: &Config, verbose: bool) -> Result<Option<WorkerGuard>> {
  let filter = if verbose { "debug".to_string() } else { config.log_level.clone() };
  let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

  let console_layer = tracing_subscriber::fmt::layer();

  match &config.log_dir {
    Some(log_dir) => {
      let appender = tracing_appender::rolling::daily(log_dir, "mf-nav.log");
      let (writer, guard) = tracing_appender::non_blocking(appender);
      let file_layer = tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false);

      tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

      Ok(Some(guard))
    }
    None => {
      tracing_subscriber::registry().with(env_filter).with(console_layer).init();
      Ok(None)
    }
  }
}
