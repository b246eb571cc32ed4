use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::ChronoLocal;

pub struct Logger;

impl Logger {
  /// Installs the global subscriber. `RUST_LOG` wins over the `info` default.
  pub fn init() -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
      .with_default_directive(LevelFilter::INFO.into())
      .from_env()?
      .add_directive("hyper=warn".parse()?);

    tracing_subscriber::fmt()
      .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
      .with_env_filter(filter)
      .try_init()
      .map_err(|e| anyhow::anyhow!(e))?;

    Ok(())
  }
}
