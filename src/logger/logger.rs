use crate::settings::LogFormat;
use anyhow::{Result, anyhow};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, filter, fmt, layer::SubscriberExt, reload,
    util::SubscriberInitExt,
};

pub struct LogConfig {
    pub filter: String,
    pub format: LogFormat,
}

/// Both output layers are installed up front; `format` picks which one
/// emits, so it can change after bootstrap like the filter does.
pub struct Logger {
    reload_handle: reload::Handle<EnvFilter, Registry>,
    json: Arc<AtomicBool>,
}

impl Logger {
    pub fn new_bootstrap() -> Self {
        let filter = EnvFilter::new("info");
        let (filter, reload_handle) = reload::Layer::new(filter);

        let json = Arc::new(AtomicBool::new(false));
        let (as_text, as_json) = (json.clone(), json.clone());

        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_filter(filter::filter_fn(move |_| !as_text.load(Ordering::Relaxed))),
            )
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_filter(filter::filter_fn(move |_| as_json.load(Ordering::Relaxed))),
            )
            .init();

        Self {
            reload_handle,
            json,
        }
    }

    pub fn reload_from_config(&self, config: &LogConfig) -> Result<()> {
        let filter = EnvFilter::try_new(&config.filter).map_err(|e| anyhow!(e))?;
        self.reload_handle.reload(filter).map_err(|e| anyhow!(e))?;
        self.json
            .store(config.format == LogFormat::Json, Ordering::Relaxed);
        Ok(())
    }
}
