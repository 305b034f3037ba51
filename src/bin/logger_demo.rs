use grantkeeper::logger::*;
use grantkeeper::settings::LogFormat;

fn main() -> anyhow::Result<()> {
    let logger = Logger::new_bootstrap();
    trace!("bootstrap trace log");
    debug!("bootstrap debug log");
    info!("bootstrap info log");

    let config = LogConfig {
        filter: "debug".to_string(),
        format: LogFormat::Pretty,
    };
    logger.reload_from_config(&config)?;
    trace!("application trace log");
    debug!(collection = "access_token", "application debug log");

    let config = LogConfig {
        filter: "info".to_string(),
        format: LogFormat::Json,
    };
    logger.reload_from_config(&config)?;
    debug!("hidden debug log");
    info!(removed = 3, "json info log");

    Ok(())
}
