use chrono::Utc;
use grantkeeper::application_port::*;
use grantkeeper::logger::*;
use grantkeeper::settings::*;
use grantkeeper::store::*;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    info!(store = ?project_settings.store);
    let logger_config = LogConfig {
        filter: project_settings.log.filter.clone(),
        format: project_settings.log.format,
    };
    logger.reload_from_config(&logger_config)?;

    let store = Store::try_new(&project_settings).await?;

    let scope = store.scope();
    let interrupt = scope.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling");
            interrupt.cancel();
        }
    });

    let result = run(&store, &scope, cli.command.unwrap_or(Command::Configure)).await;

    let shutdown_timeout = std::time::Duration::from_secs(10);
    match tokio::time::timeout(shutdown_timeout, store.shutdown()).await {
        Ok(_) => info!("store shutdown successfully"),
        Err(_) => error!("store shutdown timed out"),
    }

    result
}

async fn run(store: &Store, scope: &OpScope, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Configure => store.configure().await?,
        Command::PurgeJtis => {
            let removed = store.denied_jtis.delete_before(scope, Utc::now()).await?;
            info!(removed, "expired jtis purged");
        }
        Command::RevokeAccess { request_id } => {
            store.requests.revoke_access_token(scope, &request_id).await?;
            info!(%request_id, "access token revoked");
        }
        Command::RevokeRefresh { request_id } => {
            store.requests.revoke_refresh_token(scope, &request_id).await?;
            info!(%request_id, "refresh token revoked");
        }
    }
    Ok(())
}
