use super::Parser;
use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(version, about = "Grant and JTI store maintenance")]
pub struct Cli {
    #[arg(long)]
    pub settings: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create tables and install record expiry.
    Configure,
    /// Remove denied JTIs whose expiry has passed.
    PurgeJtis,
    /// Revoke an access token by request id.
    RevokeAccess { request_id: String },
    /// Revoke a refresh token by request id.
    RevokeRefresh { request_id: String },
}
