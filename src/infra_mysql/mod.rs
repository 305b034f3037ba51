mod client_store_mysql;
mod denied_jti_repo_mysql;
mod request_repo_mysql;
mod user_store_mysql;

pub use client_store_mysql::*;
pub use denied_jti_repo_mysql::*;
pub use request_repo_mysql::*;
pub use user_store_mysql::*;

mod repo_tx_mysql;

pub use repo_tx_mysql::*;

mod util;
