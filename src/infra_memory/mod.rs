mod client_store_memory;
mod denied_jti_repo_memory;
mod request_repo_memory;
mod user_store_memory;

pub use client_store_memory::*;
pub use denied_jti_repo_memory::*;
pub use request_repo_memory::*;
pub use user_store_memory::*;

mod repo_tx_memory;

pub use repo_tx_memory::*;
