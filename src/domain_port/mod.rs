// repo

mod denied_jti_repo;
mod request_repo;

pub use denied_jti_repo::*;
pub use request_repo::*;

// collaborators

mod client_store;
mod user_store;

pub use client_store::*;
pub use user_store::*;

// engine

mod clock;
mod configure;
mod repo_tx;

pub use clock::*;
pub use configure::*;
pub use repo_tx::*;
