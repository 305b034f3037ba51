mod authorize_code;
mod credential_hasher;
mod denied_jti_manager;
mod hydration;
mod jti_memory_cache;
mod password_grant;
mod request_manager;
mod request_store;
mod revocation;

pub use credential_hasher::*;
pub use denied_jti_manager::*;
pub use hydration::*;
pub use jti_memory_cache::*;
pub use request_manager::*;
pub use request_store::*;
