mod denied_jti_repo_redis;

pub use denied_jti_repo_redis::*;
