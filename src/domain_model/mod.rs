mod client;
mod denied_jti;
mod filter;
mod grant_kind;
mod request;
mod user;

pub use client::*;
pub use denied_jti::*;
pub use filter::*;
pub use grant_kind::*;
pub use request::*;
pub use user::*;
