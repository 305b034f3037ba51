mod credentials;
mod error;
mod grant;
mod grant_storage;
mod scope;

pub use credentials::*;
pub use error::*;
pub use grant::*;
pub use grant_storage::*;
pub use scope::*;
