mod bundler;
mod export;
mod extends;
mod loader;
mod merge;
mod path;
mod user;

pub use self::bundler::*;
pub use self::export::*;
pub use self::extends::*;
pub use self::loader::*;
pub use self::merge::*;
pub use self::path::*;
pub use self::user::*;

pub use serde_yaml::Mapping;
pub use serde_yaml::Value;

pub type Status = status::Status;
pub type Result<T, E = Status> = std::result::Result<T, E>;
