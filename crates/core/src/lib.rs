mod fs;
mod source;

pub use fs::*;
pub use source::*;

pub type Status = status::Status;
pub type Result<T, E = Status> = std::result::Result<T, E>;
