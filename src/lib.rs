//! Resolve a VitePress-style site root into the configuration the rest of a build consumes.
//!
//! ```no_run
//! # fn main() -> vitepress::error::Result<()> {
//! let resolver = vitepress::Resolver::new(vitepress::AppPaths::new("/opt/vitepress"));
//! let config = futures::executor::block_on(resolver.resolve_config("docs".as_ref()))?;
//! println!("{config}");
//! # Ok(())
//! # }
//! ```

pub mod error;

mod alias;
mod resolver;
mod site_config;
mod site_data;
mod warning;

pub use crate::alias::*;
pub use crate::error::Error;
pub use crate::resolver::*;
pub use crate::site_config::*;
pub use crate::site_data::*;
pub use crate::warning::*;
