#[macro_use]
extern crate log;

#[macro_use]
mod core;

mod app;
mod server;

pub mod config;
pub mod middleware;

pub use crate::core::context::{Content, FilterContext};
pub use crate::core::errors::{self, FsError, FsResult};
pub use crate::core::path::{is_sub_path, normalize, resolve_path};
pub use crate::core::stater::{EntryKind, Stater};
pub use crate::core::workspace::{remove_empty_dirs, Workspace};
pub use crate::core::{Filter, FilterChain, FilterFn, FilterNext, FilterReturnValue, Filters};

pub use app::testing_async as testing;
pub use app::App;
pub use config::Configuration;

pub use server::*;
