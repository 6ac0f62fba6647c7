pub mod context;
pub mod errors;
#[macro_use]
pub mod macros;
pub mod path;
pub mod stater;
pub mod workspace;

pub mod middleware;
pub use middleware::{Filter, FilterChain, FilterFn, FilterNext, FilterReturnValue, Filters};
