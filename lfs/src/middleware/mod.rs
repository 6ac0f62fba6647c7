pub mod cors;
pub mod file;
pub mod profiling;
