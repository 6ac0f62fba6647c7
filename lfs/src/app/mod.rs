mod app;

pub mod testing_async;

pub use self::app::*;
