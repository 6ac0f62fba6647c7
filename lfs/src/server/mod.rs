pub mod hyper_server;

mod file_server;

pub use file_server::FileServer;

pub use self::hyper_server::HyperServer;
