use clap::{ArgAction, Parser};
use log::{error, LevelFilter};
use std::path::PathBuf;
use std::process;

use lfs::config::{DEFAULT_BIND_ADDR, DEFAULT_SERVE_PORT};
use lfs::middleware::profiling::profile;
use lfs::{filters, App, Configuration, FileServer, HyperServer};

/// Serve, accept and delete files below a workspace directory over HTTP.
#[derive(Parser, Debug)]
#[command(name = "lfs", version, about)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "LFS_BIND_ADDR", default_value = DEFAULT_BIND_ADDR)]
    bind_addr: String,

    /// Port to listen on
    #[arg(short, long, env = "LFS_PORT", default_value_t = DEFAULT_SERVE_PORT)]
    port: u16,

    /// Workspace directory, created if missing
    #[arg(long, env = "LFS_PATH", default_value = ".")]
    path: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new().filter_level(level).init();
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let mut config = Configuration::new(cli.path);
    config.bind_addr = cli.bind_addr;
    config.serve_port = cli.port;
    config.fetch_filters = filters![profile];
    config.upload_filters = filters![profile];
    config.delete_filters = filters![profile];

    let app = match App::create(config) {
        Ok(app) => app,
        Err(err) => {
            error!("Failed to prepare workspace: {}", err);
            process::exit(1);
        }
    };

    let host = app.bind_addr().to_owned();
    let port = app.serve_port();

    if let Err(err) = HyperServer::new(app).start(&host, port) {
        error!("File server stopped: {}", err);
        process::exit(1);
    }
}
