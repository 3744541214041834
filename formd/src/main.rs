use std::process;

use clap::{Arg, Command};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::Config;

mod api;
mod config;
mod error;
mod extractors;

pub const NAME: &str = "formd";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    println!("Starting {NAME} version {VERSION}");

    // Setup CLI
    let matches = Command::new(NAME)
        .version(VERSION)
        .about("Form decoding service")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file")
                .default_value("formd.toml"),
        )
        .get_matches();

    // Setup configuration
    let Some(config_path) = matches.get_one::<String>("config") else {
        eprintln!("Error loading configuration: no config file given");
        process::exit(1);
    };
    let cfg = Config::new(config_path).unwrap_or_else(|e| {
        eprintln!("Error loading configuration: {e}");
        process::exit(1);
    });

    // Setup logging
    let _guards = cfg.init_logger().unwrap_or_else(|e| {
        eprintln!("Error initializing logging: {e}");
        process::exit(1);
    });

    let app = api::create_router(&cfg.server);

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to build runtime: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(server(app, &cfg)) {
        error!("Server error: {e}");
    }
    process::exit(1);
}

async fn server(app: axum::Router, cfg: &Config) -> std::io::Result<()> {
    let bind_addr = cfg.server.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;

    info!("Listening on {bind_addr}");
    axum::serve(listener, app).await
}
