//! Server configuration from command-line flags and the environment.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "req-board")]
#[command(about = "Record server persisting actors, requirements and acceptance criteria to a JSON file")]
pub struct ServerConfig {
    /// Listen address
    #[arg(short, long, env = "REQ_BOARD_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: SocketAddr,

    /// Path of the JSON store file
    #[arg(short, long, env = "REQ_BOARD_DB", default_value = "db.json")]
    pub db: PathBuf,
}
