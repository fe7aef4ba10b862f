use clap::Parser;
use tracing::error;

use caseless_host::{
    sys_config::core::{Args, Config},
    sys_core::core::run_server,
    trc::Trc,
};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = Trc::default().init() {
        eprintln!("{e}");
        std::process::exit(1);
    }

    let config = match Config::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_server(config).await {
        error!("{e}");
        std::process::exit(1);
    }
}
