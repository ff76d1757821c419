mod app;
mod calendar;
mod composer;
mod config;
mod location;
mod model;
mod streaming;
mod ticker;

use simplelog::{ColorChoice, TermLogger, TerminalMode};

#[tokio::main]
async fn main() {
    let conf = match config::Config::from_env() {
        Ok(conf) => conf,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    if let Err(e) = TermLogger::init(conf.log_level, simplelog::Config::default(), TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("logger is not initialized: {}", e);
    }
    if let Err(e) = app::run(conf).await {
        log::error!("cryptotracker stopped: {}", e);
        std::process::exit(1);
    }
}
