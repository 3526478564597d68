use clap::Parser;
use color_eyre::Result;
use postwatch::app::App;
use postwatch::config::Config;
use postwatch::utils::{get_config_dir, initialize_panic_handler};
use std::path::PathBuf;
use std::{env, fs};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
/// Telegram bot that notifies about new posts of a Reddit profile.
struct Args {
    /// Path to the configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Telegram bot token, overrides the configuration file.
    #[arg(short, long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Seconds between two polls of the watched profile.
    #[arg(short, long)]
    interval: Option<u64>,
}

impl Args {
    fn config_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.config {
            Ok(path.clone())
        } else {
            Ok(get_config_dir()?.join("postwatch.config.toml"))
        }
    }
}

fn init_logger() {
    let mut builder = env_logger::Builder::from_default_env();
    if env::var("RUST_LOG").is_err() {
        builder.filter_level(log::LevelFilter::Warn);
    }
    builder.init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let path = args.config_path()?;
    let mut config = if path.exists() {
        toml::from_str(&fs::read_to_string(&path)?)?
    } else {
        Config::default()
    };
    if let Some(token) = args.token {
        config.telegram.token = Some(token);
    }
    if let Some(interval) = args.interval {
        config.watcher.interval = interval;
    }

    init_logger();

    initialize_panic_handler()?;

    App::new(config)?.run().await
}
