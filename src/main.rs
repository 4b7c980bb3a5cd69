mod bot;
mod config;
mod db;
mod directory;
mod discord;
mod error;
mod message;
mod module;
mod modules;
mod rate_limit;
mod util;

use std::path::Path;
use std::sync::Arc;

use config::Config;
use db::Db;
use discord::DiscordGateway;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,serenity=warn,tracing=warn"),
    )
    .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let path = Path::new(&config_path);
    if !path.exists() {
        eprintln!("Config file not found: {}", config_path);
        eprintln!("Copy the example and edit it:");
        eprintln!("  cp config.example.toml config.toml");
        std::process::exit(1);
    }

    let config = Arc::new(Config::load(path)?);
    log::info!("Loaded config from {}", config_path);

    let db = Arc::new(Db::open(Path::new(&config.bot.db_path))?);
    log::info!("Database opened at {}", config.bot.db_path);

    let registry = modules::build_registry(&config)?;
    log::info!("Registered {} command(s)", registry.all().len());

    let bot = Arc::new(bot::Bot::new(Arc::clone(&config), db, registry));
    let _pruner = bot.spawn_pruner();

    DiscordGateway::new(config.discord.token.clone(), bot)
        .run()
        .await?;

    Ok(())
}
