mod commands;
mod gateway;
mod render;
mod state;
#[cfg(test)]
mod testing;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use ytnotify_channels::discord::DiscordChannel;
use ytnotify_core::{
    config::{self, shellexpand},
    settings::{Settings, DOCUMENT_ID, PARTITION},
};
use ytnotify_memory::Store;
use ytnotify_youtube::{KeyPool, YouTubeClient};

#[derive(Parser)]
#[command(
    name = "ytnotify",
    version,
    about = "Discord notifications for new YouTube uploads"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and start polling.
    Start,
    /// Show the configuration, stored settings and key count.
    Status,
    /// Fetch the latest video of the stored channel once and print the notification.
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;

    match cli.command {
        Commands::Start => {
            let _guard = init_logging(&cfg.bot.log_level, Some(&cfg.bot.data_dir))?;

            if !cfg.discord.enabled {
                anyhow::bail!("Discord is disabled in config.toml, nothing to run.");
            }
            if cfg.discord.bot_token.is_empty() {
                anyhow::bail!(
                    "Discord bot_token is empty. \
                     Set it in config.toml or the DISCORD_TOKEN env var."
                );
            }

            let keys = KeyPool::from_config_and_env(&cfg.youtube.api_keys);
            let polling = !keys.is_empty();
            let source = Arc::new(YouTubeClient::new(&cfg.youtube.api_base, keys));

            let store = Store::new(&cfg.memory).await?;
            let state = Arc::new(state::NotifierState::load(Arc::new(store)).await?);

            let channel = Arc::new(DiscordChannel::new(cfg.discord.clone()));

            println!("{}: starting...", cfg.bot.name);
            let gw = Arc::new(gateway::Gateway::new(
                channel,
                state,
                source,
                cfg.discord.prefix.clone(),
                Duration::from_secs(cfg.poller.interval_secs.max(1)),
                polling,
            ));
            gw.run().await?;
        }
        Commands::Status => {
            let _guard = init_logging("warn", None)?;
            println!("{}: status check\n", cfg.bot.name);
            println!("Config: {}", cli.config);
            println!(
                "  discord: {}",
                if cfg.discord.enabled && !cfg.discord.bot_token.is_empty() {
                    "configured"
                } else if cfg.discord.enabled {
                    "enabled but missing bot_token"
                } else {
                    "disabled"
                }
            );
            let keys = KeyPool::from_config_and_env(&cfg.youtube.api_keys);
            println!("  youtube keys: {}", keys.len());
            println!("  poll interval: {}s", cfg.poller.interval_secs);
            println!();

            let store = Store::new(&cfg.memory).await?;
            println!("Store: {}", shellexpand(&cfg.memory.db_path));
            println!(
                "  documents in {PARTITION}: {}",
                store.document_ids(PARTITION).await?.join(", ")
            );
            match store.find_document(PARTITION, DOCUMENT_ID).await? {
                Some(doc) => print_settings(&Settings::from_document(doc)?),
                None => println!("  no settings stored yet"),
            }
        }
        Commands::Check => {
            let _guard = init_logging(&cfg.bot.log_level, None)?;
            let keys = KeyPool::from_config_and_env(&cfg.youtube.api_keys);
            let source = YouTubeClient::new(&cfg.youtube.api_base, keys);
            let store = Store::new(&cfg.memory).await?;

            let settings = match store.find_document(PARTITION, DOCUMENT_ID).await? {
                Some(doc) => Settings::from_document(doc)?,
                None => anyhow::bail!("no settings stored yet, run `start` and use ytchannel"),
            };
            if settings.source_channel.is_empty() {
                anyhow::bail!("no YouTube channel set");
            }

            match source.latest_video(&settings.source_channel).await? {
                Some(video) => {
                    let message = render::render(&video, &settings);
                    println!("Latest: {} ({})", video.id, video.title);
                    println!(
                        "New since last notification: {}",
                        if video.id == settings.last_video { "no" } else { "yes" }
                    );
                    println!();
                    println!("{}", message.text);
                    if let Some(embed) = message.embed {
                        println!("[{}] {}", embed.title, embed.url.unwrap_or_default());
                        println!("{}", embed.description);
                    }
                }
                None => println!("{} has no videos", settings.source_channel),
            }
        }
    }

    Ok(())
}

/// Console logging filtered by `RUST_LOG` (default `level`), plus a daily
/// file under `{data_dir}/logs` when a data dir is given.
fn init_logging(level: &str, data_dir: Option<&str>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let console = fmt::layer();

    let (file, guard) = match data_dir {
        Some(dir) => {
            let log_dir = PathBuf::from(shellexpand(dir)).join("logs");
            std::fs::create_dir_all(&log_dir)?;
            let appender = tracing_appender::rolling::daily(log_dir, "ytnotify.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();
    Ok(guard)
}

fn print_settings(s: &Settings) {
    let show = |v: &str| if v.is_empty() { "-".to_string() } else { v.to_string() };
    println!("  mode: {}", s.mode().display_name());
    println!("  enabled: {}", s.enabled);
    println!("  yt: {}", show(&s.source_channel));
    println!("  playlist: {}", show(&s.playlist));
    println!("  channel: {}", show(&s.destination_channel));
    println!("  lastvideo: {}", show(&s.last_video));
    println!("  message: {}", show(&s.message));
    println!(
        "  updated: {}",
        s.updated_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "never".to_string())
    );
}
