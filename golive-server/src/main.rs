use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use golive_core::AppConfig;
use golive_core::platforms::telegram::TelegramNotifier;
use golive_core::platforms::twitch::TwitchStatusProvider;
use golive_core::tasks::stream_watch::{StreamWatcher, spawn_stream_watch_task};

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("golive_core=info".parse().unwrap_or_default())
        .add_directive("golive_server=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub).expect("Failed to set global subscriber");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // Configuration is the only fatal failure mode: there is no meaningful
    // default to fall back to.
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Error reading configuration: {e}");
            std::process::exit(1);
        }
    };

    info!(
        "Loaded {} usernames: {}",
        config.twitch.usernames.len(),
        config.twitch.usernames.join(", ")
    );

    let provider = Arc::new(TwitchStatusProvider::new(
        &config.twitch.app_id,
        &config.twitch.app_secret,
    ));
    let notifier = Arc::new(TelegramNotifier::new(
        &config.telegram.bot_token,
        config.telegram.chat_id,
    ));

    let watcher = StreamWatcher::new(
        provider,
        notifier,
        config.twitch.usernames.clone(),
        config.poll_interval,
    );
    let watch_task = spawn_stream_watch_task(watcher);

    tokio::select! {
        res = watch_task => {
            if let Err(e) = res {
                error!("Watch task ended unexpectedly: {e}");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl-C, shutting down");
        }
    }

    Ok(())
}
