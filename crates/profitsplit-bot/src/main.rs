use std::path::PathBuf;

use clap::Parser;
use profitsplit_bot::{
    BotConfig, CommandHandler, ConfigOverrides, Runner, TelegramClient, runner::shutdown_signal,
};
use profitsplit_store::LedgerStore;
use profitsplit_types::constants;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "profitsplitd", version, about = "Profit ledger Telegram bot")]
struct Cli {
    /// TOML config file; flags and environment override its values.
    #[arg(long, env = "PROFITSPLIT_CONFIG")]
    config: Option<PathBuf>,
    /// Telegram bot token.
    #[arg(long, env = "PROFITSPLIT_BOT_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Telegram user ids allowed to run admin commands, comma separated.
    #[arg(long = "admin", env = "PROFITSPLIT_ADMIN_IDS", value_delimiter = ',')]
    admin_ids: Vec<i64>,
    /// SQLite database file, or `:memory:`.
    #[arg(long, env = "PROFITSPLIT_DATABASE")]
    database: Option<PathBuf>,
    /// Bot API base URL.
    #[arg(long, env = "PROFITSPLIT_API_URL")]
    api_url: Option<String>,
    /// Long-poll timeout in seconds.
    #[arg(long, env = "PROFITSPLIT_POLL_TIMEOUT")]
    poll_timeout: Option<u64>,
    /// Process updates queued while the bot was offline instead of dropping them.
    #[arg(long, default_value_t = false)]
    keep_pending: bool,
}

impl Cli {
    fn resolve(self) -> anyhow::Result<BotConfig> {
        let base = match &self.config {
            Some(path) => BotConfig::load(path)?,
            None => BotConfig::default(),
        };
        let config = base.with_overrides(ConfigOverrides {
            token: self.token,
            admin_ids: self.admin_ids,
            database: self.database,
            api_url: self.api_url,
            poll_timeout_secs: self.poll_timeout,
            keep_pending_updates: self.keep_pending,
        });
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "profitsplit=info,info".to_string()),
        )
        .init();

    let config = Cli::parse().resolve()?;
    info!(
        version = constants::VERSION,
        admins = config.admins().len(),
        database = %config.store_location(),
        "starting {}",
        constants::APP_NAME
    );

    let store = match LedgerStore::open(&config.store_location()).await {
        Ok(store) => store,
        Err(err) => {
            error!("cannot open ledger store: {err}");
            return Err(err.into());
        }
    };

    let handler = CommandHandler::new(store.clone(), config.admins());
    let client = TelegramClient::new(&config.api_url, config.token.expose())?;
    let mut runner = Runner::new(client, handler, config.poll_timeout());

    runner.prepare(config.drop_pending_updates).await?;
    runner.run(shutdown_signal()).await?;

    store.close().await;
    info!("bye");
    Ok(())
}
