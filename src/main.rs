mod commands;
mod handlers;
mod settings;

use clap::Parser;
use commands::{CheckCommand, ManualCommand};
use handlers::AppState;
use maps_scraper::{Config, Params, Scraper};
use settings::{BotSettings, Variant};
use std::path::PathBuf;
use std::sync::Arc;
use teloxide::dispatching::{HandlerExt, UpdateFilterExt, UpdateHandler};
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "maps-bot")]
#[command(about = "Telegram bot for active Conflict of Nations maps")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(short, long, default_value = "maps-bot.yaml")]
    config: PathBuf,

    /// Set a parameter (can be used multiple times)
    #[arg(short = 'P', long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (only errors)
    #[arg(short, long)]
    quiet: bool,

    /// Validate config without starting the bot
    #[arg(long)]
    check: bool,
}

fn schema(variant: Variant) -> UpdateHandler<teloxide::RequestError> {
    match variant {
        Variant::Manual => Update::filter_message()
            .branch(
                dptree::entry()
                    .filter_command::<ManualCommand>()
                    .endpoint(handlers::manual_command),
            )
            .branch(dptree::endpoint(handlers::relay_text)),
        Variant::Automated => Update::filter_message()
            .branch(
                dptree::entry()
                    .filter_command::<CheckCommand>()
                    .endpoint(handlers::check_command),
            )
            .branch(dptree::endpoint(handlers::unknown_text)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let params = Params::from_args(&cli.params)?.with_env();
    let settings = BotSettings::load(&cli.config, &params)?;
    let scraper = match settings.variant {
        Variant::Automated => Some(Scraper::new(Config::load_with_params(
            &cli.config,
            &params,
        )?)),
        Variant::Manual => None,
    };

    if cli.check {
        println!("Config valid: {}", cli.config.display());
        println!("  Variant: {}", settings.variant);
        println!("  Max message length: {}", settings.max_message_len);
        if let Some(chat) = settings.relay_chat_id {
            println!("  Relay chat: {}", chat);
        }
        if let Some(ref scraper) = scraper {
            let config = scraper.config();
            println!("  Target: {}", config.target.url);
            println!("  Steps: {}", config.steps.len());
            println!("  Wait strategy: {:?}", config.wait.strategy);
        }
        return Ok(());
    }

    let bot = Bot::new(settings.token.clone());
    let commands = match settings.variant {
        Variant::Manual => ManualCommand::bot_commands(),
        Variant::Automated => CheckCommand::bot_commands(),
    };
    if let Err(e) = bot.set_my_commands(commands).await {
        tracing::warn!("Failed to register command list: {}", e);
    }

    let variant = settings.variant;
    let state = Arc::new(AppState { settings, scraper });

    tracing::info!("🤖 Bot started ({} variant)", variant);
    Dispatcher::builder(bot, schema(variant))
        .dependencies(dptree::deps![state])
        .default_handler(|upd| async move {
            tracing::debug!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "Error in update handler",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("Bot stopped");
    Ok(())
}
