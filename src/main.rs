use ::serenity::all::ClientBuilder;
use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use songbird::{SerenityInit, Songbird};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use jukebox::commands::music::{
    audio_sources::YtDlp,
    join::*, leave::*, now::*, pause::*, play::*, queue::*, remove::*, repeat::*, resume::*,
    shuffle::*, skip::*, stop::*, volume::*,
    utils::{
        guild_registry::GuildRegistry,
        music_manager::PlayerSettings,
        notifier::ChannelNotifier,
        voice::SongbirdTransport,
    },
};
use jukebox::config::BotConfig;
use jukebox::{CommandResult, Context, Data, Error, events};

#[poise::command(slash_command, prefix_command, category = "General")]
async fn help(
    ctx: Context<'_>,
    #[description = "Specific command to show help about"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    command: Option<String>,
) -> CommandResult {
    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            show_context_menu_commands: true,
            ..Default::default()
        },
    )
    .await
    .map_err(|e| e.into())
}

#[poise::command(prefix_command, hide_in_help)]
async fn register(ctx: Context<'_>) -> Result<(), Error> {
    poise::builtins::register_application_commands_buttons(ctx)
        .await
        .map_err(|e| e.into())
}

/// Report command errors the commands did not turn into a reply themselves.
async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Command {} failed: {}", ctx.command().name, error);
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize logging with debug level for our crate
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("jukebox=debug,warn")),
        )
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true)
        .with_ansi(true)
        .pretty()
        .init();

    dotenv().ok();

    let config = BotConfig::from_env()?;
    info!(
        "Starting with prefix {:?}, yt-dlp at {:?}",
        config.prefix, config.ytdlp_path
    );

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_VOICE_STATES;

    let commands = vec![
        // Default commands
        register(),
        help(),
        // Music commands
        join(),
        leave(),
        now(),
        pause(),
        play(),
        queue(),
        remove(),
        repeat(),
        resume(),
        shuffle(),
        skip(),
        stop(),
        volume(),
    ];

    let songbird = Songbird::serenity();
    let voice = Arc::clone(&songbird);
    let settings = PlayerSettings {
        volume: config.default_volume,
        ..Default::default()
    };
    let ytdlp_path = config.ytdlp_path.clone();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands,
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.prefix.clone()),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(events::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                let transport = Arc::new(SongbirdTransport::new(voice, reqwest::Client::new()));
                let notifier = Arc::new(ChannelNotifier::new(Arc::clone(&ctx.http)));

                Ok(Data {
                    registry: GuildRegistry::new(transport, notifier, settings),
                    extractor: Arc::new(YtDlp::new(ytdlp_path)),
                })
            })
        });

    let mut client = ClientBuilder::new(config.discord_token, intents)
        .framework(framework.build())
        .register_songbird_with(songbird)
        .await?;

    client.start().await.map_err(Into::into)
}
