use anyhow::Result;
use log::{error, info};
use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::sync::Arc;

use rocketcamp::camp::spawn_watch_task;
use rocketcamp::config::Settings;
use rocketcamp::context::AppContext;
use rocketcamp::handler::MessageHandler;

struct Handler {
    message_handler: MessageHandler,
    app: Arc<AppContext>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        if let Err(e) = self.message_handler.handle_message(&ctx, &msg).await {
            error!("Error handling message: {e:#}");
            if let Err(why) = msg
                .channel_id
                .say(&ctx.http, "ขออภัย เกิดข้อผิดพลาดระหว่างประมวลผลข้อความ ลองใหม่อีกครั้งนะครับ")
                .await
            {
                error!("Failed to send error message: {why}");
            }
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        let rt = self.app.runtime();
        info!("🚀 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!(
            "Auto-reply: {} ({})",
            if rt.auto_reply { "ON" } else { "OFF" },
            rt.mode
        );
        if rt.allowed_channels.is_empty() {
            info!("Allowed channels: ALL");
        } else {
            info!(
                "Allowed channels: {}",
                rt.allowed_channels
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&settings.log_level),
    )
    .init();

    info!("Starting Rocket Camp info bot...");

    let token = settings.discord_token.clone();
    let app = Arc::new(AppContext::new(settings));
    app.store.load();
    spawn_watch_task(Arc::clone(&app.store));

    let handler = Handler {
        message_handler: MessageHandler::new(Arc::clone(&app)),
        app: Arc::clone(&app),
    };

    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {e}")
        })?;

    info!("Bot configured successfully. Connecting to Discord gateway...");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!("Failed to establish gateway connection: {why}"));
    }

    Ok(())
}
