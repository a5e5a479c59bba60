//! Per-message control flow: command dispatch and the auto-reply pipeline
//! (rate gate → topic gate → intent match → render | LLM fallback).
//!
//! The decision of *what* to send is pure ([`plan_auto_reply`]); this module
//! owns the sends. Errors bubble to the event boundary in `bin/bot.rs`,
//! which logs and apologizes — a bad message never takes the bot down.

use crate::answers::{self, EmbedAnswer, ScheduleKind, SAFE_REPLY_LEN};
use crate::commands::{self, admin, Command};
use crate::context::AppContext;
use crate::intents::{normalize, Intent, IntentCatalog};
use anyhow::Result;
use log::{debug, error, info};
use serenity::builder::CreateEmbed;
use serenity::model::channel::Message;
use serenity::prelude::Context;
use std::sync::Arc;
use std::time::Duration;

/// What the auto-reply pipeline decided to send for a non-command message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyPlan {
    /// Not about the camp at all: polite canned decline, no LLM attempt.
    OffTopic,
    /// Schedule question naming a specific phase: detailed embed.
    ScheduleDetail(ScheduleKind),
    /// Matched intent: canned answer from the knowledge base.
    Canned(Intent),
    /// Camp-related but unmatched: LLM fallback (or the static apology).
    Fallback,
}

/// Pure decision step for the auto-reply pipeline.
pub fn plan_auto_reply(content: &str, catalog: &IntentCatalog) -> ReplyPlan {
    if !catalog.is_topic_related(content) {
        return ReplyPlan::OffTopic;
    }
    match catalog.score(content) {
        Some((Intent::Schedule, _)) => {
            let t = normalize(content);
            if t.contains("workshop") {
                ReplyPlan::ScheduleDetail(ScheduleKind::Workshop)
            } else if t.contains("launch") {
                ReplyPlan::ScheduleDetail(ScheduleKind::Launch)
            } else {
                ReplyPlan::Canned(Intent::Schedule)
            }
        }
        Some((intent, _)) => ReplyPlan::Canned(intent),
        None => ReplyPlan::Fallback,
    }
}

pub struct MessageHandler {
    app: Arc<AppContext>,
}

impl MessageHandler {
    pub fn new(app: Arc<AppContext>) -> Self {
        MessageHandler { app }
    }

    pub async fn handle_message(&self, ctx: &Context, msg: &Message) -> Result<()> {
        if msg.author.bot {
            return Ok(());
        }
        // Guild text surfaces only; DMs are out of scope.
        if msg.guild_id.is_none() {
            return Ok(());
        }

        let content = msg.content.trim().to_string();
        if let Some(rest) = content.strip_prefix(self.app.settings.prefix.as_str()) {
            let command = commands::parse(rest);
            return self.dispatch(ctx, msg, command).await;
        }

        self.auto_reply(ctx, msg, &content).await
    }

    async fn dispatch(&self, ctx: &Context, msg: &Message, command: Command) -> Result<()> {
        let prefix = &self.app.settings.prefix;
        let cfg = self.app.store.snapshot();

        // Privileged command family; non-admins are silently ignored so the
        // bot does not advertise its admin surface.
        if matches!(
            command,
            Command::ReloadConfig | Command::SaveConfig | Command::Set(_) | Command::Admin(_)
        ) && !self.app.is_admin(msg.author.id.0)
        {
            debug!("skip: {} is not an admin", msg.author.id);
            return Ok(());
        }

        info!("Processing command {command:?} from user {}", msg.author.id);

        match command {
            Command::Help => {
                msg.reply(&ctx.http, commands::help_text(prefix)).await?;
            }
            Command::Overview => {
                self.send_embed(ctx, msg, answers::overview_embed(&cfg)).await?;
            }
            Command::Price => {
                let text = format!(
                    "{}\n📆 {}",
                    answers::price(&cfg),
                    cfg.camp.schedule_summary
                );
                msg.reply(&ctx.http, answers::trunc(&text, SAFE_REPLY_LEN)).await?;
            }
            Command::Apply => {
                msg.reply(&ctx.http, answers::trunc(&answers::apply(&cfg), SAFE_REPLY_LEN))
                    .await?;
            }
            Command::Contact => {
                msg.reply(&ctx.http, answers::trunc(&answers::contact(&cfg), SAFE_REPLY_LEN))
                    .await?;
            }
            Command::Venue => {
                self.send_embed(ctx, msg, answers::venue_embed(&cfg)).await?;
            }
            Command::Schedule(Some(kind)) => {
                self.send_embed(ctx, msg, answers::schedule_embed(&cfg, kind)).await?;
            }
            Command::Schedule(None) => {
                msg.reply(
                    &ctx.http,
                    format!("ใช้: `{prefix}schedule workshop` หรือ `{prefix}schedule launch`"),
                )
                .await?;
            }
            Command::Ask(question) => {
                self.handle_ask(ctx, msg, &question).await?;
            }
            Command::ReloadConfig => {
                self.app.store.load();
                msg.reply(&ctx.http, format!("Reloaded {}", self.app.store.path().display()))
                    .await?;
            }
            Command::SaveConfig => {
                self.app.store.save();
                msg.reply(&ctx.http, format!("Saved {}", self.app.store.path().display()))
                    .await?;
            }
            Command::Set(set) => {
                let reply = admin::apply_set(&set, &self.app);
                msg.reply(&ctx.http, reply).await?;
            }
            Command::Admin(cmd) => {
                let reply = admin::apply_admin(&cmd, &self.app);
                msg.reply(&ctx.http, reply).await?;
            }
            Command::Malformed(usage) => {
                msg.reply(&ctx.http, format!("ใช้: `{prefix}{usage}`")).await?;
            }
            Command::Unknown(name) => {
                debug!("skip: unknown command '{name}'");
            }
        }

        Ok(())
    }

    /// `!ask`: knowledge base first, LLM only when nothing matched.
    async fn handle_ask(&self, ctx: &Context, msg: &Message, question: &str) -> Result<()> {
        let prefix = &self.app.settings.prefix;
        let cfg = self.app.store.snapshot();

        if let Some((intent, _)) = self.app.catalog.score(question) {
            let text = answers::answer(intent, &cfg, prefix);
            msg.reply(&ctx.http, answers::trunc(&text, SAFE_REPLY_LEN)).await?;
            return Ok(());
        }

        if !self.app.llm.is_configured() {
            msg.reply(&ctx.http, "ยังไม่ตั้งค่า Gemini ใน .env").await?;
            return Ok(());
        }

        let _ = msg.channel_id.broadcast_typing(&ctx.http).await;
        let prompt = self.app.llm.build_context(&cfg, question);
        match self.app.llm.ask(&prompt).await {
            Ok(text) => {
                msg.reply(&ctx.http, answers::trunc(&text, SAFE_REPLY_LEN)).await?;
            }
            Err(e) => {
                error!("LLM error: {e:#}");
                msg.reply(&ctx.http, "เรียก Gemini ไม่สำเร็จ").await?;
            }
        }
        Ok(())
    }

    async fn auto_reply(&self, ctx: &Context, msg: &Message, content: &str) -> Result<()> {
        let rt = self.app.runtime();
        let prefix = &self.app.settings.prefix;

        if !rt.auto_reply {
            return Ok(());
        }
        if !rt.allowed_channels.is_empty() && !rt.allowed_channels.contains(&msg.channel_id.0) {
            if rt.debug {
                debug!("skip: channel {} not allowed", msg.channel_id);
            }
            return Ok(());
        }
        if !self.app.gate.can_reply(
            msg.channel_id.0,
            msg.author.id.0,
            Duration::from_secs(rt.cooldown_secs),
            rt.max_per_min,
        ) {
            if rt.debug {
                debug!("skip: rate limit for {}:{}", msg.channel_id, msg.author.id);
            }
            return Ok(());
        }
        if rt.mode != "all" && content.is_empty() {
            return Ok(());
        }

        let _ = msg.channel_id.broadcast_typing(&ctx.http).await;
        let cfg = self.app.store.snapshot();

        match plan_auto_reply(content, &self.app.catalog) {
            ReplyPlan::OffTopic => {
                msg.reply(&ctx.http, off_topic_reply(prefix)).await?;
            }
            ReplyPlan::ScheduleDetail(kind) => {
                self.send_embed(ctx, msg, answers::schedule_embed(&cfg, kind)).await?;
            }
            ReplyPlan::Canned(intent) => {
                let text = answers::answer(intent, &cfg, prefix);
                msg.reply(&ctx.http, answers::trunc(&text, SAFE_REPLY_LEN)).await?;
            }
            ReplyPlan::Fallback => {
                if self.app.llm.is_configured() {
                    let prompt = self.app.llm.build_context(&cfg, content);
                    match self.app.llm.ask(&prompt).await {
                        Ok(text) => {
                            msg.reply(&ctx.http, answers::trunc(&text, SAFE_REPLY_LEN)).await?;
                            return Ok(());
                        }
                        Err(e) => error!("LLM error: {e:#}"),
                    }
                }
                msg.reply(&ctx.http, no_answer_reply(prefix)).await?;
            }
        }

        Ok(())
    }

    async fn send_embed(&self, ctx: &Context, msg: &Message, answer: EmbedAnswer) -> Result<()> {
        msg.channel_id
            .send_message(&ctx.http, |m| m.embed(|e| apply_embed(e, &answer)))
            .await?;
        Ok(())
    }
}

fn apply_embed<'a>(e: &'a mut CreateEmbed, answer: &EmbedAnswer) -> &'a mut CreateEmbed {
    e.title(&answer.title);
    if let Some(desc) = &answer.description {
        e.description(desc);
    }
    for (name, value) in &answer.fields {
        e.field(name, value, false);
    }
    if let Some(footer) = &answer.footer {
        e.footer(|f| f.text(footer));
    }
    e
}

fn off_topic_reply(prefix: &str) -> String {
    format!(
        "ขอบคุณครับ/ค่ะ ข้อความนี้ดูไม่น่าจะเกี่ยวกับ AC x KMUTT Rocket Camp 2025 จึงไม่มีข้อมูลในระบบ\n\
         หากต้องการข้อมูลค่าย ลองพิมพ์: `ราคา`, `สมัคร`, `ตาราง`, `สถานที่` หรือใช้คำสั่ง `{prefix}help`."
    )
}

fn no_answer_reply(prefix: &str) -> String {
    format!(
        "ขออภัย ยังไม่มีคำตอบเฉพาะสำหรับคำถามนี้ ลองพิมพ์: `ราคา`, `สมัคร`, `ตาราง`, `สถานที่` หรือ `{prefix}help`"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_off_topic_greeting() {
        let catalog = IntentCatalog::new();
        assert_eq!(plan_auto_reply("สวัสดีครับ", &catalog), ReplyPlan::OffTopic);
        assert_eq!(plan_auto_reply("", &catalog), ReplyPlan::OffTopic);
    }

    #[test]
    fn test_plan_price_question() {
        let catalog = IntentCatalog::new();
        assert_eq!(
            plan_auto_reply("ราคาค่าสมัครเท่าไหร่", &catalog),
            ReplyPlan::Canned(Intent::Price)
        );
    }

    #[test]
    fn test_plan_schedule_detail() {
        let catalog = IntentCatalog::new();
        assert_eq!(
            plan_auto_reply("ตาราง workshop มีอะไรบ้าง", &catalog),
            ReplyPlan::ScheduleDetail(ScheduleKind::Workshop)
        );
        assert_eq!(
            plan_auto_reply("กำหนดการ launch", &catalog),
            ReplyPlan::ScheduleDetail(ScheduleKind::Launch)
        );
        assert_eq!(
            plan_auto_reply("กำหนดการเป็นยังไง", &catalog),
            ReplyPlan::Canned(Intent::Schedule)
        );
    }

    #[test]
    fn test_plan_related_but_unmatched_falls_back() {
        let catalog = IntentCatalog::new();
        // Mentions the camp ("จรวด" = rocket) but matches no intent.
        assert_eq!(plan_auto_reply("จรวดบินยังไง", &catalog), ReplyPlan::Fallback);
    }

    #[test]
    fn test_reply_texts_are_bounded_and_mention_prefix() {
        for text in [off_topic_reply("!"), no_answer_reply("!")] {
            assert!(text.chars().count() <= SAFE_REPLY_LEN);
            assert!(text.contains("`!help`"));
        }
    }
}
