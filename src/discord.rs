//! Discord gateway for the bot.
//!
//! Feeds every guild and direct message into [`Bot::handle_message`] and
//! sends back whatever it returns. Entity lookups are served from serenity's
//! in-memory cache.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serenity::all::{
    ActivityType, ChannelId, ChannelType, Context, EventHandler, GatewayIntents, Guild,
    GuildChannel, GuildId, Member, Message, Ready, User, UserId,
};
use serenity::async_trait;
use serenity::cache::Cache;
use serenity::model::Timestamp;
use serenity::Client;

use crate::bot::Bot;
use crate::directory::{ChannelInfo, ChannelKind, Directory, GuildInfo, MemberInfo, RoleInfo, UserInfo};
use crate::error::Result;
use crate::message::IncomingMessage;

fn to_datetime(ts: Timestamp) -> DateTime<Utc> {
    DateTime::from_timestamp(ts.unix_timestamp(), 0).unwrap_or_default()
}

fn guild_id(id: u64) -> Option<GuildId> {
    (id != 0).then(|| GuildId::new(id))
}

fn user_id(id: u64) -> Option<UserId> {
    (id != 0).then(|| UserId::new(id))
}

fn user_info(user: &User) -> UserInfo {
    UserInfo {
        id: user.id.get(),
        name: user.name.clone(),
        bot: user.bot,
        avatar_url: user.avatar_url(),
        created_at: to_datetime(user.id.created_at()),
    }
}

fn channel_info(channel: &GuildChannel) -> ChannelInfo {
    let kind = match channel.kind {
        ChannelType::Text | ChannelType::News => ChannelKind::Text,
        ChannelType::Voice | ChannelType::Stage => ChannelKind::Voice,
        _ => ChannelKind::Other,
    };
    ChannelInfo {
        id: channel.id.get(),
        name: channel.name.clone(),
        kind,
        topic: channel.topic.clone(),
        position: channel.position,
    }
}

fn member_info(guild: &Guild, member: &Member) -> MemberInfo {
    let game = guild.presences.get(&member.user.id).and_then(|p| {
        p.activities
            .iter()
            .find(|a| matches!(a.kind, ActivityType::Playing))
            .map(|a| a.name.clone())
    });
    MemberInfo {
        user: user_info(&member.user),
        nickname: member.nick.clone(),
        game,
        joined_at: member.joined_at.map(to_datetime),
        role_ids: member.roles.iter().map(|r| r.get()).collect(),
    }
}

fn guild_info(guild: &Guild) -> GuildInfo {
    GuildInfo {
        id: guild.id.get(),
        name: guild.name.clone(),
        owner_id: guild.owner_id.get(),
        icon_url: guild.icon_url(),
        created_at: to_datetime(guild.id.created_at()),
        member_count: guild.member_count,
        roles: guild
            .roles
            .values()
            .map(|r| RoleInfo {
                id: r.id.get(),
                name: r.name.clone(),
                position: r.position,
            })
            .collect(),
        channels: guild.channels.values().map(channel_info).collect(),
    }
}

/// [`Directory`] backed by the gateway cache. Every lookup copies what it
/// needs out of the cache so no cache guard outlives the call.
pub struct CacheDirectory {
    cache: Arc<Cache>,
}

impl CacheDirectory {
    pub fn new(cache: Arc<Cache>) -> Self {
        Self { cache }
    }
}

impl Directory for CacheDirectory {
    fn guild(&self, id: u64) -> Option<GuildInfo> {
        let guild = self.cache.guild(guild_id(id)?)?;
        Some(guild_info(&guild))
    }

    fn member(&self, guild: u64, user: u64) -> Option<MemberInfo> {
        let guild = self.cache.guild(guild_id(guild)?)?;
        let member = guild.members.get(&user_id(user)?)?;
        Some(member_info(&guild, member))
    }

    fn members(&self, guild: u64) -> Vec<MemberInfo> {
        let Some(guild) = guild_id(guild).and_then(|id| self.cache.guild(id)) else {
            return Vec::new();
        };
        guild
            .members
            .values()
            .map(|m| member_info(&guild, m))
            .collect()
    }

    fn user(&self, user: u64) -> Option<UserInfo> {
        let user = self.cache.user(user_id(user)?)?;
        Some(user_info(&user))
    }

    fn mutual_guild_count(&self, user: u64) -> usize {
        let Some(user) = user_id(user) else {
            return 0;
        };
        self.cache
            .guilds()
            .into_iter()
            .filter(|id| {
                self.cache
                    .guild(*id)
                    .is_some_and(|g| g.members.contains_key(&user))
            })
            .count()
    }
}

impl From<&Message> for IncomingMessage {
    fn from(msg: &Message) -> Self {
        Self {
            author_id: msg.author.id.get(),
            author_name: msg.author.name.clone(),
            author_bot: msg.author.bot,
            channel_id: Some(msg.channel_id.get()),
            guild_id: msg.guild_id.map(|g| g.get()),
            content: msg.content.clone(),
        }
    }
}

struct Handler {
    bot: Arc<Bot>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let incoming = IncomingMessage::from(&msg);
        let directory = CacheDirectory::new(Arc::clone(&ctx.cache));
        let responses = self.bot.handle_message(&incoming, &directory).await;

        for response in responses {
            let channel = response
                .channel_id
                .filter(|id| *id != 0)
                .map(ChannelId::new)
                .unwrap_or(msg.channel_id);
            if let Err(e) = channel.say(&ctx.http, &response.text).await {
                log::error!("Failed to send to channel {}: {}", channel, e);
            }
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        log::info!(
            "Connected to Discord as {} ({} guild(s))",
            ready.user.name,
            ready.guilds.len()
        );
    }
}

pub struct DiscordGateway {
    token: String,
    bot: Arc<Bot>,
}

impl DiscordGateway {
    pub fn new(token: String, bot: Arc<Bot>) -> Self {
        Self { token, bot }
    }

    fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::GUILD_PRESENCES
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
    }

    /// Connect and process events until the client stops.
    pub async fn run(self) -> Result<()> {
        log::info!("Starting Discord gateway");

        let handler = Handler { bot: self.bot };
        let mut client = Client::builder(&self.token, Self::intents())
            .event_handler(handler)
            .await?;

        if let Err(e) = client.start().await {
            log::error!("Discord client error: {}", e);
            return Err(e.into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_ids_are_rejected() {
        assert!(guild_id(0).is_none());
        assert!(user_id(0).is_none());
        assert_eq!(guild_id(5).map(|g| g.get()), Some(5));
    }

    #[test]
    fn test_to_datetime() {
        let ts = Timestamp::from_unix_timestamp(1_500_000_000).unwrap();
        assert_eq!(to_datetime(ts).timestamp(), 1_500_000_000);
    }

    #[test]
    fn test_intents_include_presences_and_content() {
        let intents = DiscordGateway::intents();
        assert!(intents.contains(GatewayIntents::GUILD_PRESENCES));
        assert!(intents.contains(GatewayIntents::MESSAGE_CONTENT));
        assert!(intents.contains(GatewayIntents::GUILD_MEMBERS));
    }
}
