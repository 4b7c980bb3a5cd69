use async_trait::async_trait;

use crate::db::Db;
use crate::directory::{Directory, GuildInfo};
use crate::error::{NotFound, Result};
use crate::message::{CommandScope, MessageContext, Response};
use crate::module::Module;
use crate::rate_limit::RateLimitPolicy;
use crate::util::{code, parse_channel_mention};

pub struct ChannelInfoModule;

/// Resolve a channel argument by mention, id, or name within a guild.
pub(super) fn resolve_channel(guild: &GuildInfo, query: &str) -> Option<u64> {
    match parse_channel_mention(query) {
        Some(id) => guild.channel(id).map(|c| c.id),
        None => guild
            .channel_named(query.trim().trim_start_matches('#'))
            .map(|c| c.id),
    }
}

#[async_trait]
impl Module for ChannelInfoModule {
    fn name(&self) -> &str {
        "channelinfo"
    }

    fn description(&self) -> &str {
        "Gets information on a specified channel"
    }

    fn commands(&self) -> &[&str] {
        &["channelinfo"]
    }

    fn scope(&self) -> CommandScope {
        CommandScope::Guild
    }

    fn rate_limit(&self) -> RateLimitPolicy {
        RateLimitPolicy::per_secs(3, 1)
    }

    async fn handle_command(
        &self,
        _command: &str,
        args: &str,
        ctx: &MessageContext,
        _db: &Db,
        directory: &dyn Directory,
    ) -> Result<Option<Vec<Response>>> {
        let channel_id = if args.is_empty() {
            ctx.channel_id
                .ok_or_else(|| NotFound::Channel("this channel".to_string()))?
        } else {
            let guild_id = ctx.guild_id.ok_or(NotFound::Guild)?;
            let guild = directory.guild(guild_id).ok_or(NotFound::Guild)?;
            resolve_channel(&guild, args).ok_or_else(|| NotFound::Channel(args.to_string()))?
        };

        let text = format!("ID: {}", code(&channel_id.to_string()));
        Ok(Some(vec![Response::reply(ctx, text)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::fixture::{directory, GENERAL, GUILD, LOUNGE};
    use crate::error::Error;
    use crate::modules::test_support::{test_ctx, test_db};

    #[test]
    fn test_resolve_channel() {
        let guild = directory().guild(GUILD).unwrap();
        assert_eq!(resolve_channel(&guild, &format!("<#{}>", LOUNGE)), Some(LOUNGE));
        assert_eq!(resolve_channel(&guild, &LOUNGE.to_string()), Some(LOUNGE));
        assert_eq!(resolve_channel(&guild, "#General"), Some(GENERAL));
        assert_eq!(resolve_channel(&guild, "<#1>"), None);
        assert_eq!(resolve_channel(&guild, "nowhere"), None);
    }

    #[tokio::test]
    async fn test_channelinfo_current_channel() {
        let (db, dir, ctx) = (test_db(), directory(), test_ctx());
        let result = ChannelInfoModule
            .handle_command("channelinfo", "", &ctx, &db, &dir)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result[0].text, format!("ID: `{}`", GENERAL));
    }

    #[tokio::test]
    async fn test_channelinfo_mentioned_channel() {
        let (db, dir, ctx) = (test_db(), directory(), test_ctx());
        let result = ChannelInfoModule
            .handle_command("channelinfo", "lounge", &ctx, &db, &dir)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result[0].text, format!("ID: `{}`", LOUNGE));
    }

    #[tokio::test]
    async fn test_channelinfo_unknown_channel() {
        let (db, dir, ctx) = (test_db(), directory(), test_ctx());
        let err = ChannelInfoModule
            .handle_command("channelinfo", "nowhere", &ctx, &db, &dir)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(NotFound::Channel(_))));
    }
}
