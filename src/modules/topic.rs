use async_trait::async_trait;

use crate::db::Db;
use crate::directory::{ChannelKind, Directory};
use crate::error::{NotFound, Result};
use crate::message::{CommandScope, MessageContext, Response};
use crate::module::Module;
use crate::rate_limit::RateLimitPolicy;
use crate::util::split_args;

use super::channel_info::resolve_channel;

pub struct TopicModule;

#[async_trait]
impl Module for TopicModule {
    fn name(&self) -> &str {
        "topic"
    }

    fn description(&self) -> &str {
        "Returns the mentioned channels' topics. If none are mentioned, the current channel is used."
    }

    fn commands(&self) -> &[&str] {
        &["topic"]
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
        let guild_id = ctx.guild_id.ok_or(NotFound::Guild)?;
        let guild = directory.guild(guild_id).ok_or(NotFound::Guild)?;

        let queries = split_args(args);
        let channel_ids = if queries.is_empty() {
            ctx.channel_id.into_iter().collect::<Vec<_>>()
        } else {
            queries
                .iter()
                .map(|q| resolve_channel(&guild, q).ok_or_else(|| NotFound::Channel(q.clone())))
                .collect::<std::result::Result<Vec<_>, _>>()?
        };

        let lines: Vec<String> = channel_ids
            .iter()
            .filter_map(|id| guild.channel(*id))
            .filter(|c| c.kind == ChannelKind::Text)
            .map(|c| format!("{}: {}", c.name, c.topic.as_deref().unwrap_or("")))
            .collect();

        let text = if lines.is_empty() {
            "No text channels to show.".to_string()
        } else {
            lines.join("\n")
        };
        Ok(Some(vec![Response::reply(ctx, text)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::fixture::{directory, LOUNGE};
    use crate::modules::test_support::{test_ctx, test_db};

    #[tokio::test]
    async fn test_topic_current_channel() {
        let (db, dir, ctx) = (test_db(), directory(), test_ctx());
        let result = TopicModule
            .handle_command("topic", "", &ctx, &db, &dir)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result[0].text, "general: welcome!");
    }

    #[tokio::test]
    async fn test_topic_multiple_channels_skips_voice() {
        let (db, dir, ctx) = (test_db(), directory(), test_ctx());
        let args = format!("<#{}> general voice", LOUNGE);
        let result = TopicModule
            .handle_command("topic", &args, &ctx, &db, &dir)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result[0].text, "lounge: off topic\ngeneral: welcome!");
    }

    #[tokio::test]
    async fn test_topic_only_voice() {
        let (db, dir, ctx) = (test_db(), directory(), test_ctx());
        let result = TopicModule
            .handle_command("topic", "voice", &ctx, &db, &dir)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result[0].text, "No text channels to show.");
    }
}
