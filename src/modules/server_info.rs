use async_trait::async_trait;

use crate::db::Db;
use crate::directory::{ChannelInfo, ChannelKind, Directory, GuildInfo};
use crate::error::{NotFound, Result};
use crate::message::{CommandScope, MessageContext, Response};
use crate::module::Module;
use crate::rate_limit::RateLimitPolicy;
use crate::util::{code, format_date};

pub struct ServerInfoModule;

impl ServerInfoModule {
    fn channel_list(guild: &GuildInfo, kind: ChannelKind) -> String {
        let mut channels: Vec<&ChannelInfo> =
            guild.channels.iter().filter(|c| c.kind == kind).collect();
        channels.sort_by_key(|c| (c.position, c.id));
        channels
            .iter()
            .map(|c| code(&c.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn render(guild: &GuildInfo, owner: &str, prefix: &str) -> String {
        let mut lines = vec![
            format!("Name: {}", code(&guild.name)),
            format!("ID: {}", code(&guild.id.to_string())),
            format!("Owner: {}", code(owner)),
            format!("Created: {}", code(&format_date(&guild.created_at))),
            format!("User Count: {}", code(&guild.member_count.to_string())),
        ];

        let mut roles: Vec<_> = guild.assignable_roles().collect();
        if !roles.is_empty() {
            roles.sort_by_key(|r| (r.position, r.id));
            let names = roles
                .iter()
                .map(|r| code(&r.name))
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!("Roles: {}", names));
        }

        lines.push(format!(
            "Text Channels: {}",
            Self::channel_list(guild, ChannelKind::Text)
        ));
        lines.push(format!(
            "Voice Channels: {}",
            Self::channel_list(guild, ChannelKind::Voice)
        ));
        lines.push(format!("Bot Command Prefix: {}", prefix));

        if let Some(icon) = guild.icon_url.as_deref().filter(|u| !u.is_empty()) {
            lines.push(icon.to_string());
        }

        lines.join("\n")
    }
}

#[async_trait]
impl Module for ServerInfoModule {
    fn name(&self) -> &str {
        "serverinfo"
    }

    fn description(&self) -> &str {
        "Gets general information about the current server"
    }

    fn commands(&self) -> &[&str] {
        &["serverinfo"]
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
        _args: &str,
        ctx: &MessageContext,
        _db: &Db,
        directory: &dyn Directory,
    ) -> Result<Option<Vec<Response>>> {
        let guild_id = ctx.guild_id.ok_or(NotFound::Guild)?;
        let guild = directory.guild(guild_id).ok_or(NotFound::Guild)?;
        let owner = directory
            .member(guild_id, guild.owner_id)
            .map(|m| m.user.name)
            .unwrap_or_else(|| guild.owner_id.to_string());

        let text = Self::render(&guild, &owner, &ctx.prefix);
        Ok(Some(vec![Response::reply(ctx, text)]))
    }
}
