use async_trait::async_trait;

use crate::db::{Db, Username};
use crate::directory::{Directory, GuildInfo, MemberInfo};
use crate::error::{NotFound, Result};
use crate::message::{CommandScope, MessageContext, Response};
use crate::module::Module;
use crate::rate_limit::RateLimitPolicy;
use crate::util::{code, format_date};

const USERNAME_COLUMN: usize = 80;

pub struct WhoisModule;

impl WhoisModule {
    fn render(
        member: &MemberInfo,
        guild: &GuildInfo,
        mutual_guilds: usize,
        history: &[Username],
    ) -> String {
        let user = &member.user;
        let na = code("N/A");

        let mut username = format!("Username: {}", code(&user.name));
        if user.bot {
            username.push(' ');
            username.push_str(&code("(BOT)"));
        }

        let mut lines = vec![
            username,
            format!(
                "Nickname: {}",
                member
                    .nickname
                    .as_deref()
                    .filter(|n| !n.is_empty())
                    .map(code)
                    .unwrap_or_else(|| na.clone())
            ),
            format!(
                "Current Game: {}",
                member.game.as_deref().map(code).unwrap_or_else(|| na.clone())
            ),
            format!("ID: {}", code(&user.id.to_string())),
            format!(
                "Joined on: {}",
                member
                    .joined_at
                    .map(|d| code(&format_date(&d)))
                    .unwrap_or_else(|| na.clone())
            ),
            format!("Created on: {}", code(&format_date(&user.created_at))),
        ];

        if mutual_guilds > 1 {
            lines.push(format!("Seen on **{}** other servers.", mutual_guilds - 1));
        }

        let roles = guild.role_names(&member.role_ids);
        if !roles.is_empty() {
            let roles = roles.iter().map(|r| code(r)).collect::<Vec<_>>().join(", ");
            lines.push(format!("Roles: {}", roles));
        }

        if let Some(avatar) = user.avatar_url.as_deref().filter(|u| !u.is_empty()) {
            lines.push(avatar.to_string());
        }

        let previous: Vec<&Username> = history.iter().filter(|u| u.name != user.name).collect();
        if !previous.is_empty() {
            lines.push("```".to_string());
            for old in previous {
                lines.push(format!(
                    "{:<width$}{}",
                    old.name,
                    old.date.format("%Y-%m-%d"),
                    width = USERNAME_COLUMN
                ));
            }
            lines.push("```".to_string());
        }

        lines.join("\n")
    }
}

#[async_trait]
impl Module for WhoisModule {
    fn name(&self) -> &str {
        "whois"
    }

    fn description(&self) -> &str {
        "Gets information on a specified user"
    }

    fn commands(&self) -> &[&str] {
        &["whois"]
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
        db: &Db,
        directory: &dyn Directory,
    ) -> Result<Option<Vec<Response>>> {
        let guild_id = ctx.guild_id.ok_or(NotFound::Guild)?;
        let guild = directory.guild(guild_id).ok_or(NotFound::Guild)?;
        let member = if args.is_empty() {
            directory.member(guild_id, ctx.author_id)
        } else {
            directory.find_member(guild_id, args)
        };
        let member = member.ok_or_else(|| NotFound::User(args.to_string()))?;

        let mutual_guilds = directory.mutual_guild_count(member.user.id);
        let history = db.usernames(member.user.id)?;

        let text = Self::render(&member, &guild, mutual_guilds, &history);
        Ok(Some(vec![Response::reply(ctx, text)]))
    }
}
