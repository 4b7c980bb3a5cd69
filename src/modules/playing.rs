use async_trait::async_trait;
use regex::RegexBuilder;

use crate::db::Db;
use crate::directory::{Directory, MemberInfo};
use crate::error::{NotFound, Result};
use crate::message::{CommandScope, MessageContext, Response};
use crate::module::Module;
use crate::rate_limit::RateLimitPolicy;
use crate::util::bold;

pub struct PlayingModule;

impl PlayingModule {
    /// Group matching members by game, keeping the order games are first seen.
    fn group_players(members: &[MemberInfo], pattern: &str) -> Result<Vec<(String, Vec<String>)>> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        let mut groups: Vec<(String, Vec<String>)> = Vec::new();

        for member in members {
            let Some(game) = member.game.as_deref() else {
                continue;
            };
            if !regex.is_match(game) {
                continue;
            }
            match groups.iter_mut().find(|(name, _)| name == game) {
                Some((_, users)) => users.push(member.user.name.clone()),
                None => groups.push((game.to_string(), vec![member.user.name.clone()])),
            }
        }

        Ok(groups)
    }
}

#[async_trait]
impl Module for PlayingModule {
    fn name(&self) -> &str {
        "playing"
    }

    fn description(&self) -> &str {
        "Gets all users currently playing a certain game."
    }

    fn commands(&self) -> &[&str] {
        &["playing"]
    }

    fn scope(&self) -> CommandScope {
        CommandScope::Guild
    }

    fn rate_limit(&self) -> RateLimitPolicy {
        RateLimitPolicy::per_secs(1, 1)
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
        let members = directory.members(guild_id);
        let groups = Self::group_players(&members, args)?;

        let text = if groups.is_empty() {
            "No results.".to_string()
        } else {
            groups
                .iter()
                .map(|(game, users)| format!("{}: {}", bold(game), users.join(", ")))
                .collect::<Vec<_>>()
                .join("\n")
        };
        Ok(Some(vec![Response::reply(ctx, text)]))
    }
}
