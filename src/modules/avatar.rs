use async_trait::async_trait;

use crate::db::Db;
use crate::directory::{Directory, UserInfo};
use crate::error::{NotFound, Result};
use crate::message::{CommandScope, MessageContext, Response};
use crate::module::Module;
use crate::rate_limit::RateLimitPolicy;
use crate::util::{code, parse_user_mention, split_args};

pub struct AvatarModule;

impl AvatarModule {
    fn resolve(
        query: &str,
        ctx: &MessageContext,
        directory: &dyn Directory,
    ) -> std::result::Result<UserInfo, NotFound> {
        let found = match ctx.guild_id {
            Some(guild_id) => directory.find_member(guild_id, query).map(|m| m.user),
            None => parse_user_mention(query).and_then(|id| directory.user(id)),
        };
        found.ok_or_else(|| NotFound::User(query.to_string()))
    }

    fn avatar_line(user: &UserInfo) -> String {
        match &user.avatar_url {
            Some(url) => url.clone(),
            None => format!("{} has no avatar", code(&user.name)),
        }
    }
}

#[async_trait]
impl Module for AvatarModule {
    fn name(&self) -> &str {
        "avatar"
    }

    fn description(&self) -> &str {
        "Gets the avatar url of the provided users. If no user is provided, your avatar is shown instead."
    }

    fn commands(&self) -> &[&str] {
        &["avatar"]
    }

    fn scope(&self) -> CommandScope {
        CommandScope::Both
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
        let queries = split_args(args);
        let users = if queries.is_empty() {
            let author = directory
                .user(ctx.author_id)
                .ok_or_else(|| NotFound::User(ctx.author_name.clone()))?;
            vec![author]
        } else {
            queries
                .iter()
                .map(|q| Self::resolve(q, ctx, directory))
                .collect::<std::result::Result<Vec<_>, _>>()?
        };

        let text = users
            .iter()
            .map(Self::avatar_line)
            .collect::<Vec<_>>()
            .join("\n");
        Ok(Some(vec![Response::reply(ctx, text)]))
    }
}
