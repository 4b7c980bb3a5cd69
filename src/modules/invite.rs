use async_trait::async_trait;

use crate::db::Db;
use crate::directory::Directory;
use crate::error::Result;
use crate::message::{CommandScope, MessageContext, Response};
use crate::module::Module;
use crate::rate_limit::RateLimitPolicy;

pub struct InviteModule {
    url: String,
}

impl InviteModule {
    pub fn new(url: String) -> Self {
        Self { url }
    }
}

#[async_trait]
impl Module for InviteModule {
    fn name(&self) -> &str {
        "invite"
    }

    fn description(&self) -> &str {
        "Provides an invite link to add this bot to your server"
    }

    fn commands(&self) -> &[&str] {
        &["invite"]
    }

    fn scope(&self) -> CommandScope {
        CommandScope::Both
    }

    fn rate_limit(&self) -> RateLimitPolicy {
        RateLimitPolicy::per_secs(1, 1)
    }

    async fn handle_command(
        &self,
        _command: &str,
        _args: &str,
        ctx: &MessageContext,
        _db: &Db,
        _directory: &dyn Directory,
    ) -> Result<Option<Vec<Response>>> {
        let text = format!("Use this link to add me to your server: {}", self.url);
        Ok(Some(vec![Response::reply(ctx, text)]))
    }
}
