use async_trait::async_trait;

use crate::db::Db;
use crate::directory::Directory;
use crate::error::Result;
use crate::message::{CommandScope, MessageContext, Response};
use crate::module::Module;
use crate::rate_limit::RateLimitPolicy;

pub struct EchoModule;

#[async_trait]
impl Module for EchoModule {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Has the bot repeat what you say"
    }

    fn commands(&self) -> &[&str] {
        &["echo"]
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
        _directory: &dyn Directory,
    ) -> Result<Option<Vec<Response>>> {
        let text = if args.is_empty() {
            "Please provide text to echo!"
        } else {
            args
        };
        Ok(Some(vec![Response::reply(ctx, text)]))
    }
}
