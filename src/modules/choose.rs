use async_trait::async_trait;
use rand::seq::SliceRandom;

use crate::db::Db;
use crate::directory::Directory;
use crate::error::Result;
use crate::message::{CommandScope, MessageContext, Response};
use crate::module::Module;
use crate::rate_limit::RateLimitPolicy;
use crate::util::split_args;

pub struct ChooseModule;

impl ChooseModule {
    fn choose(args: &str) -> String {
        let choices = split_args(args);
        match choices.choose(&mut rand::thread_rng()) {
            Some(choice) => format!("I choose {}!", choice),
            None => "There is nothing to choose from!".to_string(),
        }
    }
}

#[async_trait]
impl Module for ChooseModule {
    fn name(&self) -> &str {
        "choose"
    }

    fn description(&self) -> &str {
        "Chooses between several provided choices. Separated by spaces. Quote choices with spaces in them."
    }

    fn commands(&self) -> &[&str] {
        &["choose"]
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
        Ok(Some(vec![Response::reply(ctx, Self::choose(args))]))
    }
}
