use async_trait::async_trait;

use crate::db::Db;
use crate::directory::Directory;
use crate::error::Result;
use crate::message::{CommandScope, MessageContext, Response};
use crate::module::Module;
use crate::rate_limit::RateLimitPolicy;

/// One help line: the command aliases and what they do.
pub struct HelpEntry {
    pub commands: Vec<String>,
    pub description: String,
}

impl HelpEntry {
    pub fn for_module(module: &dyn Module) -> Self {
        Self {
            commands: module.commands().iter().map(|c| c.to_string()).collect(),
            description: module.description().to_string(),
        }
    }
}

/// Lists the commands registered before it, plus itself.
pub struct HelpModule {
    entries: Vec<HelpEntry>,
}

impl HelpModule {
    pub fn new(mut entries: Vec<HelpEntry>) -> Self {
        entries.push(HelpEntry {
            commands: vec!["help".to_string()],
            description: "List commands".to_string(),
        });
        Self { entries }
    }

    fn render(&self, prefix: &str) -> String {
        let lines: Vec<String> = self
            .entries
            .iter()
            .filter(|e| !e.commands.is_empty())
            .map(|e| {
                let cmds = e
                    .commands
                    .iter()
                    .map(|c| format!("`{}{}`", prefix, c))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{} - {}", cmds, e.description)
            })
            .collect();
        lines.join("\n")
    }
}

#[async_trait]
impl Module for HelpModule {
    fn name(&self) -> &str {
        "help"
    }

    fn description(&self) -> &str {
        "List commands"
    }

    fn commands(&self) -> &[&str] {
        &["help"]
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
        Ok(Some(vec![Response::reply(ctx, self.render(&ctx.prefix))]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::echo::EchoModule;
    use crate::modules::invite::InviteModule;

    #[test]
    fn test_help_lists_entries_with_prefix() {
        let help = HelpModule::new(vec![
            HelpEntry::for_module(&EchoModule),
            HelpEntry::for_module(&InviteModule::new(String::new())),
        ]);
        assert_eq!(
            help.render("~"),
            "`~echo` - Has the bot repeat what you say\n\
             `~invite` - Provides an invite link to add this bot to your server\n\
             `~help` - List commands"
        );
    }

    #[test]
    fn test_help_alone() {
        let help = HelpModule::new(Vec::new());
        assert_eq!(help.render("!"), "`!help` - List commands");
    }
}
