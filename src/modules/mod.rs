mod avatar;
mod channel_info;
mod choose;
mod echo;
mod help;
mod invite;
mod playing;
mod server_info;
mod topic;
mod whois;

use crate::config::Config;
use crate::error::Result;
use crate::module::{Module, ModuleRegistry};

use help::{HelpEntry, HelpModule};

/// Register every enabled command, resolving each policy against the config.
/// An invalid override aborts startup here rather than at call time.
pub fn build_registry(config: &Config) -> Result<ModuleRegistry> {
    let commands: Vec<Box<dyn Module>> = vec![
        Box::new(echo::EchoModule),
        Box::new(choose::ChooseModule),
        Box::new(avatar::AvatarModule),
        Box::new(invite::InviteModule::new(config.invite_url())),
        Box::new(playing::PlayingModule),
        Box::new(server_info::ServerInfoModule),
        Box::new(channel_info::ChannelInfoModule),
        Box::new(whois::WhoisModule),
        Box::new(topic::TopicModule),
    ];

    let mut registry = ModuleRegistry::new();
    let mut help_entries = Vec::new();

    for module in commands {
        register(&mut registry, config, module, &mut help_entries)?;
    }

    if config.is_command_enabled("help") {
        let help = HelpModule::new(help_entries);
        let policy = config.command_policy(help.name(), help.rate_limit())?;
        registry.register_with_policy(Box::new(help), policy);
    }

    Ok(registry)
}

fn register(
    registry: &mut ModuleRegistry,
    config: &Config,
    module: Box<dyn Module>,
    help_entries: &mut Vec<HelpEntry>,
) -> Result<()> {
    if !config.is_command_enabled(module.name()) {
        log::info!("Command disabled by config: {}", module.name());
        return Ok(());
    }
    let policy = config.command_policy(module.name(), module.rate_limit())?;
    help_entries.push(HelpEntry::for_module(module.as_ref()));
    registry.register_with_policy(module, policy);
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;

    use crate::db::Db;
    use crate::directory::fixture::{GENERAL, GUILD};
    use crate::message::MessageContext;

    pub fn test_db() -> Db {
        Db::open(Path::new(":memory:")).unwrap()
    }

    /// `reimu` (the guild owner) speaking in #general.
    pub fn test_ctx() -> MessageContext {
        MessageContext {
            author_id: 1,
            author_name: "reimu".to_string(),
            channel_id: Some(GENERAL),
            guild_id: Some(GUILD),
            prefix: "~".to_string(),
        }
    }
}
