use crate::directory::Directory;
use crate::error::Error;
use crate::message::{IncomingMessage, MessageContext, Response};
use crate::rate_limit::ScopeKey;
use crate::util::chunk_message;

use super::*;

impl Bot {
    /// Parse, admit and run one incoming message. Returns the chunked replies;
    /// an empty list means nothing should be sent.
    pub async fn handle_message(
        &self,
        msg: &IncomingMessage,
        directory: &dyn Directory,
    ) -> Vec<Response> {
        if msg.author_bot {
            return Vec::new();
        }

        self.record_author(msg);

        let prefix = self.prefix_for(msg.guild_id);
        let (command, args) = match parse_command(&prefix, msg.content.trim()) {
            Some(parts) => parts,
            None => return Vec::new(),
        };

        let module = match self.registry.find_by_command(command) {
            Some(m) => m,
            None => return Vec::new(),
        };

        if !module.scope().allows(msg.guild_id.is_some()) {
            return Vec::new();
        }

        let policy = match self.registry.policy_for(command) {
            Some(p) => p,
            None => {
                log::error!("No rate limit registered for command {}", command);
                return Vec::new();
            }
        };

        // Admission happens exactly once, before the handler touches anything.
        let key = ScopeKey::for_invocation(msg.channel_id, msg.author_id, module.name());
        if !self
            .rate_limiter
            .try_admit(&key, &policy, self.clock.now())
            .is_admitted()
        {
            log::debug!("Rate limited: {} ({}) on {}", msg.author_name, msg.author_id, key);
            return Vec::new();
        }

        let ctx = MessageContext::from_incoming(msg, &prefix);
        let responses = match module
            .handle_command(command, args, &ctx, &self.db, directory)
            .await
        {
            Ok(Some(responses)) => responses,
            Ok(None) => return Vec::new(),
            Err(e @ (Error::NotFound(_) | Error::Pattern(_))) => {
                vec![Response::reply(&ctx, e.to_string())]
            }
            Err(e) => {
                log::error!("Command {} error: {}", module.name(), e);
                return Vec::new();
            }
        };

        self.split_responses(responses)
    }

    fn record_author(&self, msg: &IncomingMessage) {
        if let Err(e) = self.db.record_username(msg.author_id, &msg.author_name) {
            log::warn!("Failed to record username for {}: {}", msg.author_id, e);
        }
    }

    fn prefix_for(&self, guild_id: Option<u64>) -> String {
        let default = &self.config.bot.command_prefix;
        let Some(guild_id) = guild_id else {
            return default.clone();
        };
        match self.db.guild_prefix(guild_id) {
            Ok(Some(prefix)) if !prefix.is_empty() => prefix,
            Ok(_) => default.clone(),
            Err(e) => {
                log::warn!("Failed to load prefix for guild {}: {}", guild_id, e);
                default.clone()
            }
        }
    }

    fn split_responses(&self, responses: Vec<Response>) -> Vec<Response> {
        let max_len = self.config.bot.max_message_len;
        responses
            .into_iter()
            .flat_map(|response| {
                let channel_id = response.channel_id;
                chunk_message(&response.text, max_len)
                    .into_iter()
                    .filter(|text| !text.trim().is_empty())
                    .map(move |text| Response { text, channel_id })
            })
            .collect()
    }
}

pub(super) fn parse_command<'a>(prefix: &str, trimmed_text: &'a str) -> Option<(&'a str, &'a str)> {
    let rest = trimmed_text.strip_prefix(prefix)?;
    let (command, args) = match rest.split_once(char::is_whitespace) {
        Some((cmd, args)) => (cmd, args.trim()),
        None => (rest, ""),
    };
    if command.is_empty() {
        return None;
    }
    Some((command, args))
}
