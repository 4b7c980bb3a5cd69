/// Where a command may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum CommandScope {
    Guild,
    Direct,
    Both,
}

impl CommandScope {
    pub fn allows(&self, in_guild: bool) -> bool {
        match self {
            CommandScope::Guild => in_guild,
            CommandScope::Direct => !in_guild,
            CommandScope::Both => true,
        }
    }
}

/// A chat message as delivered by the gateway, before command parsing.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub author_id: u64,
    pub author_name: String,
    pub author_bot: bool,
    pub channel_id: Option<u64>,
    pub guild_id: Option<u64>,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct MessageContext {
    pub author_id: u64,
    pub author_name: String,
    /// Originating channel; `None` when the gateway has no channel context.
    pub channel_id: Option<u64>,
    pub guild_id: Option<u64>,
    /// Command prefix in effect where the message arrived.
    pub prefix: String,
}

impl MessageContext {
    pub fn from_incoming(msg: &IncomingMessage, prefix: &str) -> Self {
        Self {
            author_id: msg.author_id,
            author_name: msg.author_name.clone(),
            channel_id: msg.channel_id,
            guild_id: msg.guild_id,
            prefix: prefix.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub text: String,
    pub channel_id: Option<u64>,
}

impl Response {
    /// Reply in the channel the command came from.
    pub fn reply(ctx: &MessageContext, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            channel_id: ctx.channel_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_scope_allows_guild() {
        let scope = CommandScope::Guild;
        assert!(scope.allows(true));
        assert!(!scope.allows(false));
    }

    #[test]
    fn test_command_scope_allows_direct() {
        let scope = CommandScope::Direct;
        assert!(!scope.allows(true));
        assert!(scope.allows(false));
    }

    #[test]
    fn test_command_scope_allows_both() {
        let scope = CommandScope::Both;
        assert!(scope.allows(true));
        assert!(scope.allows(false));
    }

    #[test]
    fn test_reply_targets_origin_channel() {
        let ctx = MessageContext {
            author_id: 2,
            author_name: "reimu".to_string(),
            channel_id: Some(3),
            guild_id: None,
            prefix: "~".to_string(),
        };
        assert_eq!(Response::reply(&ctx, "hi").channel_id, Some(3));
    }
}
