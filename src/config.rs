use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, PolicyError, Result};
use crate::rate_limit::RateLimitPolicy;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub discord: DiscordConfig,
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub commands: HashMap<String, CommandConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DiscordConfig {
    pub token: String,
    #[serde(default)]
    pub client_id: u64,
    #[serde(default = "default_invite_permissions")]
    pub invite_permissions: u64,
}

fn default_invite_permissions() -> u64 {
    0xFFFF_FFFF_FFFF
}

#[derive(Debug, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,
    #[serde(default = "default_prune_interval")]
    pub prune_interval_secs: u64,
    #[serde(default = "default_idle_evict")]
    pub idle_evict_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            command_prefix: default_command_prefix(),
            max_message_len: default_max_message_len(),
            prune_interval_secs: default_prune_interval(),
            idle_evict_secs: default_idle_evict(),
        }
    }
}

fn default_db_path() -> String {
    "standard-bot.db".to_string()
}

fn default_command_prefix() -> String {
    "~".to_string()
}

fn default_max_message_len() -> usize {
    2000
}

fn default_prune_interval() -> u64 {
    300
}

fn default_idle_evict() -> u64 {
    3600
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CommandConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub burst: Option<u32>,
    pub interval_secs: Option<f64>,
}

fn default_enabled() -> bool {
    true
}

impl CommandConfig {
    /// Apply the configured overrides on top of a command's built-in policy.
    pub fn policy(&self, default: RateLimitPolicy) -> std::result::Result<RateLimitPolicy, PolicyError> {
        let burst = self.burst.unwrap_or(default.burst());
        let interval = match self.interval_secs {
            Some(secs) if secs.is_nan() || secs <= 0.0 => return Err(PolicyError::ZeroInterval),
            Some(secs) => {
                Duration::try_from_secs_f64(secs).map_err(|_| PolicyError::IntervalOutOfRange)?
            }
            None => default.interval(),
        };
        RateLimitPolicy::new(burst, interval)
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(Error::Config)?;
        Ok(config)
    }

    pub fn is_command_enabled(&self, name: &str) -> bool {
        self.commands.get(name).map(|c| c.enabled).unwrap_or(true)
    }

    /// Resolve the effective policy for a command, failing on invalid overrides.
    pub fn command_policy(&self, name: &str, default: RateLimitPolicy) -> Result<RateLimitPolicy> {
        match self.commands.get(name) {
            Some(cmd) => cmd.policy(default).map_err(|source| Error::Policy {
                command: name.to_string(),
                source,
            }),
            None => Ok(default),
        }
    }

    pub fn invite_url(&self) -> String {
        format!(
            "https://discordapp.com/oauth2/authorize?client_id={}&scope=bot&permissions={:#X}",
            self.discord.client_id, self.discord.invite_permissions
        )
    }

    pub fn prune_interval(&self) -> Duration {
        Duration::from_secs(self.bot.prune_interval_secs.max(1))
    }

    pub fn idle_evict(&self) -> Duration {
        Duration::from_secs(self.bot.idle_evict_secs)
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        discord: DiscordConfig {
            token: "token".to_string(),
            client_id: 208460637368614913,
            invite_permissions: default_invite_permissions(),
        },
        bot: BotConfig {
            db_path: ":memory:".to_string(),
            ..BotConfig::default()
        },
        commands: HashMap::new(),
    }
}
