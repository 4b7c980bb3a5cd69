use std::collections::HashMap;

use async_trait::async_trait;

use crate::db::Db;
use crate::directory::Directory;
use crate::error::Result;
use crate::message::{CommandScope, MessageContext, Response};
use crate::rate_limit::RateLimitPolicy;

#[async_trait]
pub trait Module: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn commands(&self) -> &[&str];
    fn scope(&self) -> CommandScope;

    /// Built-in admission policy, shared by every alias in `commands`.
    fn rate_limit(&self) -> RateLimitPolicy;

    async fn handle_command(
        &self,
        command: &str,
        args: &str,
        ctx: &MessageContext,
        db: &Db,
        directory: &dyn Directory,
    ) -> Result<Option<Vec<Response>>>;
}

/// Registered commands plus their admission policies. Built once at startup
/// and read-only afterwards.
pub struct ModuleRegistry {
    modules: Vec<Box<dyn Module>>,
    policies: HashMap<String, RateLimitPolicy>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            policies: HashMap::new(),
        }
    }

    pub fn register_with_policy(&mut self, module: Box<dyn Module>, policy: RateLimitPolicy) {
        log::info!("Registered command: {} (rate limit {})", module.name(), policy);
        for command in module.commands() {
            self.policies.insert(command.to_string(), policy);
        }
        self.modules.push(module);
    }

    pub fn find_by_command(&self, command: &str) -> Option<&dyn Module> {
        self.modules
            .iter()
            .find(|m| m.commands().contains(&command))
            .map(|m| m.as_ref())
    }

    pub fn policy_for(&self, command: &str) -> Option<RateLimitPolicy> {
        self.policies.get(command).copied()
    }

    pub fn all(&self) -> &[Box<dyn Module>] {
        &self.modules
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
