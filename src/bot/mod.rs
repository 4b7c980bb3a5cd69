use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::db::Db;
use crate::module::ModuleRegistry;
use crate::rate_limit::{Clock, MonotonicClock, RateLimiter};

mod command_handler;


pub struct Bot {
    config: Arc<Config>,
    db: Arc<Db>,
    registry: Arc<ModuleRegistry>,
    /// Per channel x command admission state, shared by all gateway tasks.
    rate_limiter: RateLimiter,
    clock: Arc<dyn Clock>,
}

impl Bot {
    pub fn new(config: Arc<Config>, db: Arc<Db>, registry: ModuleRegistry) -> Self {
        Self {
            config,
            db,
            registry: Arc::new(registry),
            rate_limiter: RateLimiter::new(),
            clock: Arc::new(MonotonicClock),
        }
    }

    /// Replace the time source used for admission decisions.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Evict rate-limit state for scopes idle longer than `max_idle`.
    pub fn prune_rate_limits(&self, max_idle: Duration) -> usize {
        self.rate_limiter.prune_idle(self.clock.now(), max_idle)
    }

    /// Periodically evict idle rate-limit state until the bot is dropped.
    pub fn spawn_pruner(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let bot = Arc::downgrade(self);
        let period = self.config.prune_interval();
        let max_idle = self.config.idle_evict();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(bot) = bot.upgrade() else {
                    break;
                };
                let evicted = bot.prune_rate_limits(max_idle);
                if evicted > 0 {
                    log::debug!(
                        "Evicted {} idle rate limit scope(s), {} remaining",
                        evicted,
                        bot.rate_limiter.len()
                    );
                }
            }
        })
    }
}
