use thiserror::Error as ErrorTrait;

/// The sum type of all errors the bot can produce.
#[derive(ErrorTrait, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),
    #[error("Invalid rate limit for {command}: {source}")]
    Policy {
        command: String,
        #[source]
        source: PolicyError,
    },
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Not found: {0}")]
    NotFound(#[from] NotFound),
}

#[derive(ErrorTrait, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyError {
    #[error("burst must be at least 1")]
    ZeroBurst,
    #[error("interval must be greater than zero")]
    ZeroInterval,
    #[error("interval is too large")]
    IntervalOutOfRange,
}

/// A command argument that could not be resolved against the directory.
#[derive(ErrorTrait, Debug, Clone, PartialEq, Eq)]
pub enum NotFound {
    #[error("no guild for this message")]
    Guild,
    #[error("no user matching `{0}`")]
    User(String),
    #[error("no channel matching `{0}`")]
    Channel(String),
}

pub type Result<T> = std::result::Result<T, Error>;
