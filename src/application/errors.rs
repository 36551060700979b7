//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Plugin host error: {0}")]
    Host(#[from] HostError),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command parsing and dispatch errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Command not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments, usage: {0}")]
    InvalidArgs(String),

    #[error("{command} accepts at most {limit} plugin names, got {given}")]
    TooManyArgs {
        command: String,
        limit: usize,
        given: usize,
    },
}

/// Errors raised by the plugin host (discovery, mount state and the
/// mount/unmount primitives).
///
/// The message is shown to the operator verbatim, so `Display` is the bare text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("{0}")]
    Discovery(String),

    #[error("{0}")]
    Primitive(String),
}

/// Errors raised by a bot profile store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    Storage(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Why a single plugin transition did not succeed.
///
/// Each variant maps onto exactly one reply message, see
/// [`Transition::describe`](crate::domain::entities::Transition::describe).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("plugin is undefined")]
    NotFound,

    #[error("plugin has been mounted")]
    AlreadyMounted,

    #[error("plugin is not mounted")]
    NotMounted,

    #[error("{0}")]
    Collaborator(String),

    #[error("timeout")]
    Timeout,
}

impl From<HostError> for TransitionError {
    fn from(e: HostError) -> Self {
        TransitionError::Collaborator(e.to_string())
    }
}

impl From<ProfileError> for TransitionError {
    fn from(e: ProfileError) -> Self {
        TransitionError::Collaborator(e.to_string())
    }
}
