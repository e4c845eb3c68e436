//! Server configuration from command-line flags and environment variables.

use clap::{ArgAction, Parser};

use crate::domain::{
    ResponsePolicy,
    entity::{DEFAULT_MAX_OPTION_COUNT, DEFAULT_PARTICIPANT_CAPACITY},
};

/// Classpoll live classroom polling server
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "classpoll-server", version, about = "Classpoll live classroom polling server")]
pub struct ServerConfig {
    /// Bind address
    #[arg(long, env = "CLASSPOLL_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "CLASSPOLL_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Maximum number of students in the session
    #[arg(long, env = "CLASSPOLL_MAX_PARTICIPANTS", default_value_t = DEFAULT_PARTICIPANT_CAPACITY)]
    pub max_participants: usize,

    /// Maximum number of options per poll
    #[arg(long, env = "CLASSPOLL_MAX_OPTIONS", default_value_t = DEFAULT_MAX_OPTION_COUNT)]
    pub max_options: usize,

    /// Let students change their answer while a poll is collecting
    #[arg(
        long,
        env = "CLASSPOLL_ALLOW_VOTE_CHANGE",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub allow_vote_change: bool,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "CLASSPOLL_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn response_policy(&self) -> ResponsePolicy {
        if self.allow_vote_change {
            ResponsePolicy::Overwrite
        } else {
            ResponsePolicy::FirstOnly
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_participants: DEFAULT_PARTICIPANT_CAPACITY,
            max_options: DEFAULT_MAX_OPTION_COUNT,
            allow_vote_change: true,
            log_level: "info".to_string(),
        }
    }
}
