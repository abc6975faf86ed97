//! Error types for the agent's outer shell (config, CLI, transport).
//!
//! Search and planning report failure as `None`/`false`, never as errors.

use thiserror::Error;

pub type AgentResult<T> = Result<T, AgentError>;

#[derive(Debug, Error)]
pub enum AgentError {
    /// I/O error (socket or config file).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// config.toml could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// The server broke the framing of a view.
    #[error("protocol error: {message}")]
    Protocol { message: String },

    #[error("invalid port {port} (expected 1025..=65535)")]
    InvalidPort { port: u32 },
}
