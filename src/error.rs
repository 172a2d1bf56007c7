//! Error handling and custom error types
//!
//! Every failure the pipeline can surface maps onto one [`FailureKind`], so
//! callers can render a single message without inspecting transport detail.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Image encoding error: {0}")]
    Codec(String),

    #[error("Invalid generation request: {0}")]
    Validation(String),

    #[error("Failed to reach generation service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Generation service error (status {status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Generation service returned no usable content")]
    EmptyResponse,

    #[error("Incomplete generation result: {0}")]
    IncompleteResult(String),

    #[error("A generation is already in flight")]
    Busy,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Normalized failure classification handed to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Codec,
    Validation,
    Transport,
    Upstream,
    EmptyResponse,
    IncompleteResult,
    Busy,
    Config,
    Io,
}

impl FailureKind {
    /// Whether re-issuing the same request could succeed.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            FailureKind::Transport
                | FailureKind::Upstream
                | FailureKind::EmptyResponse
                | FailureKind::IncompleteResult
                | FailureKind::Busy
        )
    }

    /// End-user text for this kind of failure.
    pub fn user_message(self) -> &'static str {
        if self.is_retryable() {
            return "Generation failed. The model might be busy, try again!";
        }
        match self {
            FailureKind::Codec => "One of the images could not be read.",
            FailureKind::Validation => "Upload both images and pick an occasion first.",
            _ => "Something went wrong while setting up the generator.",
        }
    }
}

impl Error {
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Codec(_) => FailureKind::Codec,
            Error::Validation(_) => FailureKind::Validation,
            Error::Transport(_) => FailureKind::Transport,
            Error::Upstream { .. } => FailureKind::Upstream,
            Error::EmptyResponse => FailureKind::EmptyResponse,
            Error::IncompleteResult(_) => FailureKind::IncompleteResult,
            Error::Busy => FailureKind::Busy,
            Error::Config(_) => FailureKind::Config,
            Error::Io(_) => FailureKind::Io,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
