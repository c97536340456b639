//! Error types for the DDNS updater
//!
//! This module defines all error types used throughout the workspace.
//!
//! Three families matter to the run:
//! - [`Error::Network`]: an endpoint could not be reached or answered with a
//!   transport-level failure.
//! - [`Error::Provider`]: the provider answered, but reported a logical failure
//!   (`success: false`, unexpected shape). Carries the raw payload when one was
//!   returned.
//! - [`Error::Cache`]: the local IP cache could not be read or written.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS updater
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure reaching an HTTP endpoint
    #[error("Network error: {0}")]
    Network(String),

    /// The IP echo service answered with something that is not an IPv4 address
    #[error("IP source error: {0}")]
    IpSource(String),

    /// Provider reachable but returned a logical failure
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
        /// Raw response body, if the provider sent one
        payload: Option<serde_json::Value>,
    },

    /// IP cache read/write failure
    #[error("Cache error at {}: {source}", path.display())]
    Cache {
        /// Cache file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an IP source error
    pub fn ip_source(msg: impl Into<String>) -> Self {
        Self::IpSource(msg.into())
    }

    /// Create a provider error without a payload
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            payload: None,
        }
    }

    /// Create a provider error carrying the raw response body
    pub fn provider_payload(
        provider: impl Into<String>,
        message: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            payload: Some(payload),
        }
    }

    /// Create a cache error
    pub fn cache(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Cache {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the provider was reached and refused the request.
    ///
    /// The reconciler reports these as a failed record and moves on; every
    /// other error aborts the zone being processed.
    pub fn is_provider_rejection(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }

    /// Human-readable detail for a provider rejection: the raw payload when
    /// present, the message otherwise.
    pub fn detail(&self) -> String {
        match self {
            Self::Provider {
                payload: Some(payload),
                ..
            } => payload.to_string(),
            Self::Provider { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
