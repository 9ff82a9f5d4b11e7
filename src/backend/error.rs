//! Backend error taxonomy and rate-limit classification.

use thiserror::Error;

/// Errors raised by a comparison backend call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend answered with a non-success HTTP status.
    #[error("backend returned HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error body or description.
        message: String,
    },

    /// The call failed before an HTTP status was available (connection,
    /// DNS, TLS, client-internal errors).
    #[error("backend transport failure: {message}")]
    Transport {
        /// Error message.
        message: String,
    },

    /// The backend answered, but the payload was not usable (empty
    /// response, unparseable score object).
    #[error("backend returned malformed output: {message}")]
    MalformedOutput {
        /// Error message.
        message: String,
    },
}

impl BackendError {
    /// Classifies this error for the retry/skip policy.
    ///
    /// Rate-limit detection is heuristic: an HTTP 429, or a message using
    /// quota/rate-limit vocabulary (providers are inconsistent about which
    /// they emit).
    pub fn class(&self) -> ErrorClass {
        if self.mentions_rate_limit() {
            return ErrorClass::RateLimited;
        }

        match self {
            Self::Http { status: 429, .. } => ErrorClass::RateLimited,
            Self::Http { status, .. } if (500..=599).contains(status) => ErrorClass::Transient,
            Self::Http { .. } => ErrorClass::Unknown,
            Self::Transport { .. } | Self::MalformedOutput { .. } => ErrorClass::Transient,
        }
    }

    /// Returns `true` if the error classifies as rate-limited.
    pub fn is_rate_limited(&self) -> bool {
        self.class() == ErrorClass::RateLimited
    }

    fn message(&self) -> &str {
        match self {
            Self::Http { message, .. }
            | Self::Transport { message }
            | Self::MalformedOutput { message } => message,
        }
    }

    fn mentions_rate_limit(&self) -> bool {
        // Whitespace-insensitive so "Too  Many Requests" and
        // "TooManyRequests" both match.
        let normalized: String = self
            .message()
            .to_ascii_lowercase()
            .split_whitespace()
            .collect();

        ["429", "toomanyrequests", "ratelimit", "quota"]
            .iter()
            .any(|needle| normalized.contains(needle))
    }
}

/// Closed classification of backend failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Worth one retry after a short backoff.
    Transient,
    /// Quota exhausted; retrying the same backend is pointless.
    RateLimited,
    /// Unrecognized failure; treated like transient by the retry ladder.
    Unknown,
}
