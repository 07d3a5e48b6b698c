//! Error types for the Twitch API client.
//!
//! # Design
//! Three failure kinds, none of which is retried. Transport failures keep the
//! underlying `io::Error` so callers can inspect its kind. Any non-200 response
//! collapses into `UnexpectedStatus` with the numeric code; the body of such a
//! response is never read. Decode failures keep the `serde_json` error as the
//! source.

use std::io;

use thiserror::Error;

/// Errors returned by `TwitchClient` requests.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent, or the response body could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    /// The server answered with something other than `200 OK`.
    #[error("request failed with status: {status}")]
    UnexpectedStatus { status: u16 },

    /// The body was read but is not JSON of the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status carried by `UnexpectedStatus`, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::UnexpectedStatus { status } => Some(*status),
            _ => None,
        }
    }
}
