//! Blocking client core for the Twitch REST API.
//!
//! # Overview
//! Builds versioned, authenticated GET requests from `RequestOptions`, sends
//! each one exactly once through a pluggable `Transport`, and decodes the JSON
//! body into a caller-chosen type.
//!
//! # Design
//! - `TwitchClient` is configured once via `ClientBuilder` and never mutated,
//!   so sharing it is safe whenever its transport is.
//! - Request building is pure (`build_request`) and response handling is a
//!   separate step (`parse_response`); only `get` touches the network.
//! - Two API generations: `ApiVersion::Kraken` (`/kraken`, v3) is the default,
//!   `ApiVersion::Helix` (`/helix`, v5) is opt-in per request.
//! - No retries, no paging, no token refresh. Deadlines belong to the
//!   transport (`UreqTransport::with_timeout`).

pub mod client;
pub mod error;
pub mod http;
pub mod options;
pub mod types;

pub use client::{ClientBuilder, TwitchClient, DEFAULT_API_ROOT};
pub use error::ApiError;
pub use http::{HttpRequest, HttpResponse, Transport, UreqTransport};
pub use options::{ApiVersion, RequestOptions};
pub use types::{Channel, Follow, Followers, TwitchId, User};
