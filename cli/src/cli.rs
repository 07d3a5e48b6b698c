use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use twitch_core::{
    ApiVersion, RequestOptions, TwitchClient, UreqTransport, DEFAULT_API_ROOT,
};

/// Number of followers printed when `--limit` is not given.
const DEFAULT_FOLLOWERS_LIMIT: i64 = 15;

/// Simple CLI for testing Twitch API calls.
#[derive(Debug, Parser)]
#[command(name = "twitch-client", version)]
pub struct Cli {
    /// Twitch client ID to authorize requests
    #[arg(long, env = "TWITCH_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// OAuth token sent as a bearer token (required by helix endpoints)
    #[arg(long, env = "TWITCH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Scheme and host of the API
    #[arg(long, env = "TWITCH_API_ROOT", default_value = DEFAULT_API_ROOT)]
    pub api_root: String,

    /// Give up on a request after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Verbosity: -v logs requests, -vv adds headers and body sizes
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a channel's information
    Channel {
        /// Channel name or ID
        id: String,
        /// Use the helix endpoints
        #[arg(long)]
        helix: bool,
    },
    /// Print the first page of a channel's followers
    Followers {
        /// Channel ID
        id: String,
        #[arg(long, default_value_t = DEFAULT_FOLLOWERS_LIMIT)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: i64,
        /// Sort direction, `asc` or `desc`
        #[arg(long)]
        direction: Option<String>,
        /// Use the helix endpoints
        #[arg(long)]
        helix: bool,
    },
}

impl Cli {
    /// Build the client from the global flags.
    pub fn client(&self) -> Result<TwitchClient> {
        let client_id = match self.client_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => bail!("Twitch client ID was not specified"),
        };

        let transport = match self.timeout {
            Some(secs) => UreqTransport::with_timeout(Duration::from_secs(secs)),
            None => UreqTransport::new(),
        };

        let mut builder = TwitchClient::builder()
            .client_id(client_id)
            .api_root(&self.api_root)
            .transport(transport);
        if let Some(token) = &self.token {
            builder = builder.bearer_token(token.as_str());
        }
        Ok(builder.build())
    }

    pub fn run(&self) -> Result<()> {
        let client = self.client()?;
        debug!(?client, "configured client");

        match &self.command {
            Command::Channel { id, helix } => {
                let opts = RequestOptions::new().with_version(version(*helix));
                let channel = client
                    .get_channel(id, Some(&opts))
                    .with_context(|| format!("fetching channel {id}"))?;
                print_json(&channel)
            }
            Command::Followers {
                id,
                limit,
                offset,
                direction,
                helix,
            } => {
                let opts = followers_options(*limit, *offset, direction.as_deref(), *helix);
                let followers = client
                    .get_followers_for_id(id, Some(&opts))
                    .with_context(|| format!("fetching followers of {id}"))?;
                print_json(&followers)
            }
        }
    }
}

fn version(helix: bool) -> ApiVersion {
    if helix {
        ApiVersion::Helix
    } else {
        ApiVersion::Kraken
    }
}

fn followers_options(
    limit: i64,
    offset: i64,
    direction: Option<&str>,
    helix: bool,
) -> RequestOptions {
    RequestOptions::new()
        .with_limit(limit)
        .with_offset(offset)
        .with_direction(direction.unwrap_or_default())
        .with_version(version(helix))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value).context("formatting result")?;
    println!("{pretty}");
    Ok(())
}
