use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpListener;
use tracing::debug;

/// Channel id that answers 200 with a body that is not JSON.
pub const GARBLED_CHANNEL: &str = "garbled";

const DEFAULT_FOLLOWS_LIMIT: usize = 25;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Channel {
    #[serde(rename = "_id")]
    pub id: Value,
    pub name: String,
    pub display_name: String,
    pub status: String,
    pub game: String,
    pub followers: u64,
    pub views: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Value,
    pub name: String,
    pub display_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Follow {
    pub created_at: String,
    pub notifications: bool,
    pub user: User,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Followers {
    #[serde(rename = "_total")]
    pub total: usize,
    pub follows: Vec<Follow>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub status: u16,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct FollowsQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub direction: Option<String>,
}

/// The two API generations, each with its own `Accept` version.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Family {
    Kraken,
    Helix,
}

impl Family {
    fn parse(segment: &str) -> Option<Self> {
        match segment {
            "kraken" => Some(Family::Kraken),
            "helix" => Some(Family::Helix),
            _ => None,
        }
    }

    fn accept(&self) -> &'static str {
        match self {
            Family::Kraken => "application/vnd.twitchtv.v3+json",
            Family::Helix => "application/vnd.twitchtv.v5+json",
        }
    }

    /// v3 payloads carry numeric ids, v5 payloads carry strings.
    fn id(&self, id: u64) -> Value {
        match self {
            Family::Kraken => Value::from(id),
            Family::Helix => Value::from(id.to_string()),
        }
    }
}

struct StoredChannel {
    id: u64,
    name: &'static str,
    display_name: &'static str,
    status: &'static str,
    game: &'static str,
    views: u64,
    /// Newest first.
    followers: Vec<(u64, &'static str, &'static str)>,
}

pub struct Directory {
    channels: Vec<StoredChannel>,
}

impl Directory {
    fn seeded() -> Self {
        Self {
            channels: vec![StoredChannel {
                id: 42,
                name: "twitch",
                display_name: "Twitch",
                status: "Twitch Weekly",
                game: "Just Chatting",
                views: 1_000,
                followers: vec![
                    (101, "zed", "2017-03-04T10:00:00Z"),
                    (102, "yara", "2017-03-03T10:00:00Z"),
                    (103, "xavier", "2017-03-02T10:00:00Z"),
                    (104, "wren", "2017-03-01T10:00:00Z"),
                    (105, "violet", "2017-02-28T10:00:00Z"),
                ],
            }],
        }
    }

    fn find(&self, key: &str) -> Option<&StoredChannel> {
        self.channels
            .iter()
            .find(|c| c.name == key || c.id.to_string() == key)
    }
}

pub type Db = Arc<Directory>;

pub fn app() -> Router {
    let db: Db = Arc::new(Directory::seeded());
    Router::new()
        .route("/{family}/channels/{id}", get(get_channel))
        .route("/{family}/channels/{id}/follows", get(get_follows))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn error(status: StatusCode, message: &str) -> Response {
    let body = ErrorBody {
        error: status.canonical_reason().unwrap_or("Error").to_string(),
        status: status.as_u16(),
        message: message.to_string(),
    };
    (status, Json(body)).into_response()
}

/// Resolve the family and enforce the headers the real service insists on.
fn authorize(family: &str, headers: &HeaderMap) -> Result<Family, Response> {
    let family =
        Family::parse(family).ok_or_else(|| error(StatusCode::NOT_FOUND, "unknown API"))?;

    let client_id = headers.get("client-id").and_then(|v| v.to_str().ok());
    if client_id.map_or(true, str::is_empty) {
        return Err(error(StatusCode::BAD_REQUEST, "No client id specified"));
    }

    let accept = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok());
    if accept != Some(family.accept()) {
        return Err(error(StatusCode::BAD_REQUEST, "Unsupported API version"));
    }

    if family == Family::Helix {
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        if bearer.map_or(true, str::is_empty) {
            return Err(error(StatusCode::UNAUTHORIZED, "OAuth token is missing"));
        }
    }

    Ok(family)
}

fn garbled() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        r#"{"name": "garbled", "#,
    )
        .into_response()
}

async fn get_channel(
    State(db): State<Db>,
    Path((family, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let family = match authorize(&family, &headers) {
        Ok(family) => family,
        Err(response) => return response,
    };
    debug!(?family, %id, "channel lookup");

    if id == GARBLED_CHANNEL {
        return garbled();
    }

    let Some(stored) = db.find(&id) else {
        return error(StatusCode::NOT_FOUND, &format!("Channel '{id}' does not exist"));
    };

    Json(Channel {
        id: family.id(stored.id),
        name: stored.name.to_string(),
        display_name: stored.display_name.to_string(),
        status: stored.status.to_string(),
        game: stored.game.to_string(),
        followers: stored.followers.len() as u64,
        views: stored.views,
    })
    .into_response()
}

async fn get_follows(
    State(db): State<Db>,
    Path((family, id)): Path<(String, String)>,
    Query(query): Query<FollowsQuery>,
    headers: HeaderMap,
) -> Response {
    let family = match authorize(&family, &headers) {
        Ok(family) => family,
        Err(response) => return response,
    };
    debug!(?family, %id, ?query, "follows lookup");

    if id == GARBLED_CHANNEL {
        return garbled();
    }

    let Some(stored) = db.find(&id) else {
        return error(StatusCode::NOT_FOUND, &format!("Channel '{id}' does not exist"));
    };

    let mut follows: Vec<Follow> = stored
        .followers
        .iter()
        .map(|&(user_id, name, created_at)| Follow {
            created_at: created_at.to_string(),
            notifications: false,
            user: User {
                id: family.id(user_id),
                name: name.to_string(),
                display_name: name.to_string(),
            },
        })
        .collect();
    if query.direction.as_deref() == Some("asc") {
        follows.reverse();
    }

    let page = follows
        .into_iter()
        .skip(query.offset.unwrap_or(0))
        .take(query.limit.unwrap_or(DEFAULT_FOLLOWS_LIMIT))
        .collect();

    Json(Followers {
        total: stored.followers.len(),
        follows: page,
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kraken_ids_are_numeric_and_helix_ids_are_strings() {
        assert_eq!(Family::Kraken.id(42), Value::from(42));
        assert_eq!(Family::Helix.id(42), Value::from("42"));
    }

    #[test]
    fn directory_finds_by_name_or_id() {
        let dir = Directory::seeded();
        assert_eq!(dir.find("twitch").map(|c| c.id), Some(42));
        assert_eq!(dir.find("42").map(|c| c.name), Some("twitch"));
        assert!(dir.find("nobody").is_none());
    }

    #[test]
    fn unknown_family_is_rejected() {
        let err = authorize("v7", &HeaderMap::new()).unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn helix_requires_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert("client-id", "abc".parse().unwrap());
        headers.insert(header::ACCEPT, Family::Helix.accept().parse().unwrap());
        let err = authorize("helix", &headers).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        headers.insert(header::AUTHORIZATION, "Bearer tok".parse().unwrap());
        assert_eq!(authorize("helix", &headers).unwrap(), Family::Helix);
    }
}
