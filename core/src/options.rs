//! Per-request query options and API generation selection.
//!
//! # Design
//! `RequestOptions` is a transient value built by the caller for one call.
//! Zero integers and empty strings mean "omit the parameter". Nothing is
//! generated on the caller's behalf: a zero nonce is simply left out.

use url::form_urlencoded;

/// Which API generation a request targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiVersion {
    /// `/kraken`, `Accept: application/vnd.twitchtv.v3+json`.
    #[default]
    Kraken,
    /// `/helix`, `Accept: application/vnd.twitchtv.v5+json`.
    Helix,
}

impl ApiVersion {
    /// Map a selector string to a version. Only `"helix"` selects the new
    /// family; anything else, including the empty string, is `Kraken`.
    pub fn from_selector(selector: &str) -> Self {
        match selector {
            "helix" => ApiVersion::Helix,
            _ => ApiVersion::Kraken,
        }
    }

    pub fn base_path(&self) -> &'static str {
        match self {
            ApiVersion::Kraken => "/kraken",
            ApiVersion::Helix => "/helix",
        }
    }

    pub fn accept_version(&self) -> u8 {
        match self {
            ApiVersion::Kraken => 3,
            ApiVersion::Helix => 5,
        }
    }

    pub fn accept_header(&self) -> String {
        format!("application/vnd.twitchtv.v{}+json", self.accept_version())
    }
}

/// Query parameters and version selection for a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub limit: i64,
    pub offset: i64,
    pub direction: String,
    /// Sent as `_`. Callers use it to defeat caches.
    pub nonce: i64,
    pub channel: String,
    pub version: ApiVersion,
    /// Extra parameters appended after the built-in ones, in order.
    pub extra: Option<Vec<(String, String)>>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = direction.into();
        self
    }

    pub fn with_nonce(mut self, nonce: i64) -> Self {
        self.nonce = nonce;
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    pub fn with_version(mut self, version: ApiVersion) -> Self {
        self.version = version;
        self
    }

    /// Append one extra parameter, creating the extra set if needed.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.into()));
        self
    }

    /// Encode the options as a query string: empty, or starting with `?`.
    ///
    /// Built-in parameters come first in the order `direction`, `limit`,
    /// `offset`, `_`, `channel`; extras follow.
    pub fn query_string(&self) -> String {
        let mut builtin = form_urlencoded::Serializer::new(String::new());
        let mut any = false;

        if !self.direction.is_empty() {
            builtin.append_pair("direction", &self.direction);
            any = true;
        }
        if self.limit != 0 {
            builtin.append_pair("limit", &self.limit.to_string());
            any = true;
        }
        if self.offset != 0 {
            builtin.append_pair("offset", &self.offset.to_string());
            any = true;
        }
        if self.nonce != 0 {
            builtin.append_pair("_", &self.nonce.to_string());
            any = true;
        }
        if !self.channel.is_empty() {
            builtin.append_pair("channel", &self.channel);
            any = true;
        }

        let mut query = String::new();
        if any {
            query.push('?');
            query.push_str(&builtin.finish());
        }

        if let Some(extra) = self.extra.as_ref().filter(|e| !e.is_empty()) {
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(extra.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .finish();
            query.push(if any { '&' } else { '?' });
            query.push_str(&encoded);
        }

        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_encode_to_nothing() {
        assert_eq!(RequestOptions::default().query_string(), "");
    }

    #[test]
    fn limit_alone() {
        let opts = RequestOptions::new().with_limit(15);
        assert_eq!(opts.query_string(), "?limit=15");
    }

    #[test]
    fn builtin_fields_follow_fixed_order() {
        let opts = RequestOptions::new()
            .with_channel("twitch")
            .with_nonce(99)
            .with_offset(30)
            .with_limit(10)
            .with_direction("desc");
        assert_eq!(
            opts.query_string(),
            "?direction=desc&limit=10&offset=30&_=99&channel=twitch"
        );
    }

    #[test]
    fn zero_nonce_is_omitted() {
        let opts = RequestOptions::new().with_offset(5).with_nonce(0);
        assert_eq!(opts.query_string(), "?offset=5");
    }

    #[test]
    fn negative_values_are_still_sent() {
        let opts = RequestOptions::new().with_limit(-1);
        assert_eq!(opts.query_string(), "?limit=-1");
    }

    #[test]
    fn extras_join_with_ampersand_after_builtins() {
        let opts = RequestOptions::new()
            .with_limit(15)
            .with_extra("cursor", "abc")
            .with_extra("login", "a b");
        assert_eq!(opts.query_string(), "?limit=15&cursor=abc&login=a+b");
    }

    #[test]
    fn extras_alone_start_the_query() {
        let opts = RequestOptions::new().with_extra("first", "1");
        assert_eq!(opts.query_string(), "?first=1");
    }

    #[test]
    fn empty_extras_contribute_nothing() {
        let opts = RequestOptions {
            extra: Some(Vec::new()),
            ..RequestOptions::default()
        };
        assert_eq!(opts.query_string(), "");
    }

    #[test]
    fn values_are_form_encoded() {
        let opts = RequestOptions::new().with_channel("a&b=c");
        assert_eq!(opts.query_string(), "?channel=a%26b%3Dc");
    }

    #[test]
    fn repeated_extra_keys_are_kept() {
        let opts = RequestOptions::new()
            .with_extra("id", "1")
            .with_extra("id", "2");
        assert_eq!(opts.query_string(), "?id=1&id=2");
    }

    #[test]
    fn selector_maps_only_helix_to_new_family() {
        assert_eq!(ApiVersion::from_selector("helix"), ApiVersion::Helix);
        assert_eq!(ApiVersion::from_selector(""), ApiVersion::Kraken);
        assert_eq!(ApiVersion::from_selector("Helix"), ApiVersion::Kraken);
        assert_eq!(ApiVersion::from_selector("kraken"), ApiVersion::Kraken);
    }

    #[test]
    fn versions_pick_path_and_accept() {
        assert_eq!(ApiVersion::Kraken.base_path(), "/kraken");
        assert_eq!(
            ApiVersion::Kraken.accept_header(),
            "application/vnd.twitchtv.v3+json"
        );
        assert_eq!(ApiVersion::Helix.base_path(), "/helix");
        assert_eq!(
            ApiVersion::Helix.accept_header(),
            "application/vnd.twitchtv.v5+json"
        );
    }
}
