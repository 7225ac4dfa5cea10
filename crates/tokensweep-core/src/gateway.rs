//! Remote membership and recurring-collection services.
//!
//! The three calls report outcomes on two levels. Transport problems (the
//! request never completed, or the body could not be decoded) are
//! `Err(GatewayError)`. A completed request with a non-success status is a
//! normal value: an empty search, [`Fetch::NotFound`] or [`Disable::Refused`].

use async_trait::async_trait;
use reqwest::{header, Url};
use serde::Serialize;

use crate::collection::RecurringCollection;
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::membership::Membership;

pub const SEARCH_PATH: [&str; 4] = ["membership", "search", "v1", "memberships"];
pub const COLLECTIONS_PATH: [&str; 2] = ["recurring-collection", "recurring-collections"];

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of fetching a single record that may legitimately be missing.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch<T> {
    Found(T),
    NotFound { status: u16 },
}

/// Result of asking the collection service to remove one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disable {
    Disabled,
    Refused { status: u16 },
}

// ---------------------------------------------------------------------------
// Gateway trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Gateway: Send + Sync {
    /// Search memberships by email, prime status and brand. No match is an
    /// empty vec.
    async fn find_memberships(
        &self,
        email: &str,
        prime_status: &str,
        brand: &str,
    ) -> Result<Vec<Membership>, GatewayError>;

    async fn get_recurring_collection(
        &self,
        collection_id: &str,
    ) -> Result<Fetch<RecurringCollection>, GatewayError>;

    async fn disable_token(
        &self,
        collection_id: &str,
        token: &str,
    ) -> Result<Disable, GatewayError>;
}

// ---------------------------------------------------------------------------
// Search query
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct SearchQuery<'a> {
    email: &'a str,
    brand: &'a str,
    #[serde(rename = "withJobs")]
    with_jobs: &'static str,
    status: &'a str,
    sort: SearchSort,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchSort {
    sort_by: &'static str,
    sort_criteria: &'static str,
    pagination: Pagination,
}

#[derive(Debug, Serialize)]
struct Pagination {
    limit: u32,
    offset: u32,
}

/// The JSON document sent as the `search` query parameter: oldest match
/// first, one result.
pub fn search_query(email: &str, prime_status: &str, brand: &str) -> String {
    let query = SearchQuery {
        email,
        brand,
        with_jobs: "true",
        status: prime_status,
        sort: SearchSort {
            sort_by: "TIMESTAMP",
            sort_criteria: "ASC",
            pagination: Pagination { limit: 1, offset: 0 },
        },
    };
    // Serializing a struct of strings and integers cannot fail.
    serde_json::to_string(&query).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// HttpGateway
// ---------------------------------------------------------------------------

/// [`Gateway`] backed by the membership and recurring-collection HTTP APIs.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    membership_base: Url,
    collection_base: Url,
}

impl HttpGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("*/*"));
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(GatewayError::Client)?;

        Ok(Self {
            client,
            membership_base: parse_base(&config.membership_base_url)?,
            collection_base: parse_base(&config.collection_base_url)?,
        })
    }

    fn search_url(&self, email: &str, prime_status: &str, brand: &str) -> Result<Url, GatewayError> {
        let mut url = join(&self.membership_base, &SEARCH_PATH)?;
        url.query_pairs_mut()
            .append_pair("search", &search_query(email, prime_status, brand));
        Ok(url)
    }

    fn collection_url(&self, tail: &[&str]) -> Result<Url, GatewayError> {
        let segments: Vec<&str> = COLLECTIONS_PATH
            .iter()
            .chain(tail.iter())
            .copied()
            .collect();
        join(&self.collection_base, &segments)
    }
}

fn parse_base(raw: &str) -> Result<Url, GatewayError> {
    Url::parse(raw).map_err(|e| GatewayError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Append percent-encoded path segments to `base`.
fn join(base: &Url, segments: &[&str]) -> Result<Url, GatewayError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| GatewayError::InvalidUrl {
            url: base.to_string(),
            reason: "url cannot be a base".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn find_memberships(
        &self,
        email: &str,
        prime_status: &str,
        brand: &str,
    ) -> Result<Vec<Membership>, GatewayError> {
        tracing::info!(email, prime_status, brand, "searching memberships");
        let url = self.search_url(email, prime_status, brand)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                email,
                prime_status,
                status = status.as_u16(),
                "membership search returned non-success status"
            );
        }

        let memberships: Option<Vec<Membership>> =
            response.json().await.map_err(|source| GatewayError::Decode {
                url: url.to_string(),
                source,
            })?;
        Ok(memberships.unwrap_or_default())
    }

    async fn get_recurring_collection(
        &self,
        collection_id: &str,
    ) -> Result<Fetch<RecurringCollection>, GatewayError> {
        tracing::info!(collection_id, "fetching recurring collection");
        let url = self.collection_url(&[collection_id])?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                collection_id,
                status = status.as_u16(),
                "failed to fetch recurring collection"
            );
            return Ok(Fetch::NotFound {
                status: status.as_u16(),
            });
        }

        let collection = response.json().await.map_err(|source| GatewayError::Decode {
            url: url.to_string(),
            source,
        })?;
        Ok(Fetch::Found(collection))
    }

    async fn disable_token(
        &self,
        collection_id: &str,
        token: &str,
    ) -> Result<Disable, GatewayError> {
        tracing::info!(collection_id, token, "disabling payment instrument token");
        let url =
            self.collection_url(&[collection_id, "paymentInstrumentTokens", token, "remove"])?;
        let response = self
            .client
            .put(url.clone())
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                collection_id,
                token,
                status = status.as_u16(),
                "failed to disable payment instrument token"
            );
            return Ok(Disable::Refused {
                status: status.as_u16(),
            });
        }
        Ok(Disable::Disabled)
    }
}
