use rst_common::standard::async_trait::async_trait;
use rst_common::standard::chrono::{DateTime, TimeZone, Utc};
use rst_common::standard::serde::{self, Deserialize};
use rst_common::with_logging::log::debug;

use prople_herald_core::comm::zkp::types::{ResolverError, StateInfo, StateResolver};

#[derive(Deserialize, Debug, Clone)]
#[serde(crate = "self::serde")]
struct GistResponse {
    root: String,

    #[serde(rename = "createdAtTimestamp")]
    created_at_timestamp: u64,

    #[serde(rename = "replacedAtTimestamp", default)]
    replaced_at_timestamp: u64,
}

impl TryFrom<GistResponse> for StateInfo {
    type Error = ResolverError;

    fn try_from(value: GistResponse) -> Result<Self, Self::Error> {
        let created_at = to_datetime(value.created_at_timestamp)?;
        let replaced_at = match value.replaced_at_timestamp {
            0 => None,
            timestamp => Some(to_datetime(timestamp)?),
        };

        Ok(StateInfo {
            root: value.root,
            created_at,
            replaced_at,
        })
    }
}

fn to_datetime(timestamp: u64) -> Result<DateTime<Utc>, ResolverError> {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .ok_or_else(|| ResolverError::InvalidResponse(format!("invalid timestamp: {}", timestamp)))
}

/// `HttpResolver` asks a resolver service about the global identity state roots published
/// by a single contract
///
/// `GET {endpoint}/gist/{root}?contract={contract}`, a `replacedAtTimestamp` of zero means the
/// root is still the latest one
#[derive(Clone)]
pub struct HttpResolver {
    client: reqwest::Client,
    endpoint: String,
    contract: String,
}

impl HttpResolver {
    pub fn new(endpoint: String, contract: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            contract,
        }
    }
}

#[async_trait]
impl StateResolver for HttpResolver {
    async fn resolve_gist(&self, root: String) -> Result<StateInfo, ResolverError> {
        let url = format!("{}/gist/{}", self.endpoint, root);
        debug!("[resolver:gist] url: {}, contract: {}", url, self.contract);

        let resp = self
            .client
            .get(&url)
            .query(&[("contract", self.contract.as_str())])
            .send()
            .await
            .map_err(|err| ResolverError::RequestError(err.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ResolverError::NotFound(root));
        }

        if !resp.status().is_success() {
            return Err(ResolverError::RequestError(format!(
                "unexpected status: {}",
                resp.status()
            )));
        }

        let gist: GistResponse = resp
            .json()
            .await
            .map_err(|err| ResolverError::InvalidResponse(err.to_string()))?;

        if gist.root != root {
            return Err(ResolverError::InvalidResponse(format!(
                "root mismatch: {}",
                gist.root
            )));
        }

        StateInfo::try_from(gist)
    }
}
