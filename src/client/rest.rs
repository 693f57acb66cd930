// src/client/rest.rs
// REST client for the VCT log API

use super::types::{
    AddVcResponse, AuditProof, ConsistencyProof, GetEntriesResponse, SignedTreeHead,
};
use super::{LogClient, LogConnector};
use crate::error::{HarnessError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

const ADD_VC_PATH: &str = "/v1/add-vc";
const GET_STH_PATH: &str = "/v1/get-sth";
const GET_STH_CONSISTENCY_PATH: &str = "/v1/get-sth-consistency";
const GET_PROOF_BY_HASH_PATH: &str = "/v1/get-proof-by-hash";
const GET_ENTRIES_PATH: &str = "/v1/get-entries";

/// Validate an endpoint URL and strip trailing slashes
pub fn normalize_endpoint(endpoint: &str) -> Result<String> {
    let trimmed = endpoint.trim();
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| HarnessError::Config(format!("invalid endpoint '{}': {}", trimmed, e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(HarnessError::Config(format!(
                "unsupported endpoint scheme '{}' in '{}'",
                other, trimmed
            )));
        }
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Log client speaking the REST API at a single endpoint
pub struct RestLogClient {
    endpoint: String,
    http: reqwest::Client,
}

impl RestLogClient {
    pub fn new(endpoint: &str, http: reqwest::Client) -> Result<Self> {
        Ok(Self {
            endpoint: normalize_endpoint(endpoint)?,
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        what: &'static str,
    ) -> Result<T> {
        let url = self.url(path);
        trace!(url = %url, ?query, "GET");
        let response = self.http.get(&url).query(query).send().await?;
        read_json(response, what).await
    }
}

async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    what: &'static str,
) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(HarnessError::Api {
            status: status.as_u16(),
            body: body.trim().to_string(),
        });
    }

    serde_json::from_str(&body).map_err(|source| HarnessError::Decode { what, source })
}

#[async_trait]
impl LogClient for RestLogClient {
    async fn get_sth(&self) -> Result<SignedTreeHead> {
        let sth: SignedTreeHead = self.get_json(GET_STH_PATH, &[], "signed tree head").await?;
        debug!(tree_size = sth.tree_size, timestamp = sth.timestamp, "Fetched STH");
        Ok(sth)
    }

    async fn add_vc(&self, credential: &[u8]) -> Result<AddVcResponse> {
        let url = self.url(ADD_VC_PATH);
        trace!(url = %url, bytes = credential.len(), "POST");
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(credential.to_vec())
            .send()
            .await?;
        let receipt: AddVcResponse = read_json(response, "add-vc receipt").await?;
        debug!(timestamp = receipt.timestamp, "Credential accepted");
        Ok(receipt)
    }

    async fn get_sth_consistency(&self, first: u64, second: u64) -> Result<ConsistencyProof> {
        self.get_json(
            GET_STH_CONSISTENCY_PATH,
            &[("first", first.to_string()), ("second", second.to_string())],
            "consistency proof",
        )
        .await
    }

    async fn get_entries(&self, start: u64, end: u64) -> Result<GetEntriesResponse> {
        if start >= end {
            return Ok(GetEntriesResponse::default());
        }

        // the wire range is inclusive
        self.get_json(
            GET_ENTRIES_PATH,
            &[("start", start.to_string()), ("end", (end - 1).to_string())],
            "entries",
        )
        .await
    }

    async fn get_proof_by_hash(&self, hash: &str, tree_size: u64) -> Result<AuditProof> {
        self.get_json(
            GET_PROOF_BY_HASH_PATH,
            &[("hash", hash.to_string()), ("tree_size", tree_size.to_string())],
            "audit proof",
        )
        .await
    }
}

/// Connector handing out `RestLogClient`s that share one HTTP client
#[derive(Clone)]
pub struct RestConnector {
    http: reqwest::Client,
}

impl RestConnector {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl LogConnector for RestConnector {
    fn connect(&self, endpoint: &str) -> Result<Box<dyn LogClient>> {
        Ok(Box::new(RestLogClient::new(endpoint, self.http.clone())?))
    }
}
