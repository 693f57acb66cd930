// src/client/mod.rs
// Log client contract and connectors

mod rest;
pub mod types;

pub use rest::{RestConnector, RestLogClient, normalize_endpoint};
pub use types::{
    AddVcResponse, AuditProof, ConsistencyProof, GetEntriesResponse, LeafEntry, SignedTreeHead,
};

use crate::error::Result;
use async_trait::async_trait;

/// Operations the harness needs from a transparency log.
#[async_trait]
pub trait LogClient: Send + Sync {
    async fn get_sth(&self) -> Result<SignedTreeHead>;

    async fn add_vc(&self, credential: &[u8]) -> Result<AddVcResponse>;

    async fn get_sth_consistency(&self, first: u64, second: u64) -> Result<ConsistencyProof>;

    /// Entries in the half-open range `[start, end)`
    async fn get_entries(&self, start: u64, end: u64) -> Result<GetEntriesResponse>;

    async fn get_proof_by_hash(&self, hash: &str, tree_size: u64) -> Result<AuditProof>;
}

/// Builds a client bound to an endpoint.
pub trait LogConnector: Send + Sync {
    fn connect(&self, endpoint: &str) -> Result<Box<dyn LogClient>>;
}
