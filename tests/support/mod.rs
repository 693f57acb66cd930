// tests/support/mod.rs
// In-process RFC 6962 log served over the VCT REST API for integration tests

#![allow(dead_code)]

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use vct_bdd::client::RestConnector;
use vct_bdd::fixtures::FixtureRegistry;
use vct_bdd::retry::PollPolicy;
use vct_bdd::steps::HarnessContext;

type Hash = [u8; 32];

fn sha256(parts: &[&[u8]]) -> Hash {
    let mut h = Sha256::new();
    for part in parts {
        h.update(part);
    }
    h.finalize().into()
}

fn leaf_hash(data: &[u8]) -> Hash {
    sha256(&[&[0u8], data])
}

fn node_hash(left: &Hash, right: &Hash) -> Hash {
    sha256(&[&[1u8], left, right])
}

/// Largest power of two strictly less than n (n > 1)
fn split(n: usize) -> usize {
    let mut k = 1;
    while k << 1 < n {
        k <<= 1;
    }
    k
}

fn root(hashes: &[Hash]) -> Hash {
    match hashes.len() {
        0 => sha256(&[]),
        1 => hashes[0],
        n => {
            let k = split(n);
            node_hash(&root(&hashes[..k]), &root(&hashes[k..]))
        }
    }
}

fn audit_path(m: usize, hashes: &[Hash]) -> Vec<Hash> {
    let n = hashes.len();
    if n <= 1 {
        return Vec::new();
    }
    let k = split(n);
    if m < k {
        let mut path = audit_path(m, &hashes[..k]);
        path.push(root(&hashes[k..]));
        path
    } else {
        let mut path = audit_path(m - k, &hashes[k..]);
        path.push(root(&hashes[..k]));
        path
    }
}

fn subproof(m: usize, hashes: &[Hash], complete: bool) -> Vec<Hash> {
    let n = hashes.len();
    if m == n {
        return if complete { Vec::new() } else { vec![root(hashes)] };
    }
    let k = split(n);
    if m <= k {
        let mut proof = subproof(m, &hashes[..k], complete);
        proof.push(root(&hashes[k..]));
        proof
    } else {
        let mut proof = subproof(m - k, &hashes[k..], false);
        proof.push(root(&hashes[..k]));
        proof
    }
}

fn consistency_proof(m: usize, hashes: &[Hash]) -> Vec<Hash> {
    if m == 0 || m >= hashes.len() {
        return Vec::new();
    }
    subproof(m, hashes, true)
}

fn encode_all(hashes: &[Hash]) -> Vec<String> {
    hashes.iter().map(|h| STANDARD.encode(h)).collect()
}

/// Mock log state. Submissions stay invisible for `merge_after_polls`
/// get-sth requests, mimicking asynchronous sequencing.
#[derive(Default)]
pub struct MockLog {
    pub leaves: Vec<Vec<u8>>,
    pub pending: Vec<Vec<u8>>,
    pub merge_after_polls: u32,
    countdown: u32,
    /// Answer this many upcoming get-sth requests with 503
    pub fail_sth: u32,
    pub sth_requests: u32,
    pub add_requests: u32,
}

impl MockLog {
    pub fn with_leaves(n: usize) -> Self {
        Self {
            leaves: (0..n).map(|i| format!("{{\"seed\":{}}}", i).into_bytes()).collect(),
            ..Default::default()
        }
    }

    pub fn merging_after(mut self, polls: u32) -> Self {
        self.merge_after_polls = polls;
        self
    }

    fn hashes(&self, size: usize) -> Vec<Hash> {
        self.leaves[..size].iter().map(|l| leaf_hash(l)).collect()
    }
}

pub type SharedLog = Arc<Mutex<MockLog>>;

fn bad_request(msg: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, msg.into()).into_response()
}

async fn get_sth(State(log): State<SharedLog>) -> Response {
    let mut log = log.lock().unwrap();
    log.sth_requests += 1;
    if log.fail_sth > 0 {
        log.fail_sth -= 1;
        return (StatusCode::SERVICE_UNAVAILABLE, "sequencer busy").into_response();
    }
    if !log.pending.is_empty() {
        if log.countdown == 0 {
            let pending = std::mem::take(&mut log.pending);
            log.leaves.extend(pending);
        } else {
            log.countdown -= 1;
        }
    }

    let size = log.leaves.len();
    let root_hash = root(&log.hashes(size));
    Json(json!({
        "tree_size": size,
        "timestamp": 1_617_976_300_000u64 + size as u64,
        "sha256_root_hash": STANDARD.encode(root_hash),
        "tree_head_signature": STANDARD.encode([7u8; 64]),
    }))
    .into_response()
}

async fn add_vc(State(log): State<SharedLog>, body: Bytes) -> Response {
    if serde_json::from_slice::<serde_json::Value>(&body).is_err() {
        return bad_request("credential is not JSON");
    }
    let mut log = log.lock().unwrap();
    log.add_requests += 1;
    log.pending.push(body.to_vec());
    log.countdown = log.merge_after_polls;

    Json(json!({
        "svct_version": 0,
        "id": STANDARD.encode(b"mock-log"),
        "timestamp": 1_617_976_300_000u64,
        "extensions": "",
        "signature": STANDARD.encode([9u8; 64]),
    }))
    .into_response()
}

#[derive(Deserialize)]
struct ConsistencyParams {
    first: usize,
    second: usize,
}

async fn get_sth_consistency(
    State(log): State<SharedLog>,
    Query(params): Query<ConsistencyParams>,
) -> Response {
    let log = log.lock().unwrap();
    if params.first > params.second || params.second > log.leaves.len() {
        return bad_request("invalid tree sizes");
    }
    let proof = consistency_proof(params.first, &log.hashes(params.second));
    Json(json!({ "consistency": encode_all(&proof) })).into_response()
}

#[derive(Deserialize)]
struct EntriesParams {
    start: usize,
    end: usize,
}

async fn get_entries(
    State(log): State<SharedLog>,
    Query(params): Query<EntriesParams>,
) -> Response {
    let log = log.lock().unwrap();
    if params.start > params.end || params.end >= log.leaves.len() {
        return bad_request("invalid range");
    }
    let entries: Vec<_> = log.leaves[params.start..=params.end]
        .iter()
        .map(|leaf| json!({ "leaf_input": STANDARD.encode(leaf), "extra_data": "" }))
        .collect();
    Json(json!({ "entries": entries })).into_response()
}

#[derive(Deserialize)]
struct ProofParams {
    hash: String,
    tree_size: usize,
}

async fn get_proof_by_hash(
    State(log): State<SharedLog>,
    Query(params): Query<ProofParams>,
) -> Response {
    let log = log.lock().unwrap();
    if params.tree_size > log.leaves.len() {
        return bad_request("tree_size beyond current tree");
    }
    let Ok(wanted) = STANDARD.decode(params.hash.as_bytes()) else {
        return bad_request("hash is not base64");
    };
    let hashes = log.hashes(params.tree_size);
    let Some(index) = hashes.iter().position(|h| h.as_slice() == wanted.as_slice()) else {
        return (StatusCode::NOT_FOUND, "leaf not found").into_response();
    };
    let path = audit_path(index, &hashes);
    Json(json!({ "leaf_index": index, "audit_path": encode_all(&path) })).into_response()
}

/// Serve `log` on an ephemeral port; returns the endpoint and shared state
pub async fn spawn_log(log: MockLog) -> (String, SharedLog) {
    let shared: SharedLog = Arc::new(Mutex::new(log));
    let app = Router::new()
        .route("/v1/get-sth", get(get_sth))
        .route("/v1/add-vc", post(add_vc))
        .route("/v1/get-sth-consistency", get(get_sth_consistency))
        .route("/v1/get-entries", get(get_entries))
        .route("/v1/get-proof-by-hash", get(get_proof_by_hash))
        .with_state(shared.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), shared)
}

/// Short polling so exhaustion tests finish quickly
pub fn fast_policy() -> PollPolicy {
    PollPolicy::new(Duration::from_millis(10), 15)
}

pub fn rest_context() -> HarnessContext {
    let http = vct_bdd::http::create_shared_client(Duration::from_secs(5)).unwrap();
    HarnessContext::new(
        Arc::new(RestConnector::new(http)),
        Arc::new(FixtureRegistry::embedded().clone()),
    )
    .with_policy(fast_policy())
}

#[test]
fn test_mock_proofs_match_rfc6962_shapes() {
    let hashes: Vec<Hash> = (0..7u8).map(|i| leaf_hash(&[i])).collect();
    assert!(audit_path(0, &hashes[..1]).is_empty());
    assert_eq!(audit_path(0, &hashes[..2]).len(), 1);
    assert_eq!(audit_path(6, &hashes).len(), 2);
    assert_eq!(audit_path(0, &hashes).len(), 3);
    assert!(consistency_proof(0, &hashes).is_empty());
    assert!(consistency_proof(7, &hashes).is_empty());
    assert_eq!(consistency_proof(4, &hashes).len(), 1);
    assert_eq!(consistency_proof(3, &hashes[..4]).len(), 3);
}
