// src/steps/mod.rs
// Polling test harness: one operation per scenario step

mod state;


pub use state::HarnessState;

use crate::client::{AddVcResponse, LeafEntry, LogClient, LogConnector};
use crate::error::{HarnessError, Result};
use crate::fixtures::FixtureRegistry;
use crate::merkle::{LeafHasher, Rfc6962Hasher};
use crate::retry::{PollPolicy, poll};
use std::sync::Arc;
use tracing::{debug, info};

/// Collaborators shared by every scenario of a run
#[derive(Clone)]
pub struct HarnessContext {
    pub connector: Arc<dyn LogConnector>,
    pub fixtures: Arc<FixtureRegistry>,
    pub hasher: Arc<dyn LeafHasher>,
    pub policy: PollPolicy,
    /// When set, connect steps use this endpoint instead of the quoted one
    pub endpoint_override: Option<String>,
}

impl HarnessContext {
    pub fn new(connector: Arc<dyn LogConnector>, fixtures: Arc<FixtureRegistry>) -> Self {
        Self {
            connector,
            fixtures,
            hasher: Arc::new(Rfc6962Hasher),
            policy: PollPolicy::default(),
            endpoint_override: None,
        }
    }

    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_hasher(mut self, hasher: Arc<dyn LeafHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn with_endpoint_override(mut self, endpoint: Option<String>) -> Self {
        self.endpoint_override = endpoint;
        self
    }
}

/// Step executor for a single scenario
pub struct Steps {
    ctx: HarnessContext,
    client: Option<Box<dyn LogClient>>,
    state: HarnessState,
}

impl Steps {
    pub fn new(ctx: HarnessContext) -> Self {
        Self {
            ctx,
            client: None,
            state: HarnessState::default(),
        }
    }

    pub fn state(&self) -> &HarnessState {
        &self.state
    }

    fn client(&self) -> Result<&dyn LogClient> {
        self.client.as_deref().ok_or(HarnessError::NotConnected)
    }

    /// Bind a client to `endpoint` and record the current tree head as baseline.
    /// Not retried.
    pub async fn connect(&mut self, endpoint: &str) -> Result<()> {
        let endpoint = self.ctx.endpoint_override.as_deref().unwrap_or(endpoint);
        let client = self.ctx.connector.connect(endpoint)?;
        let sth = client.get_sth().await?;

        info!(endpoint, tree_size = sth.tree_size, "Connected to log");
        if let Some(issued) = sth.issued_at() {
            debug!(issued_at = %issued, "Baseline tree head");
        }

        self.client = Some(client);
        self.state.last_sth = Some(sth);
        Ok(())
    }

    /// Submit a fixture credential. Not retried.
    pub async fn add_vc(&mut self, fixture: &str) -> Result<AddVcResponse> {
        let client = self.client()?;
        let credential = self.ctx.fixtures.get(fixture)?;
        let receipt = client.add_vc(credential).await?;
        info!(fixture, bytes = credential.len(), "Credential submitted");
        Ok(receipt)
    }

    /// Poll until the tree has grown by exactly `expected` leaves since connect.
    pub async fn check_tree_growth(&mut self, expected: &str) -> Result<()> {
        let expected_delta = parse_count("tree size", expected)?;
        let client = self.client()?;
        let baseline = self.state.baseline()?.tree_size;

        poll(self.ctx.policy, "tree growth", |_| async move {
            let sth = client.get_sth().await?;
            let delta = i128::from(sth.tree_size) - i128::from(baseline);
            if delta != i128::from(expected_delta) {
                return Err(HarnessError::mismatch(format!(
                    "expected tree size {}, got {}",
                    expected_delta, delta
                )));
            }
            Ok(())
        })
        .await?;

        info!(delta = expected_delta, "Tree growth confirmed");
        Ok(())
    }

    /// Poll until the consistency proof between the baseline and the current
    /// tree head has the expected shape: empty from an empty tree, non-empty
    /// otherwise.
    pub async fn check_consistency(&mut self) -> Result<()> {
        let client = self.client()?;
        let baseline = self.state.baseline()?.tree_size;

        let path_len = poll(self.ctx.policy, "consistency proof", |_| async move {
            let sth = client.get_sth().await?;
            let proof = client.get_sth_consistency(baseline, sth.tree_size).await?;
            let len = proof.consistency.len();

            if baseline != 0 && len < 1 {
                return Err(HarnessError::invariant(format!(
                    "no hash, expected greater than zero, got {}",
                    len
                )));
            }
            if baseline == 0 && len != 0 {
                return Err(HarnessError::invariant(format!(
                    "empty hash expected, got {}",
                    len
                )));
            }
            Ok(len)
        })
        .await?;

        info!(baseline, path_len, "Consistency proof checked");
        Ok(())
    }

    /// Poll until the entries added since connect number exactly `expected`
    /// (compared as decimal text), then remember them for audit proof steps.
    pub async fn check_entries(&mut self, expected: &str) -> Result<()> {
        parse_count("entries length", expected)?;
        let client = self.client()?;
        let baseline = self.state.baseline()?.tree_size;

        let entries: Vec<LeafEntry> = poll(self.ctx.policy, "entries", |_| async move {
            let sth = client.get_sth().await?;
            let resp = client.get_entries(baseline, sth.tree_size).await?;
            let got = resp.entries.len().to_string();
            if got != expected {
                return Err(HarnessError::mismatch(format!(
                    "no entries, expected {}, got {}",
                    expected, got
                )));
            }
            Ok(resp.entries)
        })
        .await?;

        info!(count = entries.len(), "Entries fetched");
        self.state.last_entries = Some(entries);
        Ok(())
    }

    /// Poll until the log returns a non-empty audit path for the `index`-th
    /// (1-based) entry of the last entries check.
    pub async fn check_audit_proof(&mut self, index: &str) -> Result<()> {
        let index = usize::try_from(parse_count("entry index", index)?)
            .map_err(|e| HarnessError::Parse(format!("entry index '{}': {}", index, e)))?;
        if index == 0 {
            return Err(HarnessError::Parse("index is 1-based, got 0".to_string()));
        }

        let client = self.client()?;
        let entry = self.state.entry(index)?;
        let hash = self.ctx.hasher.hash_leaf_base64(&entry.leaf_input);
        let hash = hash.as_str();
        debug!(index, leaf_hash = hash, "Looking up audit proof");

        let path_len = poll(self.ctx.policy, "audit proof", |_| async move {
            let sth = client.get_sth().await?;
            let proof = client.get_proof_by_hash(hash, sth.tree_size).await?;
            if proof.audit_path.is_empty() {
                return Err(HarnessError::mismatch(format!(
                    "no audit, expected greater than zero, got {}",
                    proof.audit_path.len()
                )));
            }
            Ok(proof.audit_path.len())
        })
        .await?;

        info!(index, path_len, "Audit proof found");
        Ok(())
    }
}

/// Step arguments must be bare ASCII digits: no sign, no surrounding space
fn parse_count(what: &str, value: &str) -> Result<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HarnessError::Parse(format!(
            "expected {} as decimal digits, got '{}'",
            what, value
        )));
    }
    value
        .parse::<u64>()
        .map_err(|e| HarnessError::Parse(format!("expected {} '{}': {}", what, value, e)))
}
