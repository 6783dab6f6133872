//! Certificate-transparency log enumeration via crt.sh.
//!
//! A wildcard identity query against crt.sh surfaces every certificate ever
//! issued for a subdomain of the target, which makes CT logs the cheapest
//! passive enumeration source available. crt.sh is best-effort: it is slow
//! under load and sometimes returns errors, so every failure here degrades
//! to an empty candidate set rather than aborting the scan.

use anyhow::Result;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain_utils::normalize_candidate;

const CRT_SH_BASE_URL: &str = "https://crt.sh";

#[derive(Debug, Deserialize)]
struct CrtShEntry {
    name_value: String,
    common_name: Option<String>,
}

pub struct CtLogEnumerator {
    client: reqwest::Client,
    base_url: String,
}

impl CtLogEnumerator {
    pub fn new(timeout: Duration, user_agent: &str) -> Self {
        Self::with_base_url(CRT_SH_BASE_URL.to_string(), timeout, user_agent)
    }

    /// Point the enumerator at an alternate endpoint. Used by tests to
    /// substitute a mock server.
    pub fn with_base_url(base_url: String, timeout: Duration, user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .unwrap_or_default();

        Self { client, base_url }
    }

    /// Query CT logs for certificates covering `%.target` and normalize the
    /// identities into in-zone candidate hostnames. Never fails: endpoint
    /// errors, non-success statuses, and unparseable payloads all yield an
    /// empty set with a warning.
    pub async fn enumerate(&self, target: &str) -> Result<HashSet<String>> {
        let query = urlencoding::encode(&format!("%.{}", target)).to_string();
        let url = format!("{}/?q={}&output=json", self.base_url, query);
        debug!("Querying CT logs: {}", url);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("CT log query failed for {}: {}", target, e);
                return Ok(HashSet::new());
            }
        };

        if !response.status().is_success() {
            warn!(
                "CT log endpoint returned {} for {}",
                response.status(),
                target
            );
            return Ok(HashSet::new());
        }

        let entries: Vec<CrtShEntry> = match response.json().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to parse CT log response for {}: {}", target, e);
                return Ok(HashSet::new());
            }
        };

        let mut candidates = HashSet::new();
        for entry in &entries {
            // name_value packs multiple SAN identities newline-separated.
            for identity in entry.name_value.lines() {
                if let Some(candidate) = normalize_candidate(identity, target) {
                    candidates.insert(candidate);
                }
            }
            if let Some(common_name) = &entry.common_name {
                if let Some(candidate) = normalize_candidate(common_name, target) {
                    candidates.insert(candidate);
                }
            }
        }

        debug!(
            "CT logs yielded {} unique candidates from {} certificates",
            candidates.len(),
            entries.len()
        );
        Ok(candidates)
    }
}
