//! DNS resolution for candidate subdomains.
//!
//! CNAME lookups go through a rotating DNS-over-HTTPS server pool first, with
//! the system resolver as a fallback when every DoH attempt errors. A missing
//! CNAME record, NXDOMAIN, and every transient resolution failure all collapse
//! to an empty result: a single candidate's DNS failure must never abort the
//! batch. Unexpected errors are reported through `tracing` and nothing else.

use async_trait::async_trait;
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::TokioAsyncResolver;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::AppConfig;

/// Source of CNAME chains for a hostname. The takeover checker depends on
/// this seam so tests can substitute canned answers.
#[async_trait]
pub trait CnameSource: Send + Sync {
    /// Resolve the CNAME chain for a name. Always returns a list; absence
    /// and failure are both the empty list.
    async fn resolve_cname(&self, name: &str) -> Vec<String>;
}

#[derive(Debug, Clone)]
struct DohServer {
    url: String,
    name: String,
    timeout: Duration,
}

/// DNS client with a rotating DoH server pool and system-resolver fallback.
pub struct ResolverClient {
    doh_servers: Vec<DohServer>,
    current_doh_index: AtomicUsize,
    client: reqwest::Client,
}

impl ResolverClient {
    /// Create a resolver client from configuration with a caller-supplied
    /// per-query timeout.
    pub fn from_config(config: &AppConfig, query_timeout: Duration) -> Self {
        let doh_servers = config
            .dns
            .doh_servers
            .iter()
            .map(|s| DohServer {
                url: s.url.clone(),
                name: s.name.clone(),
                timeout: Duration::from_secs(s.timeout_secs).min(query_timeout),
            })
            .collect();

        let client = reqwest::Client::builder()
            .timeout(query_timeout)
            .user_agent(&config.http.user_agent)
            .build()
            .unwrap_or_default();

        Self {
            doh_servers,
            current_doh_index: AtomicUsize::new(0),
            client,
        }
    }

    /// Create a resolver client querying the given DoH endpoints only.
    /// Primarily for tests injecting wiremock server addresses.
    pub fn with_doh_urls(urls: Vec<String>, query_timeout: Duration) -> Self {
        let doh_servers = urls
            .into_iter()
            .enumerate()
            .map(|(i, url)| DohServer {
                url,
                name: format!("DoH Server {}", i + 1),
                timeout: query_timeout,
            })
            .collect();

        let client = reqwest::Client::builder()
            .timeout(query_timeout)
            .user_agent("subhawk/1.0")
            .build()
            .unwrap_or_default();

        Self {
            doh_servers,
            current_doh_index: AtomicUsize::new(0),
            client,
        }
    }

    fn next_doh_server(&self) -> Option<&DohServer> {
        if self.doh_servers.is_empty() {
            return None;
        }
        let index = self.current_doh_index.fetch_add(1, Ordering::Relaxed) % self.doh_servers.len();
        Some(&self.doh_servers[index])
    }

    /// Perform a DNS-over-HTTPS lookup, returning the data fields of answers
    /// with the requested record type.
    async fn doh_lookup(
        &self,
        domain: &str,
        record_type: &str,
        answer_type: u64,
        server: &DohServer,
    ) -> anyhow::Result<Vec<String>> {
        debug!("DoH {} lookup for {} using {}", record_type, domain, server.name);

        let query_params = [("name", domain), ("type", record_type)];

        let response = self
            .client
            .get(&server.url)
            .query(&query_params)
            .header("Accept", "application/dns-json")
            .timeout(server.timeout)
            .send()
            .await?
            .json::<Value>()
            .await?;

        let mut records = Vec::new();
        if let Some(answers) = response["Answer"].as_array() {
            for answer in answers {
                if answer["type"].as_u64() == Some(answer_type) {
                    if let Some(data) = answer["data"].as_str() {
                        records.push(data.trim_end_matches('.').to_string());
                    }
                }
            }
        }

        debug!(
            "DoH found {} {} records for {} via {}",
            records.len(),
            record_type,
            domain,
            server.name
        );
        Ok(records)
    }

    /// Check whether a hostname resolves to an address at all. Used by the
    /// wordlist enumerator to confirm candidate existence.
    pub async fn host_exists(&self, name: &str) -> bool {
        for _attempt in 0..2 {
            let Some(server) = self.next_doh_server() else {
                break;
            };
            match self.doh_lookup(name, "A", 1, server).await {
                Ok(records) => return !records.is_empty(),
                Err(e) => {
                    debug!("DoH A lookup failed for {} via {}: {}", name, server.name, e);
                }
            }
        }

        // All DoH attempts errored, fall back to the system resolver.
        match TokioAsyncResolver::tokio_from_system_conf() {
            Ok(resolver) => resolver
                .lookup_ip(name)
                .await
                .map(|lookup| lookup.iter().next().is_some())
                .unwrap_or(false),
            Err(e) => {
                debug!("Failed to create system resolver: {}", e);
                false
            }
        }
    }

    async fn system_cname_lookup(&self, name: &str) -> anyhow::Result<Vec<String>> {
        let resolver = TokioAsyncResolver::tokio_from_system_conf()?;
        match resolver.lookup(name, RecordType::CNAME).await {
            Ok(lookup) => Ok(lookup
                .iter()
                .filter_map(|rdata| rdata.as_cname())
                .map(|cname| cname.0.to_utf8().trim_end_matches('.').to_string())
                .collect()),
            Err(e) => match e.kind() {
                // No CNAME record and non-existent domain are expected,
                // common outcomes, not failures.
                ResolveErrorKind::NoRecordsFound { .. } => Ok(Vec::new()),
                _ => Err(e.into()),
            },
        }
    }
}

#[async_trait]
impl CnameSource for ResolverClient {
    async fn resolve_cname(&self, name: &str) -> Vec<String> {
        let mut doh_answered = false;

        for _attempt in 0..2 {
            let Some(server) = self.next_doh_server() else {
                break;
            };
            match self.doh_lookup(name, "CNAME", 5, server).await {
                Ok(records) if !records.is_empty() => return records,
                Ok(_) => {
                    // An empty answer from a healthy server is authoritative
                    // enough: most subdomains simply have no CNAME.
                    doh_answered = true;
                }
                Err(e) => {
                    debug!("DoH CNAME lookup failed for {} via {}: {}", name, server.name, e);
                }
            }
        }

        if doh_answered {
            return Vec::new();
        }

        match self.system_cname_lookup(name).await {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    "All CNAME resolution failed for {}, treating as no CNAME. Last error: {}",
                    name, e
                );
                Vec::new()
            }
        }
    }
}
