//! Per-candidate takeover check pipeline.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::dns::CnameSource;
use crate::fingerprints;
use crate::probe::Prober;

/// Final per-candidate takeover determination with supporting evidence.
/// `vulnerable` is true exactly when the fingerprint registry matched the
/// candidate's CNAME and response body; evidence is empty otherwise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Verdict {
    pub subdomain: String,
    pub vulnerable: bool,
    pub service: Option<String>,
    pub cname: Vec<String>,
    pub evidence: Vec<String>,
}

impl Verdict {
    fn negative(subdomain: &str, cname: Vec<String>) -> Self {
        Self {
            subdomain: subdomain.to_string(),
            vulnerable: false,
            service: None,
            cname,
            evidence: Vec::new(),
        }
    }
}

/// Runs the resolve → probe → match pipeline for one subdomain.
pub struct TakeoverChecker {
    resolver: Arc<dyn CnameSource>,
    prober: Arc<dyn Prober>,
}

impl TakeoverChecker {
    pub fn new(resolver: Arc<dyn CnameSource>, prober: Arc<dyn Prober>) -> Self {
        Self { resolver, prober }
    }

    /// Check one subdomain. Infallible: lower-level failures degrade to
    /// "no data" inside the resolver and prober, so every candidate yields
    /// exactly one Verdict.
    pub async fn check(&self, subdomain: &str) -> Verdict {
        let cnames = self.resolver.resolve_cname(subdomain).await;

        // A subdomain with no CNAME cannot exhibit this class of takeover;
        // skip the HTTP probe entirely.
        if cnames.is_empty() {
            return Verdict::negative(subdomain, cnames);
        }

        let response = self.prober.fetch(subdomain).await;

        match fingerprints::lookup(&cnames, response.body.as_deref()) {
            Some(m) => {
                let mut evidence = vec![
                    format!("CNAME points to: {}", m.matched_cname),
                    format!("Service identified: {}", m.service),
                ];
                if let Some(status) = response.status {
                    evidence.push(format!("HTTP Status: {}", status));
                }

                warn!(
                    "VULNERABLE: {} -> {} ({})",
                    subdomain, m.service, m.matched_cname
                );

                Verdict {
                    subdomain: subdomain.to_string(),
                    vulnerable: true,
                    service: Some(m.service.to_string()),
                    cname: cnames,
                    evidence,
                }
            }
            None => Verdict::negative(subdomain, cnames),
        }
    }
}
