//! Report export in JSON and CSV formats.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use tracing::{debug, info};

use crate::checker::Verdict;

#[derive(Serialize)]
struct ScanInfo {
    domain: String,
    timestamp: String,
    total_subdomains: usize,
    vulnerable_count: usize,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    scan_info: ScanInfo,
    subdomains: Vec<&'a str>,
    vulnerable: Vec<&'a Verdict>,
}

/// Write the full scan report as pretty-printed JSON. The subdomain list is
/// sorted so reports for the same scan diff cleanly; the vulnerable section
/// carries only positive verdicts, each with its evidence.
pub fn export_json(
    domain: &str,
    candidates: &HashSet<String>,
    verdicts: &[Verdict],
    path: &str,
) -> Result<()> {
    let mut subdomains: Vec<&str> = candidates.iter().map(|s| s.as_str()).collect();
    subdomains.sort_unstable();

    let vulnerable: Vec<&Verdict> = verdicts.iter().filter(|v| v.vulnerable).collect();

    let report = JsonReport {
        scan_info: ScanInfo {
            domain: domain.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            total_subdomains: subdomains.len(),
            vulnerable_count: vulnerable.len(),
        },
        subdomains,
        vulnerable,
    };

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    fs::write(path, json).with_context(|| format!("Failed to write report to {}", path))?;

    info!("Exported JSON report to {}", path);
    Ok(())
}

/// Write one CSV row per verdict. Multi-valued fields are flattened: CNAME
/// chains joined with ", " and evidence lines with " | ".
pub fn export_csv(verdicts: &[Verdict], path: &str) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {}", path))?;

    writer.write_record(["subdomain", "vulnerable", "service", "cname", "evidence"])?;

    for verdict in verdicts {
        let cname = verdict.cname.join(", ");
        let evidence = verdict.evidence.join(" | ");
        writer.write_record([
            verdict.subdomain.as_str(),
            if verdict.vulnerable { "true" } else { "false" },
            verdict.service.as_deref().unwrap_or(""),
            cname.as_str(),
            evidence.as_str(),
        ])?;
    }

    writer.flush().context("Failed to flush CSV writer")?;
    debug!("Exported {} CSV rows to {}", verdicts.len(), path);
    Ok(())
}
