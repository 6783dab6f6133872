//! Wordlist-driven brute-force enumeration.
//!
//! Builds `{word}.{target}` candidates from a caller-supplied wordlist and
//! keeps only the ones that actually resolve. Unlike the CT-log source, an
//! unreadable wordlist is a hard error: the user asked for it explicitly.

use anyhow::{Context, Result};
use futures::{stream, StreamExt};
use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use tracing::{debug, info};

use crate::dns::ResolverClient;
use crate::domain_utils::is_valid_hostname;

pub struct WordlistEnumerator {
    resolver: Arc<ResolverClient>,
    concurrency: usize,
}

impl WordlistEnumerator {
    pub fn new(resolver: Arc<ResolverClient>, concurrency: usize) -> Self {
        Self {
            resolver,
            concurrency: concurrency.max(1),
        }
    }

    /// Read the wordlist, build candidate hostnames, and resolve each one to
    /// confirm it exists. Returns only the live candidates.
    pub async fn enumerate(&self, wordlist_path: &str, target: &str) -> Result<HashSet<String>> {
        let candidates = read_candidates(wordlist_path, target)?;
        info!(
            "Probing {} wordlist candidates against {}",
            candidates.len(),
            target
        );

        let live: HashSet<String> = stream::iter(candidates)
            .map(|candidate| {
                let resolver = self.resolver.clone();
                async move {
                    if resolver.host_exists(&candidate).await {
                        debug!("Wordlist hit: {}", candidate);
                        Some(candidate)
                    } else {
                        None
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .filter_map(|candidate| async move { candidate })
            .collect()
            .await;

        info!("Wordlist enumeration found {} live subdomains", live.len());
        Ok(live)
    }
}

/// Parse a wordlist file into candidate hostnames under `target`. Blank
/// lines and `#` comments are skipped; words producing an invalid hostname
/// are dropped silently.
fn read_candidates(wordlist_path: &str, target: &str) -> Result<Vec<String>> {
    let contents = fs::read_to_string(wordlist_path)
        .with_context(|| format!("Failed to read wordlist {}", wordlist_path))?;

    let candidates: Vec<String> = contents
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|word| format!("{}.{}", word.to_lowercase(), target))
        .filter(|candidate| is_valid_hostname(candidate))
        .collect();

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_candidates_skips_comments_and_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "www").unwrap();
        writeln!(file, "# staging hosts").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  api  ").unwrap();
        writeln!(file, "MAIL").unwrap();

        let candidates =
            read_candidates(file.path().to_str().unwrap(), "example.com").unwrap();
        assert_eq!(
            candidates,
            vec![
                "www.example.com".to_string(),
                "api.example.com".to_string(),
                "mail.example.com".to_string(),
            ]
        );
    }

    #[test]
    fn test_read_candidates_drops_invalid_words() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "good").unwrap();
        writeln!(file, "bad word").unwrap();
        writeln!(file, "also!bad").unwrap();

        let candidates =
            read_candidates(file.path().to_str().unwrap(), "example.com").unwrap();
        assert_eq!(candidates, vec!["good.example.com".to_string()]);
    }

    #[test]
    fn test_read_candidates_missing_file_is_an_error() {
        let result = read_candidates("/nonexistent/words.txt", "example.com");
        assert!(result.is_err());
    }
}
