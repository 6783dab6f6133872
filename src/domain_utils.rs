use once_cell::sync::Lazy;
use regex::Regex;

// Underscores are intentionally allowed at the start of labels: CT logs
// routinely contain service-record subdomains (_dmarc.example.com etc.)
// and they are legitimate probe candidates.
static HOSTNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9_][a-z0-9\-_]{0,62}(\.[a-z0-9_][a-z0-9\-_]{0,62})*$").unwrap()
});

/// Check that a string is a syntactically plausible hostname.
pub fn is_valid_hostname(host: &str) -> bool {
    if host.contains("..") || host.ends_with('.') {
        return false;
    }
    host.len() <= 253 && host.contains('.') && HOSTNAME_REGEX.is_match(host)
}

/// Normalize a raw enumeration result into a candidate subdomain of the
/// target domain. Returns `None` for wildcards, names outside the target
/// zone, and anything syntactically invalid. Candidates are lowercased so
/// the caller's set deduplicates by exact string match.
pub fn normalize_candidate(raw: &str, target_domain: &str) -> Option<String> {
    let candidate = raw.trim().trim_end_matches('.').to_lowercase();
    if candidate.is_empty() || candidate.contains('*') {
        return None;
    }

    let target = target_domain.trim().trim_end_matches('.').to_lowercase();
    if candidate != target && !candidate.ends_with(&format!(".{}", target)) {
        return None;
    }

    if !is_valid_hostname(&candidate) {
        return None;
    }

    Some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_hostname() {
        assert!(is_valid_hostname("foo.example.com"));
        assert!(is_valid_hostname("_dmarc.example.com"));
        assert!(is_valid_hostname("a-b.example.co.uk"));
        assert!(!is_valid_hostname("nodots"));
        assert!(!is_valid_hostname("double..dot.example.com"));
        assert!(!is_valid_hostname("trailing.example.com."));
        assert!(!is_valid_hostname("bad host.example.com"));
    }

    #[test]
    fn test_normalize_candidate_lowercases_and_trims() {
        assert_eq!(
            normalize_candidate("  FOO.Example.COM.\n", "example.com"),
            Some("foo.example.com".to_string())
        );
    }

    #[test]
    fn test_normalize_candidate_rejects_wildcards() {
        assert_eq!(normalize_candidate("*.example.com", "example.com"), None);
    }

    #[test]
    fn test_normalize_candidate_requires_target_zone() {
        // Suffix check must respect label boundaries: notexample.com is not
        // a subdomain of example.com.
        assert_eq!(normalize_candidate("notexample.com", "example.com"), None);
        assert_eq!(normalize_candidate("foo.other.com", "example.com"), None);
        assert_eq!(
            normalize_candidate("example.com", "example.com"),
            Some("example.com".to_string())
        );
    }
}
