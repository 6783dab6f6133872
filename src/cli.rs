use clap::Parser;
use std::time::Duration;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(
    name = "subhawk",
    version,
    about = "Subdomain takeover scanner",
    long_about = "Enumerates subdomains of a target domain and checks each one \
for dangling CNAME records pointing at claimable third-party services."
)]
pub struct Args {
    /// Target domain to scan (e.g. example.com)
    #[arg(short, long)]
    pub domain: String,

    /// Wordlist file with one subdomain label per line for brute-force enumeration
    #[arg(short, long)]
    pub wordlist: Option<String>,

    /// Number of candidates checked concurrently (default from config)
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds for DNS and HTTP probes (default from config)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Increase output verbosity (-v detailed, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write results to this file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format: json or csv
    #[arg(short = 'f', long, default_value = "json")]
    pub output_format: String,

    /// Skip certificate-transparency log enumeration
    #[arg(long)]
    pub no_ct: bool,

    /// Disable colored terminal output
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    pub fn validate(&self) -> Result<(), String> {
        if !self.domain.contains('.') {
            return Err(format!(
                "'{}' does not look like a domain name",
                self.domain
            ));
        }

        if self.concurrency == Some(0) {
            return Err("Concurrency must be at least 1".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        match self.output_format.as_str() {
            "json" | "csv" => {}
            other => {
                return Err(format!(
                    "Unsupported output format '{}' (expected json or csv)",
                    other
                ));
            }
        }

        Ok(())
    }

    /// Scan settings come from the config file, with CLI flags as overrides.
    pub fn effective_concurrency(&self, config: &AppConfig) -> usize {
        self.concurrency.unwrap_or(config.scan.concurrency)
    }

    pub fn effective_timeout(&self, config: &AppConfig) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(config.scan.probe_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).expect("argv should parse")
    }

    fn template_config() -> AppConfig {
        toml::from_str(crate::config::DEFAULT_CONFIG).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["subhawk", "-d", "example.com"]);
        assert_eq!(args.domain, "example.com");
        assert_eq!(args.concurrency, None);
        assert_eq!(args.timeout, None);
        assert_eq!(args.output_format, "json");
        assert_eq!(args.verbose, 0);
        assert!(args.wordlist.is_none());
        assert!(args.output.is_none());
        assert!(!args.no_ct);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_scan_settings_default_from_config() {
        let args = parse(&["subhawk", "-d", "example.com"]);
        let config = template_config();
        assert_eq!(args.effective_concurrency(&config), 10);
        assert_eq!(args.effective_timeout(&config), Duration::from_secs(5));
    }

    #[test]
    fn test_cli_flags_override_config_scan_settings() {
        let args = parse(&["subhawk", "-d", "example.com", "-c", "25", "--timeout", "2"]);
        let config = template_config();
        assert_eq!(args.effective_concurrency(&config), 25);
        assert_eq!(args.effective_timeout(&config), Duration::from_secs(2));
    }

    #[test]
    fn test_counted_verbosity() {
        let args = parse(&["subhawk", "-d", "example.com", "-vv"]);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_domain_is_required() {
        assert!(Args::try_parse_from(["subhawk"]).is_err());
    }

    #[test]
    fn test_rejects_bare_label_domain() {
        let args = parse(&["subhawk", "-d", "localhost"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let args = parse(&["subhawk", "-d", "example.com", "-c", "0"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_format() {
        let args = parse(&["subhawk", "-d", "example.com", "-f", "xml"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_accepts_csv_format() {
        let args = parse(&["subhawk", "-d", "example.com", "-f", "csv", "-o", "out.csv"]);
        assert!(args.validate().is_ok());
        assert_eq!(args.output.as_deref(), Some("out.csv"));
    }
}
