use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use subhawk::checker::TakeoverChecker;
use subhawk::cli::Args;
use subhawk::config::AppConfig;
use subhawk::discovery::ct_logs::CtLogEnumerator;
use subhawk::discovery::wordlist::WordlistEnumerator;
use subhawk::dns::ResolverClient;
use subhawk::export;
use subhawk::logger::{ScanLogger, VerbosityLevel};
use subhawk::probe::HttpProber;
use subhawk::scanner::{self, ScanCoordinator};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter_directive = match args.verbose {
        0 => "subhawk=warn",
        1 => "subhawk=info",
        _ => "subhawk=debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive)),
        )
        .with_writer(std::io::stderr)
        .init();

    if args.no_color {
        colored::control::set_override(false);
    }

    if let Err(message) = args.validate() {
        eprintln!("{} {}", "Error:".red().bold(), message);
        std::process::exit(1);
    }

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Configuration error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    let concurrency = args.effective_concurrency(&config);
    let timeout = args.effective_timeout(&config);

    let logger = ScanLogger::new(VerbosityLevel::from_verbose_count(args.verbose));
    logger.debug(&format!(
        "Config loaded: {} DoH servers, concurrency {}, timeout {:?}",
        config.dns.doh_servers.len(),
        concurrency,
        timeout
    ));
    print_banner(&args.domain, concurrency, timeout.as_secs());

    ctrlc::set_handler(|| {
        eprintln!("\nInterrupt received, finishing in-flight checks...");
        scanner::request_interrupt();
    })?;

    let resolver = Arc::new(ResolverClient::from_config(&config, timeout));

    // Candidate enumeration: CT logs first, wordlist brute-force on top.
    let mut candidates: HashSet<String> = HashSet::new();

    if config.discovery.ct_enabled && !args.no_ct {
        logger.info("Enumerating subdomains from certificate-transparency logs...");
        let ct = CtLogEnumerator::new(
            Duration::from_secs(config.discovery.ct_timeout_secs),
            &config.http.user_agent,
        );
        match ct.enumerate(&args.domain).await {
            Ok(found) => {
                logger.info(&format!("CT logs: {} subdomains", found.len()));
                candidates.extend(found);
            }
            Err(e) => warn!("CT log enumeration failed: {}", e),
        }
    }

    if let Some(wordlist_path) = &args.wordlist {
        logger.info(&format!("Brute-forcing subdomains from {}...", wordlist_path));
        let enumerator = WordlistEnumerator::new(resolver.clone(), concurrency);
        match enumerator.enumerate(wordlist_path, &args.domain).await {
            Ok(found) => {
                logger.info(&format!("Wordlist: {} live subdomains", found.len()));
                candidates.extend(found);
            }
            Err(e) => {
                logger.error(&format!("Wordlist enumeration failed: {}", e));
                std::process::exit(1);
            }
        }
    }

    if candidates.is_empty() {
        logger.error("No subdomains found. Try using a wordlist with -w.");
        return Ok(());
    }

    logger.record_total_candidates(candidates.len());
    logger.info(&format!(
        "Checking {} unique subdomains for takeover...",
        candidates.len()
    ));

    let prober = Arc::new(HttpProber::new(timeout, &config.http.user_agent));
    let checker = Arc::new(TakeoverChecker::new(resolver, prober));
    let coordinator = ScanCoordinator::new(checker, concurrency);

    logger.start_progress(candidates.len() as u64).await;
    let verdicts = coordinator.scan(&candidates, &logger).await;
    logger.finish_progress("Scan complete").await;

    if scanner::is_interrupted() {
        logger.warn(&format!(
            "Scan interrupted: {} of {} candidates checked",
            verdicts.len(),
            candidates.len()
        ));
    }

    logger.print_final_summary(&verdicts);

    if let Some(output_path) = &args.output {
        match args.output_format.as_str() {
            "csv" => export::export_csv(&verdicts, output_path)?,
            _ => export::export_json(&args.domain, &candidates, &verdicts, output_path)?,
        }
        logger.log_export_success(output_path);
    }

    Ok(())
}

fn print_banner(domain: &str, concurrency: usize, timeout_secs: u64) {
    println!("{}", "=".repeat(60).bold());
    println!("{}", "  subhawk - subdomain takeover scanner".cyan().bold());
    println!("{}", "=".repeat(60).bold());
    println!("  {} {}", "Target:".blue(), domain.bold());
    println!("  {} {}", "Concurrency:".blue(), concurrency);
    println!("  {} {}s", "Timeout:".blue(), timeout_secs);
    println!(
        "  {} {}",
        "Started:".blue(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!("{}\n", "=".repeat(60).bold());
}
