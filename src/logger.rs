use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

use crate::checker::Verdict;

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub enum VerbosityLevel {
    Silent = 0,   // Only show progress bar and final summary
    Summary = 1,  // High-level scan progress (default)
    Detailed = 2, // Detailed steps, results, warnings
    Debug = 3,    // All messages including debug info
}

impl VerbosityLevel {
    pub fn from_verbose_count(count: u8) -> Self {
        match count {
            0 => VerbosityLevel::Summary,
            1 => VerbosityLevel::Detailed,
            2.. => VerbosityLevel::Debug,
        }
    }
}

#[derive(Clone)]
pub struct ScanLogger {
    verbosity: VerbosityLevel,
    progress_bar: Arc<RwLock<Option<ProgressBar>>>,
    scan_metadata: Arc<Mutex<ScanMetadata>>,
}

#[derive(Default, Clone)]
struct ScanMetadata {
    start_time: Option<SystemTime>,
    end_time: Option<SystemTime>,
    total_candidates: usize,
    vulnerable_count: usize,
    output_file: String,
}

impl ScanLogger {
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            progress_bar: Arc::new(RwLock::new(None)),
            scan_metadata: Arc::new(Mutex::new(ScanMetadata::default())),
        }
    }

    pub fn info(&self, message: &str) {
        if self.verbosity >= VerbosityLevel::Summary {
            self.print_message("INFO", message);
        }
    }

    pub fn warn(&self, message: &str) {
        if self.verbosity >= VerbosityLevel::Detailed {
            self.print_message("WARN", message);
        }
    }

    pub fn error(&self, message: &str) {
        // Errors are always shown regardless of verbosity.
        self.print_message("ERROR", message);
    }

    pub fn debug(&self, message: &str) {
        if self.verbosity >= VerbosityLevel::Debug {
            self.print_message("DEBUG", message);
        }
    }

    /// High-severity notification for a confirmed takeover candidate.
    /// Always shown.
    pub fn vuln(&self, message: &str) {
        self.print_message("VULN", message);
    }

    fn print_message(&self, level: &str, message: &str) {
        let timestamp = self.get_timestamp();
        let level_colored = match level {
            "VULN" => level.red().bold().to_string(),
            "ERROR" => level.red().to_string(),
            "WARN" => level.yellow().to_string(),
            "DEBUG" => level.dimmed().to_string(),
            _ => level.blue().to_string(),
        };
        let msg = format!("[{}] {}: {}", timestamp, level_colored, message);

        // Route through an active progress bar to avoid clobbering it.
        if let Ok(guard) = self.progress_bar.try_read() {
            if let Some(pb) = guard.as_ref() {
                pb.println(msg);
                return;
            }
        }

        eprintln!("{}", msg);
    }

    fn get_timestamp(&self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let secs = now.as_secs();
        let millis = now.subsec_millis();

        let hours = (secs / 3600) % 24;
        let minutes = (secs % 3600) / 60;
        let seconds = secs % 60;

        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
    }

    // Progress bar management

    pub async fn start_progress(&self, total_steps: u64) {
        let pb = ProgressBar::new(total_steps);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        pb.set_message("Checking candidates...");

        let mut progress_guard = self.progress_bar.write().await;
        *progress_guard = Some(pb);

        let mut metadata = self.scan_metadata.lock().unwrap();
        metadata.start_time = Some(SystemTime::now());
    }

    /// Non-async progress increment, callable from stream combinators.
    pub fn advance_progress_sync(&self, steps: u64) {
        if let Ok(guard) = self.progress_bar.try_read() {
            if let Some(pb) = guard.as_ref() {
                pb.inc(steps);
            }
        }
    }

    pub async fn finish_progress(&self, final_message: &str) {
        let mut progress_guard = self.progress_bar.write().await;
        if let Some(pb) = progress_guard.take() {
            pb.finish_and_clear();
        }

        let mut metadata = self.scan_metadata.lock().unwrap();
        metadata.end_time = Some(SystemTime::now());
        drop(metadata);

        if self.verbosity >= VerbosityLevel::Summary {
            self.print_message("INFO", final_message);
        }
    }

    // Metadata recording

    pub fn record_total_candidates(&self, count: usize) {
        let mut metadata = self.scan_metadata.lock().unwrap();
        metadata.total_candidates = count;
    }

    pub fn record_output_file(&self, path: &str) {
        let mut metadata = self.scan_metadata.lock().unwrap();
        metadata.output_file = path.to_string();
    }

    pub fn log_export_success(&self, path: &str) {
        self.record_output_file(path);
        self.info(&format!("Results saved to {}", path));
    }

    /// Print the scan summary with every vulnerable verdict and its
    /// evidence. Always printed regardless of verbosity.
    pub fn print_final_summary(&self, verdicts: &[Verdict]) {
        let vulnerable: Vec<&Verdict> = verdicts.iter().filter(|v| v.vulnerable).collect();
        {
            let mut metadata = self.scan_metadata.lock().unwrap();
            metadata.vulnerable_count = vulnerable.len();
        }
        let metadata = self.scan_metadata.lock().unwrap();

        // Clear any remaining progress bar artifacts.
        print!("\x1b[2K\r");
        io::stdout().flush().ok();

        println!("\n{}", "=".repeat(60).bold());
        println!("{}", "SCAN SUMMARY".magenta().bold());
        println!("{}\n", "=".repeat(60).bold());

        if let (Some(start), Some(end)) = (metadata.start_time, metadata.end_time) {
            let duration = end.duration_since(start).unwrap_or_default();
            println!("Scan Duration: {:.2}s", duration.as_secs_f64());
        }
        println!(
            "{} {}",
            "Total Subdomains Scanned:".cyan(),
            metadata.total_candidates
        );
        println!(
            "{} {}\n",
            "Vulnerable Subdomains:".red().bold(),
            metadata.vulnerable_count
        );

        if vulnerable.is_empty() {
            println!("{}\n", "No vulnerable subdomains found!".green());
        } else {
            println!("{}\n", "VULNERABLE SUBDOMAINS:".red().bold());
            for verdict in &vulnerable {
                println!("{} {}", "[!]".red(), verdict.subdomain.bold());
                println!(
                    "    {} {}",
                    "Service:".yellow(),
                    verdict.service.as_deref().unwrap_or("unknown")
                );
                println!("    {} {}", "CNAME:".yellow(), verdict.cname.join(", "));
                for evidence in &verdict.evidence {
                    println!("    {} {}", "└─".blue(), evidence);
                }
                println!();
            }
        }

        if !metadata.output_file.is_empty() {
            println!("Results Exported: {}\n", metadata.output_file);
        }
    }
}
