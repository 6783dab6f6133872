pub mod checker;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod dns;
pub mod domain_utils;
pub mod export;
pub mod fingerprints;
pub mod logger;
pub mod probe;
pub mod scanner;

pub use checker::{TakeoverChecker, Verdict};
pub use scanner::ScanCoordinator;
