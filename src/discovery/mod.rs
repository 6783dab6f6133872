//! Subdomain candidate enumeration sources.

pub mod ct_logs;
pub mod wordlist;
