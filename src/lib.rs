//! IP threat intelligence pipeline.
//!
//! Two flows share this crate:
//! - enrichment: a rate-governed batch that queries AbuseIPDB and RDAP for
//!   each IP and prints one report block per address;
//! - blocking: validate an IP, resolve a Cloudflare account list by name and
//!   append the IP to it.

pub mod abuseipdb;
pub mod cloudflare;
pub mod config;
pub mod core;
pub mod enrichment;
pub mod rdap;
pub mod service;
pub mod utils;
