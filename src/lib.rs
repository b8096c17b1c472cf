//! proteus — template injection scanner
//!
//! Probes user-controllable input points of HTTP endpoints with polyglot
//! payloads, decides whether a server-side template engine processes them,
//! and identifies the engine against a fingerprint catalog. Results are
//! written as a JSONL report with full request reproductions.

pub mod browser;
pub mod config;
pub mod crawl;
pub mod error;
pub mod http;
pub mod models;
pub mod report;
pub mod scanner;
