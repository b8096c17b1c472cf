//! Crawl-file input: JSONL crawl results and raw HTTP request files

pub mod jsonl;
pub mod raw;

pub use jsonl::read_jsonl;
pub use raw::read_raw;
