//! Core data models for the proteus scanner

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a user-controllable input lives on a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputLocation {
    Query,
    PostBody,
    Header,
}

impl fmt::Display for InputLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputLocation::Query => write!(f, "Query"),
            InputLocation::PostBody => write!(f, "POST"),
            InputLocation::Header => write!(f, "Header"),
        }
    }
}

impl InputLocation {
    /// Human label used in log lines ("query parameter", "POST parameter", "header")
    pub fn label(&self) -> &'static str {
        match self {
            InputLocation::Query => "query parameter",
            InputLocation::PostBody => "POST parameter",
            InputLocation::Header => "header",
        }
    }
}

/// Confidence in a reported template engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Certainty {
    None,
    Low,
    Medium,
    High,
}

impl fmt::Display for Certainty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Certainty::None => write!(f, "None"),
            Certainty::Low => write!(f, "Low"),
            Certainty::Medium => write!(f, "Medium"),
            Certainty::High => write!(f, "High"),
        }
    }
}

/// Whether a reflection was found in the response body or in a header value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReflectionKind {
    Body,
    Header,
}

/// A place where injected input reappears in a response.
///
/// `preceding`/`subsequent` are the context windows captured around the
/// probe nonce; they anchor later fragment extraction from responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reflection {
    pub kind: ReflectionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_name: Option<String>,
    /// Set when the reflection was found on a different URL than the one
    /// being scanned; that URL is re-fetched during classification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reflection_url: Option<String>,
    pub preceding: String,
    pub subsequent: String,
}

/// One crawled request record, as read from a JSONL or raw crawl file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Crawl {
    pub request: CrawlRequest,
    #[serde(default)]
    pub response: CrawlResponse,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlRequest {
    #[serde(default)]
    pub method: String,
    pub endpoint: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub headers: std::collections::BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlResponse {
    #[serde(default)]
    pub status_code: u16,
    #[serde(default)]
    pub technologies: Vec<String>,
}

/// Configuration for a scan session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum requests per second (0 = unlimited)
    pub rate_limit: f64,
    /// Context window captured before a body reflection point
    pub preceding_length: usize,
    /// Context window captured after a body reflection point
    pub subsequent_length: usize,
    /// Maximum payload length; longer polyglots are skipped (0 = unlimited)
    pub length_limit: usize,
    /// Raw form body; its presence switches requests to POST
    pub data: String,
    /// User-Agent header value
    pub user_agent: String,
    /// HTTP/HTTPS proxy URL
    pub proxy_url: Option<String>,
    /// PEM certificate of an intercepting proxy
    pub proxy_cert_path: Option<String>,
    /// Directory prefix for the JSONL report; empty disables reporting
    pub report_path: String,
    /// Escape HTML special characters in the JSON report
    pub escape_report: bool,
    /// Custom cookies ("name=value")
    pub cookies: Vec<String>,
    /// Custom headers ("Name: value")
    pub headers: Vec<String>,
    /// Custom query parameters ("name=value")
    pub parameters: Vec<String>,
    /// URLs to scan
    pub urls: Vec<String>,
    /// Extra URLs checked for reflections of injected input
    pub reflection_urls: Vec<String>,
    /// Restrict header scanning to these header names
    pub test_headers: Vec<String>,
    /// Crawl records to scan (jsonl/raw modes)
    #[serde(skip)]
    pub crawls: Vec<Crawl>,
    /// Use http:// for endpoints built from raw crawl files
    pub plain_http: bool,
    /// Scan for client-side template injection with a headless browser
    pub csti: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            rate_limit: 0.0,
            preceding_length: 30,
            subsequent_length: 30,
            length_limit: 0,
            data: String::new(),
            user_agent: format!("proteus {}", env!("CARGO_PKG_VERSION")),
            proxy_url: None,
            proxy_cert_path: None,
            report_path: String::new(),
            escape_report: false,
            cookies: Vec::new(),
            headers: Vec::new(),
            parameters: Vec::new(),
            urls: Vec::new(),
            reflection_urls: Vec::new(),
            test_headers: Vec::new(),
            crawls: Vec::new(),
            plain_http: false,
            csti: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_labels() {
        assert_eq!(InputLocation::Query.to_string(), "Query");
        assert_eq!(InputLocation::PostBody.to_string(), "POST");
        assert_eq!(InputLocation::Header.label(), "header");
    }

    #[test]
    fn certainty_ordering() {
        assert!(Certainty::High > Certainty::Medium);
        assert!(Certainty::Medium > Certainty::Low);
        assert!(Certainty::Low > Certainty::None);
    }

    #[test]
    fn crawl_deserializes_minimal_record() {
        let line = r#"{"request":{"method":"POST","endpoint":"http://127.0.0.1/x","body":"name=a","headers":{"Content-Type":"application/x-www-form-urlencoded"}},"response":{"status_code":200,"technologies":["Nginx:1.23.3"]}}"#;
        let crawl: Crawl = serde_json::from_str(line).unwrap();
        assert_eq!(crawl.request.endpoint, "http://127.0.0.1/x");
        assert_eq!(crawl.response.status_code, 200);
    }
}
