//! Scan report records and the JSONL writer

pub mod jsonl;

pub use jsonl::JsonlReport;

use crate::models::{Certainty, Reflection, ScanConfig};
use serde::{Deserialize, Serialize};

/// One polyglot request with the classifier's conclusion and reproduction data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    pub conclusion: String,
    pub polyglot: String,
    pub error: String,
    pub curl_command: String,
    pub request: String,
    pub response: String,
}

/// Scan result for a single input point (query parameter, POST parameter or header)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterReport {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub default_values: Vec<String>,
    #[serde(rename = "isParameterVulnerable")]
    pub is_vulnerable: bool,
    pub certainty: Certainty,
    #[serde(rename = "identifiedEngine")]
    pub template_engine: String,
    pub error_messages: Vec<String>,
    pub reflections: Vec<Reflection>,
    #[serde(rename = "areErrorsShown")]
    pub errors_visible: bool,
    pub requests: Vec<RequestRecord>,
}

impl Default for ParameterReport {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: String::new(),
            default_values: Vec::new(),
            is_vulnerable: false,
            certainty: Certainty::None,
            template_engine: String::new(),
            error_messages: Vec::new(),
            reflections: Vec::new(),
            errors_visible: false,
            requests: Vec::new(),
        }
    }
}

/// The unmodified baseline exchange for a URL
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineRecord {
    pub status_code: u16,
    pub request: String,
    pub response: String,
}

/// Scan result for one URL
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReport {
    pub id: usize,
    pub url: String,
    #[serde(rename = "isWebpageVulnerable")]
    pub is_vulnerable: bool,
    pub certainty: Certainty,
    pub error_messages: Vec<String>,
    #[serde(rename = "default")]
    pub baseline: BaselineRecord,
    pub parameters: Vec<ParameterReport>,
}

impl PageReport {
    pub fn new(id: usize, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            is_vulnerable: false,
            certainty: Certainty::None,
            error_messages: Vec::new(),
            baseline: BaselineRecord::default(),
            parameters: Vec::new(),
        }
    }
}

/// Scan summary; written as the first line of the JSONL report and rewritten
/// with the final counts when the scan ends
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub name: String,
    pub version: String,
    pub scan_id: String,
    #[serde(rename = "suspectedVulnerableURLs")]
    pub suspected_vulnerable_urls: usize,
    #[serde(rename = "suspectedTemplateInjections")]
    pub suspected_injections: usize,
    #[serde(rename = "highCertainty")]
    pub high: usize,
    #[serde(rename = "mediumCertainty")]
    pub medium: usize,
    #[serde(rename = "lowCertainty")]
    pub low: usize,
    pub error_messages: Vec<String>,
    pub date: String,
    pub duration: String,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<ScanConfig>,
}

impl ScanReport {
    pub fn new(date: impl Into<String>, command: impl Into<String>, config: &ScanConfig) -> Self {
        Self {
            name: "Template_Injection_Scanner".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            scan_id: uuid::Uuid::new_v4().to_string(),
            suspected_vulnerable_urls: 0,
            suspected_injections: 0,
            high: 0,
            medium: 0,
            low: 0,
            error_messages: Vec::new(),
            date: date.into(),
            duration: "Not finished yet".to_string(),
            command: command.into(),
            config: Some(config.clone()),
        }
    }

    /// Counts one reported parameter certainty into the summary
    pub fn count_certainty(&mut self, certainty: Certainty) {
        match certainty {
            Certainty::High => self.high += 1,
            Certainty::Medium => self.medium += 1,
            Certainty::Low => self.low += 1,
            Certainty::None => return,
        }
        self.suspected_injections += 1;
    }
}
