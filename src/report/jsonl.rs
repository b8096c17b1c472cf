//! JSONL report writer — summary header line, then one line per scanned URL

use crate::error::{ProteusError, Result};
use crate::report::{PageReport, ScanReport};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// An open JSONL report on disk.
///
/// The first line is the scan summary; it is rewritten with final counts and
/// duration once the scan ends. Every scanned URL appends one line.
pub struct JsonlReport {
    path: PathBuf,
    escape_html: bool,
}

impl JsonlReport {
    /// Creates the report file and writes the provisional summary line
    pub fn create(path_prefix: &str, date: &str, report: &ScanReport, escape_html: bool) -> Result<Self> {
        let path = PathBuf::from(format!("{path_prefix}{date}_Report.jsonl"));
        let line = encode(report, escape_html)?;
        std::fs::write(&path, line + "\n")?;
        info!("Exported report {}", path.display());
        Ok(Self { path, escape_html })
    }

    /// Appends one URL's results to the report
    pub fn append_page(&self, page: &PageReport) -> Result<()> {
        let line = encode(page, self.escape_html)?;
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "{line}")?;
        info!("Successfully appended to {}", self.path.display());
        Ok(())
    }

    /// Rewrites the summary line with the finished report
    pub fn finalize(&self, report: &ScanReport) -> Result<()> {
        let content = std::fs::read_to_string(&self.path)?;
        let rest = match content.split_once('\n') {
            Some((_, rest)) => rest,
            None => "",
        };
        let line = encode(report, self.escape_html)?;

        // Write to a sibling temp file first so a crash can't truncate the report
        let temp_path = self.path.with_extension("jsonl.temp");
        std::fs::write(&temp_path, format!("{line}\n{rest}"))?;
        std::fs::rename(&temp_path, &self.path)
            .map_err(|e| ProteusError::ReportError(format!("couldn't finish report: {e}")))?;
        info!("Finished report {}", self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

/// Serializes a record to a single JSON line, optionally escaping HTML
/// special characters the way browsers expect embedded JSON to be escaped
fn encode<T: Serialize>(value: &T, escape_html: bool) -> Result<String> {
    let mut line = serde_json::to_string(value)?;
    if escape_html {
        line = line
            .replace('&', "\\u0026")
            .replace('<', "\\u003c")
            .replace('>', "\\u003e");
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScanConfig;

    fn temp_prefix(name: &str) -> String {
        let dir = std::env::temp_dir().join("proteus_report_test");
        std::fs::create_dir_all(&dir).unwrap();
        format!("{}/{name}_", dir.display())
    }

    #[test]
    fn summary_line_is_rewritten_on_finalize() {
        let config = ScanConfig::default();
        let mut summary = ScanReport::new("2026-01-01_00-00-00", "proteus url -u http://x", &config);
        let prefix = temp_prefix("finalize");
        let report = JsonlReport::create(&prefix, "2026-01-01_00-00-00", &summary, false).unwrap();

        report.append_page(&PageReport::new(0, "http://x/")).unwrap();
        report.append_page(&PageReport::new(1, "http://y/")).unwrap();

        summary.duration = "12.5s".to_string();
        summary.high = 1;
        report.finalize(&summary).unwrap();

        let content = std::fs::read_to_string(report.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("\"duration\":\"12.5s\""));
        assert!(lines[0].contains("\"highCertainty\":1"));
        assert!(lines[1].contains("http://x/"));
        assert!(lines[2].contains("http://y/"));
    }

    #[test]
    fn html_escaping_is_optional() {
        let config = ScanConfig::default();
        let summary = ScanReport::new("d", "proteus url -u 'http://x/?q=<b>'", &config);
        let prefix = temp_prefix("escape");
        let report = JsonlReport::create(&prefix, "d", &summary, true).unwrap();
        let content = std::fs::read_to_string(report.path()).unwrap();
        assert!(content.contains("\\u003cb\\u003e"));
        assert!(!content.lines().next().unwrap().contains("<b>"));
    }
}
