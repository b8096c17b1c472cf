//! Configuration management for the proteus scanner

use crate::error::{ProteusError, Result};
use crate::models::ScanConfig;
use serde::Deserialize;
use std::path::Path;

/// User-Agent sent when `--useragentchrome` is set
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/136.0.0.0 Safari/537.36";

/// File-based configuration structure matching proteus.toml
#[derive(Debug, Deserialize)]
struct FileConfig {
    scan: Option<ScanSection>,
    proxy: Option<ProxySection>,
    report: Option<ReportSection>,
}

#[derive(Debug, Deserialize)]
struct ScanSection {
    timeout_secs: Option<u64>,
    rate_limit: Option<f64>,
    user_agent: Option<String>,
    preceding_length: Option<usize>,
    subsequent_length: Option<usize>,
    length_limit: Option<usize>,
    csti: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ProxySection {
    url: Option<String>,
    cert_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReportSection {
    path: Option<String>,
    escape_html: Option<bool>,
}

/// Loads configuration from a TOML file and merges with defaults
pub fn load_config(path: &Path) -> Result<ScanConfig> {
    let content = std::fs::read_to_string(path).map_err(ProteusError::IoError)?;
    let file_config: FileConfig = toml::from_str(&content)?;

    let mut config = ScanConfig::default();

    if let Some(scan) = file_config.scan {
        if let Some(timeout) = scan.timeout_secs {
            config.timeout_secs = timeout;
        }
        if let Some(rate) = scan.rate_limit {
            config.rate_limit = rate;
        }
        if let Some(ua) = scan.user_agent {
            config.user_agent = ua;
        }
        if let Some(len) = scan.preceding_length {
            config.preceding_length = len;
        }
        if let Some(len) = scan.subsequent_length {
            config.subsequent_length = len;
        }
        if let Some(limit) = scan.length_limit {
            config.length_limit = limit;
        }
        if let Some(csti) = scan.csti {
            config.csti = csti;
        }
    }

    if let Some(proxy) = file_config.proxy {
        config.proxy_url = proxy.url;
        config.proxy_cert_path = proxy.cert_path;
    }

    if let Some(report) = file_config.report {
        if let Some(path) = report.path {
            config.report_path = path;
        }
        if let Some(escape) = report.escape_html {
            config.escape_report = escape;
        }
    }

    Ok(config)
}

/// Replaces `file:<path>` entries in a list with the lines of the named file.
///
/// Used for cookies, headers, parameters and URLs so that long lists can be
/// kept outside the command line.
pub fn expand_file_entries(entries: Vec<String>, what: &str) -> Result<Vec<String>> {
    let mut expanded = Vec::with_capacity(entries.len());
    for entry in entries {
        if let Some(path) = entry.strip_prefix("file:") {
            let content = std::fs::read_to_string(path).map_err(|e| {
                ProteusError::ConfigError(format!(
                    "the specified {what} file path {path} couldn't be read: {e}"
                ))
            })?;
            expanded.extend(
                content
                    .lines()
                    .map(|l| l.trim_end_matches('\r').to_string())
                    .filter(|l| !l.is_empty()),
            );
        } else {
            expanded.push(entry);
        }
    }
    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_config_merges_sections() {
        let dir = std::env::temp_dir().join("proteus_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("proteus.toml");
        std::fs::write(
            &path,
            "[scan]\ntimeout_secs = 30\nrate_limit = 5.0\n\n[report]\npath = \"out/\"\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.rate_limit, 5.0);
        assert_eq!(config.report_path, "out/");
        // untouched fields keep their defaults
        assert_eq!(config.preceding_length, 30);
    }

    #[test]
    fn expand_file_entries_inlines_lines() {
        let dir = std::env::temp_dir().join("proteus_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cookies.txt");
        std::fs::write(&path, "a=1\nb=2\n").unwrap();

        let entries = vec![
            "plain=value".to_string(),
            format!("file:{}", path.display()),
        ];
        let expanded = expand_file_entries(entries, "cookie").unwrap();
        assert_eq!(expanded, vec!["plain=value", "a=1", "b=2"]);
    }

    #[test]
    fn expand_file_entries_missing_file_is_an_error() {
        let entries = vec!["file:/nonexistent/cookies.txt".to_string()];
        assert!(expand_file_entries(entries, "cookie").is_err());
    }
}
