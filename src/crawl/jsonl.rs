//! JSONL crawl input — one JSON crawl record per line

use crate::error::{ProteusError, Result};
use crate::models::Crawl;
use std::path::Path;

/// Reads a JSONL file of crawl records.
///
/// Each line must hold one JSON object of the form
/// `{"request":{"method":...,"endpoint":...,"body":...,"headers":{...}},
///   "response":{"status_code":...,"technologies":[...]}}`.
pub fn read_jsonl(path: &Path) -> Result<Vec<Crawl>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ProteusError::CrawlError(format!("couldn't read {}: {e}", path.display())))?;

    let mut crawls = Vec::new();
    for (number, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let crawl: Crawl = serde_json::from_str(line).map_err(|e| {
            ProteusError::CrawlError(format!("line {} of {}: {e}", number + 1, path.display()))
        })?;
        crawls.push(crawl);
    }
    Ok(crawls)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("proteus_jsonl_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn reads_records_line_by_line() {
        let path = write_temp(
            "ok.jsonl",
            concat!(
                r#"{"request":{"method":"GET","endpoint":"http://a/","body":"","headers":{}}}"#,
                "\n",
                r#"{"request":{"method":"POST","endpoint":"http://b/","body":"q=1","headers":{"Cookie":"s=1"}},"response":{"status_code":200,"technologies":[]}}"#,
                "\n",
            ),
        );

        let crawls = read_jsonl(&path).unwrap();
        assert_eq!(crawls.len(), 2);
        assert_eq!(crawls[0].request.endpoint, "http://a/");
        assert_eq!(crawls[1].request.body, "q=1");
        assert_eq!(crawls[1].request.headers.get("Cookie").unwrap(), "s=1");
    }

    #[test]
    fn malformed_line_is_fatal() {
        let path = write_temp("bad.jsonl", "{not json}\n");
        assert!(read_jsonl(&path).is_err());
    }
}
