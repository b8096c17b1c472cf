//! Raw HTTP request files — a captured request as sent on the wire

use crate::error::{ProteusError, Result};
use crate::models::Crawl;
use std::path::Path;

/// Reads a raw HTTP request file into a crawl record.
///
/// The file starts with a request line ("METHOD PATH HTTP/VER"), followed by
/// headers, a blank line and an optional body. The `Host` header plus
/// `plain_http` determine the endpoint scheme and host.
pub fn read_raw(path: &Path, plain_http: bool) -> Result<Vec<Crawl>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ProteusError::CrawlError(format!("couldn't read {}: {e}", path.display())))?;

    let mut crawl = Crawl::default();
    let mut request_path = String::new();
    let mut host = String::new();
    let mut body = String::new();
    let mut in_body = false;

    for (index, line) in content.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if index == 0 {
            let mut parts = line.split(' ');
            match (parts.next(), parts.next()) {
                (Some(method), Some(path)) => {
                    crawl.request.method = method.to_string();
                    request_path = path.to_string();
                }
                _ => {
                    return Err(ProteusError::CrawlError(
                        "the first line of the raw file is malformed".to_string(),
                    ));
                }
            }
        } else if in_body {
            body.push_str(line);
        } else if line.is_empty() {
            in_body = true;
        } else if let Some(value) = line.strip_prefix("Host: ") {
            host = value.to_string();
        } else if let Some((name, value)) = line.split_once(':') {
            crawl
                .request
                .headers
                .insert(name.to_string(), value.trim_start().to_string());
        }
    }

    if host.is_empty() {
        return Err(ProteusError::CrawlError(
            "the raw file contains no Host header".to_string(),
        ));
    }

    let scheme = if plain_http { "http" } else { "https" };
    crawl.request.endpoint = format!("{scheme}://{host}{request_path}");
    crawl.request.body = body;
    Ok(vec![crawl])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("proteus_raw_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn parses_request_line_headers_and_body() {
        let path = write_temp(
            "req.txt",
            "POST /search?q=1 HTTP/1.1\r\n\
             Host: testsite.example\r\n\
             Accept: text/html\r\n\
             Content-Type: application/x-www-form-urlencoded\r\n\
             \r\n\
             name=value\r\n",
        );

        let crawls = read_raw(&path, false).unwrap();
        assert_eq!(crawls.len(), 1);
        let crawl = &crawls[0];
        assert_eq!(crawl.request.method, "POST");
        assert_eq!(crawl.request.endpoint, "https://testsite.example/search?q=1");
        assert_eq!(crawl.request.body, "name=value");
        assert_eq!(crawl.request.headers.get("Accept").unwrap(), "text/html");
        // Host goes into the endpoint, not the header map
        assert!(!crawl.request.headers.contains_key("Host"));
    }

    #[test]
    fn plain_http_flag_selects_scheme() {
        let path = write_temp("get.txt", "GET / HTTP/1.1\nHost: testsite.example\n\n");
        let crawls = read_raw(&path, true).unwrap();
        assert_eq!(crawls[0].request.endpoint, "http://testsite.example/");
    }

    #[test]
    fn missing_request_target_is_fatal() {
        let path = write_temp("bad.txt", "GARBAGE\nHost: x\n\n");
        assert!(read_raw(&path, false).is_err());
    }
}
