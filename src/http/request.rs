//! Request construction and mutation.
//!
//! A [`RequestSpec`] is an owned, inspectable description of an HTTP request.
//! The scanner mutates specs to place payloads into query parameters, form
//! bodies or headers, and serializes them for the report (raw dump and curl
//! reproduction) before handing them to the client.

use crate::error::Result;
use crate::models::ScanConfig;
use reqwest::Method;
use tracing::debug;
use url::Url;

/// An HTTP request the scanner is about to send
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub url: Url,
    /// Ordered header list; later entries with the same name replace earlier ones
    pub headers: Vec<(String, String)>,
    /// Overrides the Host header independently of the URL
    pub host_override: Option<String>,
    pub body: Option<String>,
}

impl RequestSpec {
    /// Builds the request for a target URL from the scan configuration.
    ///
    /// A non-empty `data` setting turns the request into a form POST;
    /// configured headers and query parameters are applied on top, with
    /// overrides logged.
    pub fn build(u: &str, config: &ScanConfig) -> Result<Self> {
        let url = Url::parse(u)?;
        let mut spec = if config.data.is_empty() {
            Self {
                method: Method::GET,
                url,
                headers: Vec::new(),
                host_override: None,
                body: None,
            }
        } else {
            Self {
                method: Method::POST,
                url,
                headers: vec![(
                    "Content-Type".to_string(),
                    "application/x-www-form-urlencoded".to_string(),
                )],
                host_override: None,
                body: Some(config.data.clone()),
            }
        };

        spec.headers
            .push(("User-Agent".to_string(), config.user_agent.clone()));

        for h in &config.headers {
            let Some((name, value)) = h.split_once(':') else {
                debug!("Could not split {h} into header name and value");
                continue;
            };
            let (name, value) = (name.trim(), value.trim());
            if name.eq_ignore_ascii_case("Host") {
                debug!(
                    "Overwriting Host:{} with Host:{value}",
                    spec.url.host_str().unwrap_or("")
                );
                spec.host_override = Some(value.to_string());
            } else {
                if let Some(old) = spec.header_value(name) {
                    debug!("Overwriting {name}:{old} with {value}");
                }
                spec.replace_header(name, value);
            }
        }

        for p in &config.parameters {
            let Some((name, value)) = p.split_once('=') else {
                debug!("Could not split {p} into parameter name and value");
                continue;
            };
            if let Some(old) = spec.query_value(name) {
                debug!("Overwriting {name}={old} with {value}");
            }
            spec.set_query(name, value);
        }

        Ok(spec)
    }

    /// Returns the current value of a header, if set
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn query_value(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    /// Sets or replaces a query parameter, keeping the other pairs
    pub fn set_query(&mut self, key: &str, payload: &str) {
        let mut pairs: Vec<(String, String)> = self
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        match pairs.iter().position(|(k, _)| k == key) {
            Some(i) => pairs[i].1 = payload.to_string(),
            None => pairs.push((key.to_string(), payload.to_string())),
        }
        self.url.query_pairs_mut().clear();
        {
            let mut serializer = self.url.query_pairs_mut();
            for (k, v) in &pairs {
                serializer.append_pair(k, v);
            }
        }
    }

    /// Rebuilds the form body with `payload` at `key`, preserving the other
    /// pairs in their original order. Switches the request to POST.
    pub fn set_post(&mut self, key: &str, payload: &str, post_params: &[(String, String)]) {
        let body = post_params
            .iter()
            .map(|(k, v)| {
                if k == key {
                    format!("{k}={}", urlencoding::encode(payload))
                } else {
                    format!("{k}={v}")
                }
            })
            .collect::<Vec<_>>()
            .join("&");
        self.method = Method::POST;
        self.replace_header("Content-Type", "application/x-www-form-urlencoded");
        self.body = Some(body);
    }

    /// Sets or replaces a header. The Host header gets `.com` appended so the
    /// value still resolves as a registrable name when servers or
    /// intermediaries try to look it up.
    pub fn set_header(&mut self, key: &str, payload: &str) {
        if key.eq_ignore_ascii_case("Host") {
            self.host_override = Some(format!("{payload}.com"));
        } else {
            self.replace_header(key, payload);
        }
    }

    fn replace_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some(i) => self.headers[i].1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Effective Host header value
    pub fn host(&self) -> String {
        match &self.host_override {
            Some(host) => host.clone(),
            None => {
                let host = self.url.host_str().unwrap_or_default();
                match self.url.port() {
                    Some(port) => format!("{host}:{port}"),
                    None => host.to_string(),
                }
            }
        }
    }

    /// Raw HTTP/1.1 text of this request, for the report
    pub fn dump(&self) -> String {
        let mut path = self.url.path().to_string();
        if let Some(query) = self.url.query() {
            path.push('?');
            path.push_str(query);
        }
        let mut out = format!("{} {} HTTP/1.1\r\n", self.method, path);
        out.push_str(&format!("Host: {}\r\n", self.host()));
        for (name, value) in &self.headers {
            out.push_str(&format!("{name}: {value}\r\n"));
        }
        if let Some(body) = &self.body {
            out.push_str(&format!("Content-Length: {}\r\n", body.len()));
            out.push_str("\r\n");
            out.push_str(body);
        } else {
            out.push_str("\r\n");
        }
        out
    }

    /// curl command that reproduces this request
    pub fn to_curl(&self) -> String {
        let mut cmd = String::from("curl");
        if self.method != Method::GET {
            cmd.push_str(&format!(" -X {}", self.method));
        }
        if self.host_override.is_some() {
            cmd.push_str(&format!(" -H 'Host: {}'", self.host()));
        }
        for (name, value) in &self.headers {
            cmd.push_str(&format!(" -H '{name}: {}'", value.replace('\'', "'\\''")));
        }
        if let Some(body) = &self.body {
            cmd.push_str(&format!(" -d '{}'", body.replace('\'', "'\\''")));
        }
        cmd.push_str(&format!(" '{}'", self.url));
        cmd
    }
}

/// Splits a raw `a=1&b=2` form body into ordered pairs
pub fn parse_form_body(data: &str) -> Vec<(String, String)> {
    let mut params = Vec::new();
    for p in data.split('&') {
        if p.is_empty() {
            continue;
        }
        match p.split_once('=') {
            Some((k, v)) => params.push((k.to_string(), v.to_string())),
            None => debug!("{p} cannot be split by ="),
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(u: &str) -> RequestSpec {
        RequestSpec::build(u, &ScanConfig::default()).unwrap()
    }

    #[test]
    fn build_defaults_to_get() {
        let spec = spec("http://example.com/page?a=1");
        assert_eq!(spec.method, Method::GET);
        assert!(spec.body.is_none());
        assert_eq!(spec.header_value("User-Agent").unwrap(), ScanConfig::default().user_agent);
    }

    #[test]
    fn build_with_data_is_a_form_post() {
        let config = ScanConfig {
            data: "name=a&x=1".to_string(),
            ..ScanConfig::default()
        };
        let spec = RequestSpec::build("http://example.com/", &config).unwrap();
        assert_eq!(spec.method, Method::POST);
        assert_eq!(
            spec.header_value("Content-Type").unwrap(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(spec.body.as_deref(), Some("name=a&x=1"));
    }

    #[test]
    fn set_query_replaces_and_encodes() {
        let mut spec = spec("http://example.com/page?a=1&b=2");
        spec.set_query("a", "{{7*7}}");
        let query = spec.url.query().unwrap();
        assert!(query.contains("b=2"));
        assert!(query.contains("a=%7B%7B7*7%7D%7D"));
    }

    #[test]
    fn set_post_preserves_other_pairs_in_order() {
        let params = vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
            ("c".to_string(), "3".to_string()),
        ];
        let mut spec = spec("http://example.com/");
        spec.set_post("b", "<%=1%>", &params);
        assert_eq!(spec.body.as_deref(), Some("a=1&b=%3C%25%3D1%25%3E&c=3"));
        assert_eq!(spec.method, Method::POST);
    }

    #[test]
    fn set_header_host_appends_com() {
        let mut spec = spec("http://example.com/");
        spec.set_header("Host", "PAYLOAD");
        assert_eq!(spec.host(), "PAYLOAD.com");

        spec.set_header("X-Forwarded-For", "PAYLOAD");
        assert_eq!(spec.header_value("X-Forwarded-For"), Some("PAYLOAD"));
    }

    #[test]
    fn dump_contains_request_line_and_body() {
        let params = vec![("name".to_string(), "a".to_string())];
        let mut spec = spec("http://example.com/submit");
        spec.set_post("name", "x", &params);
        let dump = spec.dump();
        assert!(dump.starts_with("POST /submit HTTP/1.1\r\n"));
        assert!(dump.contains("Host: example.com\r\n"));
        assert!(dump.ends_with("\r\nname=x"));
    }

    #[test]
    fn parse_form_body_keeps_order() {
        let params = parse_form_body("z=9&a=1&malformed&m=2");
        assert_eq!(
            params,
            vec![
                ("z".to_string(), "9".to_string()),
                ("a".to_string(), "1".to_string()),
                ("m".to_string(), "2".to_string()),
            ]
        );
    }
}
