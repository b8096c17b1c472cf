//! HTTP client wrapper with rate limiting and request counting

use crate::error::{ProteusError, Result};
use crate::http::request::RequestSpec;
use crate::models::ScanConfig;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderName, HeaderValue, HOST};
use reqwest::Client;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// A response, read to completion
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: reqwest::header::HeaderMap,
    pub body: String,
    /// Raw HTTP text of the response, for the report
    pub dump: String,
}

/// HTTP client wrapper shared by the whole scan.
///
/// All outbound requests pass through a global token bucket (burst 1) so the
/// configured request rate holds across every phase of the scan.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    cookie_jar: Arc<Jar>,
    limiter: Option<Arc<DirectRateLimiter>>,
    request_count: Arc<AtomicU64>,
}

impl HttpClient {
    /// Creates a new HttpClient from scan configuration
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        let cookie_jar = Arc::new(Jar::default());
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .cookie_provider(Arc::clone(&cookie_jar))
            // Targets with broken certificates are still worth scanning
            .danger_accept_invalid_certs(true);

        if let Some(ref proxy_url) = config.proxy_url {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| ProteusError::ConfigError(format!("Invalid proxy URL: {e}")))?;
            builder = builder.proxy(proxy);

            if let Some(ref cert_path) = config.proxy_cert_path {
                let pem = std::fs::read(cert_path).map_err(|e| {
                    ProteusError::ConfigError(format!(
                        "Couldn't read proxy certificate {cert_path}: {e}"
                    ))
                })?;
                let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                    ProteusError::ConfigError(format!("Invalid proxy certificate: {e}"))
                })?;
                builder = builder.add_root_certificate(cert);
            }
        }

        let client = builder.build()?;

        let limiter = if config.rate_limit > 0.0 {
            let period = Duration::from_secs_f64(1.0 / config.rate_limit);
            let quota = Quota::with_period(period)
                .unwrap_or_else(|| Quota::per_second(nonzero!(1u32)))
                .allow_burst(nonzero!(1u32));
            Some(Arc::new(RateLimiter::direct(quota)))
        } else {
            None
        };

        Ok(Self {
            client,
            cookie_jar,
            limiter,
            request_count: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Stores `name=value` cookies for a target URL
    pub fn add_cookies(&self, url: &Url, cookies: &[String]) {
        for cookie in cookies {
            let cookie = cookie.trim_end_matches('\r').trim();
            if cookie.is_empty() {
                continue;
            }
            if !cookie.contains('=') {
                debug!("Specified cookie {cookie} doesn't contain a = and will be skipped");
                continue;
            }
            self.cookie_jar.add_cookie_str(cookie, url);
        }
    }

    /// Returns the total number of requests made
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Sends a request spec and reads the whole response.
    ///
    /// Waiting on the rate limiter is the only suspension point besides the
    /// network itself.
    pub async fn execute(&self, spec: &RequestSpec) -> Result<HttpResponse> {
        if let Some(ref limiter) = self.limiter {
            limiter.until_ready().await;
        }
        self.request_count.fetch_add(1, Ordering::Relaxed);

        let mut req = self.client.request(spec.method.clone(), spec.url.clone());
        if let Some(host) = &spec.host_override {
            let value = HeaderValue::from_str(host)
                .map_err(|e| ProteusError::ScanError(format!("Invalid Host value: {e}")))?;
            req = req.header(HOST, value);
        }
        for (name, value) in &spec.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ProteusError::ScanError(format!("Invalid header name {name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ProteusError::ScanError(format!("Invalid header value: {e}")))?;
            req = req.header(name, value);
        }
        if let Some(body) = &spec.body {
            req = req.body(body.clone());
        }

        let response = req.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let version = response.version();
        let body = response.text().await?;

        let mut dump = format!("{version:?} {status}\r\n");
        for (name, value) in &headers {
            dump.push_str(&format!("{name}: {}\r\n", value.to_str().unwrap_or("")));
        }
        dump.push_str("\r\n");
        dump.push_str(&body);

        Ok(HttpResponse {
            status,
            headers,
            body,
            dump,
        })
    }
}
