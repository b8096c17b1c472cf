//! Scan orchestration: walks every user-controllable input point of each
//! target URL and runs the detection and identification engine on it.

pub mod analyzer;
pub mod catalog;
pub mod matching;
pub mod reflection;
pub mod state;

pub use analyzer::{Indicator, InputAnalysis, UNKNOWN_ENGINE};

use crate::browser::Renderer;
use crate::error::Result;
use crate::http::request::parse_form_body;
use crate::http::{HttpClient, RequestSpec};
use crate::models::{Certainty, Crawl, InputLocation, ScanConfig};
use crate::report::{BaselineRecord, JsonlReport, PageReport, ParameterReport, ScanReport};
use chrono::Local;
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

/// Header value used when a probe header is added to requests that did not
/// carry it
const ADDED_HEADER_MARKER: &str = "added-by-proteus";

/// Headers that are very unlikely to be embedded into a template
const SKIPPED_HEADERS: &[&str] = &["Content-Type", "User-Agent"];

/// Headers that are likely embedded into a template; added when absent
const EXTRA_HEADERS: &[&str] = &["X-Forwarded-For", "Origin"];

/// Result of a whole scan: the summary plus every per-URL report
pub struct ScanOutcome {
    pub summary: ScanReport,
    pub pages: Vec<PageReport>,
}

/// Template injection scanner over a set of target URLs
pub struct Scanner {
    config: ScanConfig,
    renderer: Option<Box<dyn Renderer>>,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            renderer: None,
        }
    }

    /// Attaches a headless renderer for client-side template injection checks
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Scans every configured URL or crawl record
    pub async fn run(&self) -> Result<ScanOutcome> {
        let date = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        info!("proteus {} started at {date}", env!("CARGO_PKG_VERSION"));
        let start = Instant::now();

        let command = std::env::args().collect::<Vec<_>>().join(" ");
        let mut summary = ScanReport::new(date.clone(), command, &self.config);
        let report_file = if self.config.report_path.is_empty() {
            None
        } else {
            Some(JsonlReport::create(
                &self.config.report_path,
                &date,
                &summary,
                self.config.escape_report,
            )?)
        };

        let client = HttpClient::from_config(&self.config)?;

        let targets: Vec<(String, Option<Crawl>)> = if self.config.crawls.is_empty() {
            self.config.urls.iter().map(|u| (u.clone(), None)).collect()
        } else {
            self.config
                .crawls
                .iter()
                .map(|c| (c.request.endpoint.clone(), Some(c.clone())))
                .collect()
        };

        let mut inputs_analyzed = 0u64;
        let mut polyglots_sent = 0u64;
        let mut pages = Vec::with_capacity(targets.len());

        for (index, (url, crawl)) in targets.iter().enumerate() {
            info!("Analyzing URL ({}/{}): {url}", index + 1, targets.len());
            let page = self
                .scan_url(
                    &client,
                    index,
                    url,
                    crawl.as_ref(),
                    &mut summary,
                    &mut inputs_analyzed,
                    &mut polyglots_sent,
                )
                .await;
            if page.is_vulnerable {
                summary.suspected_vulnerable_urls += 1;
            }
            if let Some(report_file) = &report_file {
                report_file.append_page(&page)?;
            }
            pages.push(page);
        }

        info!("Successfully finished the scan");
        info!(
            "Suspected vulnerable URLs: {}",
            summary.suspected_vulnerable_urls
        );
        info!(
            "Suspected template injections: {} ({} High, {} Medium, {} Low certainty)",
            summary.suspected_injections, summary.high, summary.medium, summary.low
        );
        let duration = start.elapsed();
        summary.duration = format!("{:.2?}", duration);
        info!("Duration: {}", summary.duration);
        if inputs_analyzed > 0 {
            info!(
                "Average polyglots sent per user input: {:.2}",
                polyglots_sent as f64 / inputs_analyzed as f64
            );
        }

        if let Some(report_file) = &report_file {
            report_file.finalize(&summary)?;
        }
        Ok(ScanOutcome { summary, pages })
    }

    /// Scans one URL: baseline request, then every query parameter, POST
    /// parameter and request header.
    #[allow(clippy::too_many_arguments)]
    async fn scan_url(
        &self,
        client: &HttpClient,
        id: usize,
        url: &str,
        crawl: Option<&Crawl>,
        summary: &mut ScanReport,
        inputs_analyzed: &mut u64,
        polyglots_sent: &mut u64,
    ) -> PageReport {
        let mut page = PageReport::new(id, url);

        let parsed_url = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                let msg = format!("Couldn't parse URL {url}: {e}");
                warn!("{msg}");
                page.error_messages.push(msg);
                return page;
            }
        };

        // Per-URL view of the configuration; crawl records contribute
        // headers, cookies and the request body
        let mut config = self.config.clone();
        if let Some(crawl) = crawl {
            let mut crawl_headers = Vec::new();
            for (name, value) in &crawl.request.headers {
                if name.eq_ignore_ascii_case("cookie") {
                    let cookies: Vec<String> =
                        value.split(';').map(|c| c.trim().to_string()).collect();
                    client.add_cookies(&parsed_url, &cookies);
                } else {
                    crawl_headers.push(format!("{name}: {value}"));
                }
            }
            // crawl headers first, so command line headers keep priority
            crawl_headers.extend(config.headers.clone());
            config.headers = crawl_headers;
            config.data = crawl.request.body.clone();
        }
        client.add_cookies(&parsed_url, &config.cookies);

        debug!("Sending default request");
        let baseline_spec = match RequestSpec::build(url, &config) {
            Ok(spec) => spec,
            Err(e) => {
                let msg = format!("Couldn't build request for {url}: {e}");
                warn!("{msg}");
                page.error_messages.push(msg);
                return page;
            }
        };
        let baseline = match client.execute(&baseline_spec).await {
            Ok(response) => response,
            Err(e) => {
                let msg = format!("Couldn't connect to URL: {e}");
                warn!("{msg}");
                page.error_messages.push(msg);
                return page;
            }
        };
        info!("Status code {}", baseline.status);
        page.baseline = BaselineRecord {
            status_code: baseline.status,
            request: baseline_spec.dump(),
            response: baseline.dump.clone(),
        };

        let post_params = parse_form_body(&config.data);
        let renderer = self.renderer.as_deref();
        let mut status_changed = false;

        // query parameters
        let query_params = collect_query_params(&baseline_spec.url);
        debug!("Found {} query parameters", query_params.len());
        for (name, values) in &query_params {
            info!("Analyzing query parameter {name} => {values:?}");
            *inputs_analyzed += 1;
            let mut analysis = InputAnalysis::new(
                client,
                &config,
                renderer,
                url,
                baseline.status,
                &post_params,
                InputLocation::Query,
                name,
            );
            let mut param = analysis.run().await;
            *polyglots_sent += analysis.polyglots_sent();
            param.kind = InputLocation::Query.to_string();
            param.name = name.clone();
            param.default_values = values.clone();
            record_parameter(&mut page, param, summary);
            if analysis.status_code_changed() {
                page.error_messages
                    .push("Status code changed. Skipping this URL.".to_string());
                status_changed = true;
                break;
            }
        }

        // POST parameters
        if !status_changed {
            debug!("Found {} POST parameters", post_params.len());
            for (name, value) in &post_params {
                info!("Analyzing POST parameter {name} => {value}");
                *inputs_analyzed += 1;
                let mut analysis = InputAnalysis::new(
                    client,
                    &config,
                    renderer,
                    url,
                    baseline.status,
                    &post_params,
                    InputLocation::PostBody,
                    name,
                );
                let mut param = analysis.run().await;
                *polyglots_sent += analysis.polyglots_sent();
                param.kind = InputLocation::PostBody.to_string();
                param.name = name.clone();
                param.default_values = vec![value.clone()];
                record_parameter(&mut page, param, summary);
                if analysis.status_code_changed() {
                    page.error_messages
                        .push("Status code changed. Skipping this URL.".to_string());
                    status_changed = true;
                    break;
                }
            }
        }

        // headers
        if !status_changed {
            let header_names = collect_test_headers(&baseline_spec, &config);
            debug!("Found {} headers", header_names.len());
            for name in &header_names {
                let default_value = baseline_spec
                    .header_value(name)
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        if name.eq_ignore_ascii_case("Host") {
                            baseline_spec.host()
                        } else {
                            ADDED_HEADER_MARKER.to_string()
                        }
                    });
                info!("Analyzing header {name} => {default_value}");
                *inputs_analyzed += 1;
                let mut analysis = InputAnalysis::new(
                    client,
                    &config,
                    renderer,
                    url,
                    baseline.status,
                    &post_params,
                    InputLocation::Header,
                    name,
                );
                let mut param = analysis.run().await;
                *polyglots_sent += analysis.polyglots_sent();
                param.kind = InputLocation::Header.to_string();
                param.name = name.clone();
                param.default_values = vec![default_value];
                record_parameter(&mut page, param, summary);
                if analysis.status_code_changed() {
                    page.error_messages
                        .push("Status code changed. Skipping this URL.".to_string());
                    break;
                }
            }
        }

        page
    }
}

/// Query parameter names of the target URL with their default values
fn collect_query_params(url: &Url) -> Vec<(String, Vec<String>)> {
    let mut params: Vec<(String, Vec<String>)> = Vec::new();
    for (name, value) in url.query_pairs() {
        match params.iter().position(|(n, _)| n.as_str() == name.as_ref()) {
            Some(i) => params[i].1.push(value.into_owned()),
            None => params.push((name.into_owned(), vec![value.into_owned()])),
        }
    }
    params
}

/// Request headers worth testing for this URL
fn collect_test_headers(baseline_spec: &RequestSpec, config: &ScanConfig) -> Vec<String> {
    let mut names: Vec<String> = baseline_spec
        .headers
        .iter()
        .map(|(name, _)| name.clone())
        .filter(|name| !SKIPPED_HEADERS.iter().any(|s| name.eq_ignore_ascii_case(s)))
        .collect();
    names.push("Host".to_string());
    for extra in EXTRA_HEADERS {
        if !names.iter().any(|n| n.eq_ignore_ascii_case(extra)) {
            names.push(extra.to_string());
        }
    }
    if !config.test_headers.is_empty() {
        names.retain(|name| {
            config
                .test_headers
                .iter()
                .any(|t| t.eq_ignore_ascii_case(name))
        });
    }
    names
}

/// Folds one analyzed input into the page report and the scan summary
fn record_parameter(page: &mut PageReport, param: ParameterReport, summary: &mut ScanReport) {
    page.is_vulnerable |= param.is_vulnerable;
    let request_error = param.requests.iter().any(|r| !r.error.is_empty());

    // only inputs with findings, reflections or errors are worth reporting
    if !(param.is_vulnerable
        || !param.error_messages.is_empty()
        || !param.reflections.is_empty()
        || request_error)
    {
        return;
    }

    let certainty = param.certainty;
    page.parameters.push(param);
    match certainty {
        Certainty::Low
            if page.certainty != Certainty::High && page.certainty != Certainty::Medium =>
        {
            page.certainty = Certainty::Low;
            summary.count_certainty(Certainty::Low);
        }
        Certainty::Medium if page.certainty != Certainty::High => {
            page.certainty = Certainty::Medium;
            summary.count_certainty(Certainty::Medium);
        }
        Certainty::High => {
            page.certainty = Certainty::High;
            summary.count_certainty(Certainty::High);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_params_are_collected_with_duplicates_grouped() {
        let url = Url::parse("http://example.com/?a=1&b=2&a=3").unwrap();
        let params = collect_query_params(&url);
        assert_eq!(
            params,
            vec![
                ("a".to_string(), vec!["1".to_string(), "3".to_string()]),
                ("b".to_string(), vec!["2".to_string()]),
            ]
        );
    }

    #[test]
    fn test_headers_include_host_and_probe_headers() {
        let config = ScanConfig::default();
        let spec = RequestSpec::build("http://example.com/", &config).unwrap();
        let names = collect_test_headers(&spec, &config);
        assert!(names.iter().any(|n| n == "Host"));
        assert!(names.iter().any(|n| n == "X-Forwarded-For"));
        assert!(names.iter().any(|n| n == "Origin"));
        assert!(!names.iter().any(|n| n.eq_ignore_ascii_case("User-Agent")));
    }

    #[test]
    fn test_headers_can_be_restricted() {
        let config = ScanConfig {
            test_headers: vec!["host".to_string()],
            ..ScanConfig::default()
        };
        let spec = RequestSpec::build("http://example.com/", &config).unwrap();
        let names = collect_test_headers(&spec, &config);
        assert_eq!(names, vec!["Host".to_string()]);
    }

    #[test]
    fn only_noteworthy_parameters_are_recorded() {
        let mut page = PageReport::new(0, "http://x/");
        let mut summary = ScanReport::new("d", "cmd", &ScanConfig::default());

        // nothing observed: dropped
        record_parameter(&mut page, ParameterReport::default(), &mut summary);
        assert!(page.parameters.is_empty());

        // vulnerable parameter: recorded and counted
        let param = ParameterReport {
            is_vulnerable: true,
            certainty: Certainty::High,
            template_engine: "Twig".to_string(),
            ..ParameterReport::default()
        };
        record_parameter(&mut page, param, &mut summary);
        assert_eq!(page.parameters.len(), 1);
        assert_eq!(page.certainty, Certainty::High);
        assert!(page.is_vulnerable);
        assert_eq!(summary.high, 1);
        assert_eq!(summary.suspected_injections, 1);
    }

    #[test]
    fn lower_certainty_does_not_downgrade_a_page() {
        let mut page = PageReport::new(0, "http://x/");
        let mut summary = ScanReport::new("d", "cmd", &ScanConfig::default());
        let high = ParameterReport {
            is_vulnerable: true,
            certainty: Certainty::High,
            ..ParameterReport::default()
        };
        let low = ParameterReport {
            is_vulnerable: true,
            certainty: Certainty::Low,
            ..ParameterReport::default()
        };
        record_parameter(&mut page, high, &mut summary);
        record_parameter(&mut page, low, &mut summary);
        assert_eq!(page.certainty, Certainty::High);
        assert_eq!(summary.high, 1);
        assert_eq!(summary.low, 0);
    }
}
