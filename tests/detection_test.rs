//! End-to-end detection and identification tests against mock servers.
//!
//! The mock servers emulate template engines straight from the fingerprint
//! catalog: for a payload the engine is expected to error on they serve an
//! error, for expected literals they serve the literal, and everything else
//! is echoed like a plain web app would.

use proteus::models::{Certainty, ReflectionKind, ScanConfig};
use proteus::scanner::catalog::{self, Engine, Expected};
use proteus::scanner::Scanner;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn test_config(urls: Vec<String>) -> ScanConfig {
    ScanConfig {
        urls,
        timeout_secs: 10,
        ..ScanConfig::default()
    }
}

fn page(value: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(format!(
        "<html><body><p>Greetings {value}, enjoy your stay.</p></body></html>"
    ))
}

fn query_value(request: &Request, name: &str) -> String {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
        .unwrap_or_default()
}

/// Replaces wildcard markers in an expected literal with concrete text, the
/// way a real engine would fill them
fn expand_wildcard(lit: &str) -> String {
    let parts: Vec<&str> = lit.split("ARBITRARY").collect();
    match parts.len() {
        3 => format!(
            "{}{}{}",
            parts[0],
            "a".repeat(parts[1].parse().unwrap_or(8)),
            parts[2]
        ),
        2 => format!("{}interior9000{}", parts[0], parts[1]),
        _ => lit.to_string(),
    }
}

/// How the emulated engine surfaces template errors
enum ErrorStyle {
    /// Plain HTTP 500 without details
    Http500,
    /// HTTP 200 carrying a Thymeleaf stack trace that echoes the payload
    ThymeleafPage,
}

/// Serves responses exactly as the named engine's fingerprint predicts
struct EngineEmulator {
    engine: &'static Engine,
    error_style: ErrorStyle,
}

impl EngineEmulator {
    fn new(name: &str) -> Self {
        Self {
            engine: catalog::engine_by_name(name).expect("engine exists"),
            error_style: ErrorStyle::Http500,
        }
    }
}

impl Respond for EngineEmulator {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let value = query_value(request, "name");
        match self.engine.expected(&value) {
            Some(Expected::Error) => match self.error_style {
                ErrorStyle::Http500 => ResponseTemplate::new(500)
                    .set_body_string("<html><body>something broke</body></html>"),
                ErrorStyle::ThymeleafPage => ResponseTemplate::new(200).set_body_string(format!(
                    "<html><body>org.thymeleaf.exceptions.TemplateProcessingException: \
                     could not parse \"{value}\"</body></html>"
                )),
            },
            Some(Expected::Empty) => page(""),
            Some(Expected::Literal(lit)) => page(&expand_wildcard(lit)),
            // unmodified expectations, nonces and escaped payloads pass through
            Some(Expected::Unmodified) | None => page(&value),
        }
    }
}

#[tokio::test]
async fn erb_is_identified_from_a_query_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(EngineEmulator::new("Erb/Erubi/Erubis"))
        .mount(&server)
        .await;

    let config = test_config(vec![format!("{}/page?name=test", server.uri())]);
    let outcome = Scanner::new(config).run().await.unwrap();

    assert_eq!(outcome.pages.len(), 1);
    let page = &outcome.pages[0];
    assert!(page.is_vulnerable);
    assert_eq!(page.certainty, Certainty::High);

    let param = page
        .parameters
        .iter()
        .find(|p| p.name == "name")
        .expect("query parameter is reported");
    assert_eq!(param.template_engine, "Erb/Erubi/Erubis");
    assert_eq!(param.certainty, Certainty::High);
    assert!(param.is_vulnerable);
    assert!(param
        .reflections
        .iter()
        .any(|r| r.kind == ReflectionKind::Body));
    assert!(param.errors_visible);
    assert_eq!(outcome.summary.high, 1);
    assert_eq!(outcome.summary.suspected_vulnerable_urls, 1);
}

#[tokio::test]
async fn go_html_template_is_identified_via_wildcard_literals() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(EngineEmulator::new("html/template"))
        .mount(&server)
        .await;

    let config = test_config(vec![format!("{}/render?name=gopher", server.uri())]);
    let outcome = Scanner::new(config).run().await.unwrap();

    let param = outcome.pages[0]
        .parameters
        .iter()
        .find(|p| p.name == "name")
        .expect("query parameter is reported");
    assert_eq!(param.template_engine, "html/template");
    assert_eq!(param.certainty, Certainty::High);
}

#[tokio::test]
async fn thymeleaf_error_pages_short_circuit_identification() {
    let server = MockServer::start().await;
    let mut emulator = EngineEmulator::new("Thymeleaf");
    emulator.error_style = ErrorStyle::ThymeleafPage;
    Mock::given(method("GET"))
        .respond_with(emulator)
        .mount(&server)
        .await;

    let config = test_config(vec![format!("{}/view?name=test", server.uri())]);
    let outcome = Scanner::new(config).run().await.unwrap();

    let param = outcome.pages[0]
        .parameters
        .iter()
        .find(|p| p.name == "name")
        .expect("query parameter is reported");
    assert_eq!(param.template_engine, "Thymeleaf");
    assert!(param.certainty >= Certainty::Medium);
}

/// A server that echoes input unchanged must produce reflections but no
/// engine and no certainty
#[tokio::test]
async fn echo_server_yields_no_engine() {
    struct EchoServer;
    impl Respond for EchoServer {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            page(&query_value(request, "name"))
        }
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(EchoServer)
        .mount(&server)
        .await;

    let config = test_config(vec![format!("{}/echo?name=test", server.uri())]);
    let outcome = Scanner::new(config).run().await.unwrap();

    let page = &outcome.pages[0];
    assert!(!page.is_vulnerable);
    let param = page
        .parameters
        .iter()
        .find(|p| p.name == "name")
        .expect("reflected parameter is reported");
    assert_eq!(param.template_engine, "");
    assert_eq!(param.certainty, Certainty::None);
    assert!(!param.reflections.is_empty());
    assert!(!param.errors_visible);
    assert_eq!(outcome.summary.suspected_injections, 0);
}

/// A server that swallows all input entirely gives the scanner nothing to
/// work with: no reflection, no errors, no engine
#[tokio::test]
async fn input_swallowing_server_yields_nothing() {
    struct SwallowingServer;
    impl Respond for SwallowingServer {
        fn respond(&self, _request: &Request) -> ResponseTemplate {
            page("")
        }
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(SwallowingServer)
        .mount(&server)
        .await;

    let config = test_config(vec![format!("{}/void?name=test", server.uri())]);
    let outcome = Scanner::new(config).run().await.unwrap();

    let page = &outcome.pages[0];
    assert!(!page.is_vulnerable);
    assert!(page.parameters.is_empty());
    assert_eq!(page.certainty, Certainty::None);
}

/// A payload that permanently breaks the endpoint must abort the URL after
/// the baseline drift is confirmed, with no further polyglots dispatched
#[tokio::test]
async fn status_drift_aborts_the_url() {
    struct DriftingServer {
        broken: Arc<AtomicBool>,
    }
    impl Respond for DriftingServer {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let value = query_value(request, "name");
            if value == catalog::ERR1 {
                self.broken.store(true, Ordering::SeqCst);
            }
            if self.broken.load(Ordering::SeqCst) {
                ResponseTemplate::new(500).set_body_string("broken")
            } else {
                page(&value)
            }
        }
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(DriftingServer {
            broken: Arc::new(AtomicBool::new(false)),
        })
        .mount(&server)
        .await;

    let config = test_config(vec![format!("{}/fragile?name=test", server.uri())]);
    let outcome = Scanner::new(config).run().await.unwrap();

    let page = &outcome.pages[0];
    assert!(page
        .error_messages
        .iter()
        .any(|m| m.contains("Status code changed")));
    assert!(!page.is_vulnerable);

    let param = page
        .parameters
        .iter()
        .find(|p| p.name == "name")
        .expect("reflected parameter is reported");
    assert_eq!(param.template_engine, "");
    // the drift was noticed on the very first polyglot; nothing else was sent
    assert_eq!(param.requests.len(), 1);
}

/// A static site that 500s on any foreign Host value must not be flagged:
/// the backslashed cross-check errors too, so every error observation is
/// discarded
#[tokio::test]
async fn host_header_errors_are_cross_checked() {
    struct HostSensitive {
        expected_host: String,
    }
    impl Respond for HostSensitive {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let host = request
                .headers
                .get("host")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            if host == self.expected_host {
                ResponseTemplate::new(200)
                    .set_body_string("<html><body>static content</body></html>")
            } else {
                ResponseTemplate::new(500).set_body_string("internal server error")
            }
        }
    }

    let server = MockServer::start().await;
    let expected_host = server.address().to_string();
    Mock::given(method("GET"))
        .respond_with(HostSensitive { expected_host })
        .mount(&server)
        .await;

    let config = test_config(vec![format!("{}/", server.uri())]);
    let outcome = Scanner::new(config).run().await.unwrap();

    let page = &outcome.pages[0];
    assert!(!page.is_vulnerable);
    assert!(page.parameters.is_empty());
    assert_eq!(outcome.summary.suspected_injections, 0);
}

/// POST bodies are rebuilt around the probed parameter with the other pairs
/// preserved; reflections are found through the form round-trip
#[tokio::test]
async fn post_parameters_are_scanned() {
    struct PostEcho;
    impl Respond for PostEcho {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let body = String::from_utf8_lossy(&request.body).into_owned();
            let value = url::form_urlencoded::parse(body.as_bytes())
                .find(|(k, _)| k == "name")
                .map(|(_, v)| v.into_owned())
                .unwrap_or_default();
            page(&value)
        }
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(PostEcho)
        .mount(&server)
        .await;

    let config = ScanConfig {
        urls: vec![format!("{}/submit", server.uri())],
        data: "name=test&other=1".to_string(),
        timeout_secs: 10,
        ..ScanConfig::default()
    };
    let outcome = Scanner::new(config).run().await.unwrap();

    let page = &outcome.pages[0];
    let param = page
        .parameters
        .iter()
        .find(|p| p.name == "name")
        .expect("POST parameter is reported");
    assert_eq!(param.kind, "POST");
    assert!(!param.reflections.is_empty());
    assert_eq!(param.template_engine, "");
    // the unreflected sibling parameter is not worth reporting
    assert!(!page.parameters.iter().any(|p| p.name == "other"));
}
