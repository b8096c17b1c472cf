//! The detection and identification engine for a single input point.
//!
//! [`InputAnalysis`] owns the per-input state and walks the decision
//! procedure: probe the reflection, decide whether a template engine reacts
//! at all (detection), then send discriminating polyglots until one
//! candidate remains (identification). The polyglot dispatcher and response
//! classifier live here too, since they share that state.

use crate::browser::Renderer;
use crate::http::{HttpClient, HttpResponse, RequestSpec};
use crate::models::{Certainty, InputLocation, Reflection, ReflectionKind, ScanConfig};
use crate::report::{ParameterReport, RequestRecord};
use crate::scanner::catalog::{
    self, Expected, ALL_POLYGLOTS, ARBITRARY, DETECTION_POLYGLOTS, ENGINES, ERR1, ERR2,
    ERR_JAVASCRIPT,
};
use crate::scanner::matching::{
    arbitrary_match, backslash_polyglot, between, encoded_match, Extraction,
};
use crate::scanner::state::{IdentifiedEngine, ScanState};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, info, warn};

/// Reported engine name when a template engine reacted but every known
/// candidate was eliminated
pub const UNKNOWN_ENGINE: &str = "unknown";

/// Aggregated outcome of one polyglot dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// No reflection and no error; the dispatch taught us nothing
    None,
    /// Every reflection rendered the polyglot unchanged (possibly encoded)
    Unmodified,
    /// At least one reflection rendered something an engine would produce
    Modified,
    /// The polyglot provoked an error
    Error,
    /// A distinctive engine marker was found; candidates were set directly
    Identified,
    /// The observation is unusable and must not prune candidates
    NotValid,
}

/// What one reflection point showed for a dispatched polyglot
#[derive(Debug, Clone, PartialEq, Eq)]
enum Observation {
    Error,
    Empty,
    Unmodified,
    Rendered(String),
}

/// Classifier verdict for a single reflection point
enum BodyVerdict {
    /// Nothing usable at this reflection point
    Skip,
    /// A smoking gun fixed the candidate set; stop classifying
    Identified,
    Observed(Observation),
}

fn display_observation(obs: &Observation) -> String {
    match obs {
        Observation::Error => "error".to_string(),
        Observation::Empty => "empty".to_string(),
        Observation::Unmodified => "unmodified".to_string(),
        Observation::Rendered(s) => truncate_display(s),
    }
}

fn truncate_display(s: &str) -> String {
    if s.chars().count() > 100 {
        let head: String = s.chars().take(100).collect();
        format!("{head}(longer than 100 characters)")
    } else {
        s.to_string()
    }
}

/// Engines from `names` whose fingerprint expects an error for `polyglot`
fn engines_expecting_error(names: &[&'static str], polyglot: &str) -> Vec<&'static str> {
    ENGINES
        .iter()
        .filter(|e| names.contains(&e.name) && e.expected(polyglot) == Some(Expected::Error))
        .map(|e| e.name)
        .collect()
}

/// Analysis of one user-controllable input point
pub struct InputAnalysis<'a> {
    pub(crate) client: &'a HttpClient,
    pub(crate) config: &'a ScanConfig,
    pub(crate) renderer: Option<&'a dyn Renderer>,
    pub(crate) url: &'a str,
    pub(crate) baseline_status: u16,
    pub(crate) post_params: &'a [(String, String)],
    pub(crate) location: InputLocation,
    pub(crate) name: &'a str,
    pub(crate) state: ScanState,
}

impl<'a> InputAnalysis<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        client: &'a HttpClient,
        config: &'a ScanConfig,
        renderer: Option<&'a dyn Renderer>,
        url: &'a str,
        baseline_status: u16,
        post_params: &'a [(String, String)],
        location: InputLocation,
        name: &'a str,
    ) -> Self {
        Self {
            client,
            config,
            renderer,
            url,
            baseline_status,
            post_params,
            location,
            name,
            state: ScanState::new(),
        }
    }

    /// Whether the baseline status drifted and the URL must be abandoned
    pub fn status_code_changed(&self) -> bool {
        self.state.status_code_changed
    }

    /// Polyglots dispatched for this input
    pub fn polyglots_sent(&self) -> u64 {
        self.state.polyglots_sent
    }

    fn is_host_input(&self) -> bool {
        self.location == InputLocation::Header && self.name.eq_ignore_ascii_case("host")
    }

    /// Runs the full analysis for this input point
    pub async fn run(&mut self) -> ParameterReport {
        let mut report = ParameterReport::default();

        match self.analyze_reflection().await {
            Ok(reflected) => self.state.reflected = reflected,
            Err(e) => report.error_messages.push(e.to_string()),
        }

        let (detected, mut requests) = self.detect().await;
        if detected {
            let (engine, mut identify_requests) = self.identify().await;
            report.template_engine = engine;
            requests.append(&mut identify_requests);
        }

        report.certainty = self.assign_certainty(&report.template_engine);
        match report.template_engine.as_str() {
            "" => info!("No template engine could be detected"),
            UNKNOWN_ENGINE => info!(
                "A template engine was detected, but could not be identified (certainty: {})",
                report.certainty
            ),
            engine => info!("{engine} was identified (certainty: {})", report.certainty),
        }

        report.reflections = self.state.reflections.clone();
        report.errors_visible = self.state.errors_visible;
        report.requests = requests;
        report.is_vulnerable = !report.template_engine.is_empty();
        report
    }

    /// Final certainty label for the reported engine
    fn assign_certainty(&self, engine: &str) -> Certainty {
        let rendered = self.state.modified_rendered_seen;
        if engine.is_empty() {
            Certainty::None
        } else if engine == UNKNOWN_ENGINE {
            if rendered {
                Certainty::Medium
            } else {
                Certainty::Low
            }
        } else if self.is_host_input() {
            // The host header allows few characters, which biases engines
            // that answer with unmodified or error towards false positives
            Certainty::Low
        } else if rendered {
            Certainty::High
        } else {
            Certainty::Medium
        }
    }

    /// Exactly one candidate remains and, if reflected, a distinctive
    /// rendering backs it up
    fn uniquely_identified(&self) -> bool {
        matches!(self.state.identified_engine(), IdentifiedEngine::Single(_))
            && (!self.state.reflected || self.state.modified_rendered_seen)
    }

    /// Detection phase: is any template engine processing this input?
    async fn detect(&mut self) -> (bool, Vec<RequestRecord>) {
        let mut records = Vec::new();

        let (indicator, record) = self.dispatch(ERR1, false).await;
        self.state.errors_visible =
            matches!(indicator, Indicator::Error | Indicator::Identified);
        self.state.mark_tested(ERR1);
        let mut success = self.state.errors_visible;
        records.push(record);

        if !self.state.errors_visible && !self.state.reflected {
            info!("No errors are thrown and input is not being reflected");
            return (false, records);
        }

        for &polyglot in DETECTION_POLYGLOTS {
            if self.state.status_code_changed {
                break;
            }
            if self.uniquely_identified() {
                return (true, records);
            }
            let (indicator, record) = self.dispatch(polyglot, false).await;
            if !matches!(
                indicator,
                Indicator::None | Indicator::Unmodified | Indicator::NotValid
            ) {
                success = true;
            }
            self.state.mark_tested(polyglot);
            records.push(record);
        }

        // The universal detection polyglots may all be rejected by host
        // header character limits, so fall back to the rest of the catalog
        if self.is_host_input() && !success {
            if self.uniquely_identified() {
                return (true, records);
            }
            for &polyglot in ALL_POLYGLOTS {
                if self.state.status_code_changed {
                    break;
                }
                if self.state.is_tested(polyglot) {
                    continue;
                }
                let (indicator, record) = self.dispatch(polyglot, false).await;
                if !matches!(
                    indicator,
                    Indicator::None | Indicator::Unmodified | Indicator::NotValid
                ) {
                    success = true;
                }
                self.state.mark_tested(polyglot);
                records.push(record);
            }
        }

        if self.state.status_code_changed {
            return (false, records);
        }
        (success, records)
    }

    /// Identification phase: which engine is it?
    async fn identify(&mut self) -> (String, Vec<RequestRecord>) {
        let mut records = Vec::new();

        if let IdentifiedEngine::Single(name) = self.state.identified_engine() {
            if (!self.state.reflected || self.state.modified_rendered_seen)
                && !self.state.only_error_responses
            {
                return (name.to_string(), records);
            }
        }
        info!("A template engine was successfully detected and is now being identified");

        for &polyglot in ALL_POLYGLOTS {
            if self.state.status_code_changed {
                break;
            }
            if self.has_impact(polyglot) {
                let (_, record) = self.dispatch(polyglot, false).await;
                self.state.mark_tested(polyglot);
                records.push(record);
            }
            match self.state.identified_engine() {
                IdentifiedEngine::Multiple => continue,
                IdentifiedEngine::Unknown => return (UNKNOWN_ENGINE.to_string(), records),
                IdentifiedEngine::Single(name) => {
                    if !self.state.only_error_responses
                        && (!self.state.reflected || self.state.modified_rendered_seen)
                    {
                        return (name.to_string(), records);
                    }
                }
            }
        }

        (self.state.possible_names(), records)
    }

    /// Whether dispatching this polyglot can still shrink the candidate set
    fn has_impact(&self, polyglot: &str) -> bool {
        if self.state.status_code_changed {
            return false;
        }
        if self.config.length_limit > 0 && polyglot.len() > self.config.length_limit {
            debug!(
                "Polyglot {polyglot} ({}) is longer than the length limit ({}) and is skipped",
                polyglot.len(),
                self.config.length_limit
            );
            return false;
        }
        if self.state.is_tested(polyglot) {
            return false;
        }

        // A single candidate that has only ever answered with errors still
        // needs confirmation from a polyglot it should not error on
        if self.state.only_error_responses {
            if let IdentifiedEngine::Single(name) = self.state.identified_engine() {
                if let Some(engine) = catalog::engine_by_name(name) {
                    return engine.expected(polyglot) != Some(Expected::Error);
                }
            }
        }

        // At least two remaining candidates must expect different classes;
        // without a reflection only the error/non-error split is observable
        let mut first: Option<Expected> = None;
        for engine in ENGINES.iter() {
            if !self.state.is_possible(engine.name) {
                continue;
            }
            let Some(expected) = engine.expected(polyglot) else {
                continue;
            };
            match first {
                None => first = Some(expected),
                Some(prev) => {
                    if self.state.reflected {
                        if prev != expected {
                            return true;
                        }
                    } else if (prev == Expected::Error) != (expected == Expected::Error) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Sends one polyglot and interprets the response.
    ///
    /// `backslashed` dispatches are cross-checks: they are not counted, never
    /// prune the candidate set and never recurse further.
    pub(crate) async fn dispatch(
        &mut self,
        polyglot: &str,
        backslashed: bool,
    ) -> (Indicator, RequestRecord) {
        self.dispatch_inner(polyglot, backslashed).await
    }

    fn dispatch_inner<'b>(
        &'b mut self,
        polyglot: &'b str,
        backslashed: bool,
    ) -> Pin<Box<dyn Future<Output = (Indicator, RequestRecord)> + Send + 'b>> {
        Box::pin(async move {
            debug!("Possible engines: {}", self.state.possible_names());

            let mut record = RequestRecord {
                polyglot: polyglot.to_string(),
                ..Default::default()
            };

            let mut spec = match RequestSpec::build(self.url, self.config) {
                Ok(spec) => spec,
                Err(e) => {
                    warn!("Couldn't build request: {e}");
                    record.conclusion = format!("Couldn't build request: {e}");
                    record.error = e.to_string();
                    return (Indicator::NotValid, record);
                }
            };
            match self.location {
                InputLocation::Query => spec.set_query(self.name, polyglot),
                InputLocation::PostBody => spec.set_post(self.name, polyglot, self.post_params),
                InputLocation::Header => spec.set_header(self.name, polyglot),
            }
            record.request = spec.dump();
            record.curl_command = spec.to_curl();
            debug!("Curl command: {}", record.curl_command);

            if !backslashed {
                self.state.polyglots_sent += 1;
            }

            let response = match self.client.execute(&spec).await {
                Ok(response) => response,
                Err(e) => {
                    debug!("Sending polyglot failed: {e}");
                    record.error = e.to_string();
                    return (Indicator::NotValid, record);
                }
            };
            record.response = response.dump.clone();

            let (indicator, conclusion, error) =
                self.check_indicators(&response, polyglot, backslashed).await;
            record.conclusion = conclusion;
            if let Some(error) = error {
                record.error = error;
            }

            if indicator == Indicator::Identified {
                self.state.modified_rendered_seen = true;
            }
            if indicator != Indicator::Error && indicator != Indicator::NotValid && !backslashed {
                self.state.only_error_responses = false;
            }
            (indicator, record)
        })
    }

    /// Response classifier: maps a raw response to an indicator.
    async fn check_indicators(
        &mut self,
        response: &HttpResponse,
        polyglot: &str,
        backslashed: bool,
    ) -> (Indicator, String, Option<String>) {
        // Servers reject exotic header values wholesale; a 4xx there says
        // nothing about template processing
        if self.location == InputLocation::Header && (400..500).contains(&response.status) {
            let msg = format!(
                "The polyglot {polyglot} was rejected with a {}",
                response.status
            );
            info!("{msg}");
            return (Indicator::NotValid, msg, None);
        }

        if response.status != self.baseline_status && (500..600).contains(&response.status) {
            // Re-probe the plain URL: a drifted baseline invalidates every
            // further observation for this input
            let plain = match RequestSpec::build(self.url, self.config) {
                Ok(spec) => spec,
                Err(e) => {
                    let msg = format!("Couldn't rebuild the baseline request: {e}");
                    warn!("{msg}");
                    return (Indicator::NotValid, msg, Some(e.to_string()));
                }
            };
            let check_status = match self.client.execute(&plain).await {
                Ok(check) => check.status,
                Err(e) => {
                    self.prune_candidates(polyglot, &[Observation::Error], backslashed);
                    let conclusion = format!("Couldn't connect to URL: {e}");
                    warn!("{conclusion}");
                    return (Indicator::NotValid, conclusion, Some(e.to_string()));
                }
            };
            if check_status != self.baseline_status {
                let conclusion = format!(
                    "The default status code changed to {}. Skipping this URL.",
                    response.status
                );
                warn!("{conclusion}");
                self.state.status_code_changed = true;
                return (Indicator::NotValid, conclusion.clone(), Some(conclusion));
            }

            if !backslashed {
                let escaped = backslash_polyglot(polyglot);
                let (indicator, _) = self.dispatch_inner(&escaped, true).await;
                if indicator == Indicator::Error {
                    let conclusion = "The backslashed polyglot also throws an error; \
                        the error is most likely not thrown by a template engine"
                        .to_string();
                    return (Indicator::NotValid, conclusion, None);
                }
            }

            self.prune_candidates(polyglot, &[Observation::Error], backslashed);
            let conclusion = format!(
                "The polyglot {polyglot} triggered an error: status code {}",
                response.status
            );
            if !backslashed {
                info!("{conclusion}");
            } else {
                debug!("Backslashed: {conclusion}");
            }
            return (Indicator::Error, conclusion, None);
        }

        if self.state.reflected {
            let mut observations: Vec<Observation> = Vec::new();
            let mut conclusion = String::new();
            // external reflection URLs are fetched at most once per classification
            let mut external_bodies: HashMap<String, String> = HashMap::new();
            let mut backslashed_errors_too = false;
            let mut backslashed_sent = false;

            let reflections = self.state.reflections.clone();
            for reflection in &reflections {
                match reflection.kind {
                    ReflectionKind::Body => {
                        let (body_to_check, render_url) = match &reflection.reflection_url {
                            Some(u) => {
                                if !external_bodies.contains_key(u) {
                                    let body = self.reflection_check_request(u).await;
                                    external_bodies.insert(u.clone(), body);
                                }
                                (external_bodies.get(u).cloned().unwrap_or_default(), u.as_str())
                            }
                            None => (response.body.clone(), self.url),
                        };

                        let (mut verdict, concl) =
                            self.check_body(&body_to_check, polyglot, reflection, backslashed);
                        conclusion = concl;

                        if let BodyVerdict::Identified = verdict {
                            return (Indicator::Identified, conclusion, None);
                        }

                        // client-side engines only act after scripts ran
                        if !backslashed
                            && matches!(verdict, BodyVerdict::Observed(Observation::Unmodified))
                            && self.config.csti
                            && body_to_check.contains("</script>")
                        {
                            if let Some(renderer) = self.renderer {
                                match renderer.render(&body_to_check, render_url).await {
                                    Ok(rendered) => {
                                        let (new_verdict, concl) = self.check_body(
                                            &rendered, polyglot, reflection, backslashed,
                                        );
                                        verdict = new_verdict;
                                        conclusion = concl;
                                    }
                                    Err(e) => warn!("Headless render failed: {e}"),
                                }
                            }
                        }

                        if !backslashed
                            && matches!(verdict, BodyVerdict::Observed(Observation::Error))
                            && !backslashed_sent
                        {
                            let escaped = backslash_polyglot(polyglot);
                            let (indicator, _) = self.dispatch_inner(&escaped, true).await;
                            if indicator == Indicator::Error {
                                backslashed_errors_too = true;
                            }
                            backslashed_sent = true;
                        }

                        match verdict {
                            BodyVerdict::Skip => continue,
                            BodyVerdict::Identified => {
                                return (Indicator::Identified, conclusion, None)
                            }
                            // both the polyglot and its escaped form error:
                            // not template-induced, drop this observation
                            BodyVerdict::Observed(Observation::Error) if backslashed_errors_too => {
                                continue
                            }
                            BodyVerdict::Observed(obs) => observations.push(obs),
                        }
                    }
                    ReflectionKind::Header => {
                        let Some(header_name) = &reflection.header_name else {
                            continue;
                        };
                        conclusion.clear();
                        for value in response.headers.get_all(header_name.as_str()) {
                            let value = value.to_str().unwrap_or_default();
                            let (verdict, concl) =
                                self.check_body(value, polyglot, reflection, backslashed);
                            conclusion.push_str(&concl);
                            match verdict {
                                BodyVerdict::Skip => continue,
                                BodyVerdict::Identified => {
                                    return (Indicator::Identified, conclusion, None)
                                }
                                BodyVerdict::Observed(obs) => observations.push(obs),
                            }
                        }
                    }
                }
            }

            let printable: Vec<String> = observations.iter().map(display_observation).collect();
            let msg = format!("The polyglot {polyglot} returned the response(s) {printable:?}");
            conclusion.push_str(&msg);
            if !backslashed {
                info!("{msg}");
            } else {
                debug!("Backslashed: {msg}");
            }
            let indicator = self.prune_candidates(polyglot, &observations, backslashed);
            return (indicator, conclusion, None);
        }

        debug!("The polyglot {polyglot} did not trigger an error and input is not being reflected");
        (
            Indicator::None,
            "No indicator could be identified".to_string(),
            None,
        )
    }

    /// Classifies what one reflection point shows for a polyglot, including
    /// engine-specific micro-fingerprints.
    fn check_body(
        &mut self,
        body: &str,
        polyglot: &str,
        reflection: &Reflection,
        backslashed: bool,
    ) -> (BodyVerdict, String) {
        // Thymeleaf error pages name their exception package
        if body.contains("org.thymeleaf.exceptions") && body.contains(polyglot) {
            let possible = engines_expecting_error(&["Thymeleaf", "Thymeleaf (Inline)"], polyglot);
            let conclusion =
                format!("The polyglot {polyglot} triggered a {possible:?} error message");
            if !backslashed {
                info!("{conclusion}");
            } else {
                debug!("Backslashed: {conclusion}");
            }
            self.state.set_template_engine(&possible);
            return (BodyVerdict::Identified, conclusion);
        }

        match between(body, &reflection.preceding, &reflection.subsequent) {
            Extraction::BothMissing => {
                let conclusion =
                    format!("The polyglot {polyglot} triggered an error: both anchors are missing");
                if !backslashed {
                    info!("{conclusion}");
                } else {
                    debug!("Backslashed: {conclusion}");
                }
                (BodyVerdict::Observed(Observation::Error), conclusion)
            }
            Extraction::PrecedingMissing => {
                let conclusion = format!("The polyglot {polyglot} removed the preceding anchor");
                if !backslashed {
                    info!("{conclusion}");
                } else {
                    debug!("Backslashed: {conclusion}");
                }
                if body.contains("class=\"ng-binding\"") {
                    let conclusion =
                        "The preceding anchor was replaced with class=\"ng-binding\"".to_string();
                    info!("{conclusion}");
                    self.state.set_template_engine(&["AngularJS"]);
                    return (BodyVerdict::Identified, conclusion);
                }
                if polyglot == ERR2 && body.contains(&format!("%>{}", reflection.subsequent)) {
                    let conclusion = "The preceding anchor was removed and %> rendered".to_string();
                    self.state.set_template_engine(&["Pystache"]);
                    return (BodyVerdict::Identified, conclusion);
                }
                if polyglot == ERR_JAVASCRIPT && body.contains(&reflection.subsequent) {
                    let conclusion =
                        "The preceding anchor was removed and an empty string rendered".to_string();
                    info!("{conclusion}");
                    self.state.set_template_engine(&["Pystache"]);
                    return (BodyVerdict::Identified, conclusion);
                }
                if body.contains("Unclosed tag: ") && body.contains(" on line ") {
                    let conclusion =
                        format!("The polyglot {polyglot} triggered a Mustache.PHP error message");
                    info!("{conclusion}");
                    self.state.set_template_engine(&["Mustache.PHP"]);
                    return (BodyVerdict::Identified, conclusion);
                }
                (BodyVerdict::Skip, conclusion)
            }
            Extraction::SubsequentMissing => {
                let mut conclusion = format!("The polyglot {polyglot} removed the subsequent anchor");
                info!("{conclusion}");
                let mut possible: Vec<&'static str> = Vec::new();
                for engine in ENGINES.iter() {
                    match engine.name {
                        // these may swallow everything after the payload on the same line
                        "Cheetah3" | "Velocity" | "VelocityJS" => {
                            if !self.state.is_possible(engine.name) {
                                continue;
                            }
                            if let Some(Expected::Literal(lit)) = engine.expected(polyglot) {
                                if body.contains(&format!("{}{lit}", reflection.preceding)) {
                                    possible.push(engine.name);
                                    conclusion = format!(
                                        "The subsequent anchor was removed and {lit} rendered"
                                    );
                                }
                            }
                        }
                        // HoganJS may consume exactly the first subsequent character
                        "HoganJS" => {
                            let sub = reflection.subsequent.as_str();
                            let shortened = sub
                                .chars()
                                .next()
                                .map(|c| &sub[c.len_utf8()..])
                                .unwrap_or(sub);
                            if let Extraction::Fragment(fragment) =
                                between(body, &reflection.preceding, shortened)
                            {
                                let matched = match engine.expected(polyglot) {
                                    Some(Expected::Empty) => fragment.is_empty(),
                                    Some(Expected::Literal(lit)) => fragment == lit,
                                    _ => false,
                                };
                                if matched {
                                    let conclusion = "The first subsequent character was removed \
                                        and the expected fragment rendered"
                                        .to_string();
                                    info!("{conclusion}");
                                    self.state.set_template_engine(&["HoganJS"]);
                                    return (BodyVerdict::Identified, conclusion);
                                }
                            }
                        }
                        // Pug turns a bare word into a tag pair
                        "Pug" => {
                            if let Some(Expected::Literal(lit)) = engine.expected(polyglot) {
                                if lit.len() > 10 && body.contains(lit) {
                                    let conclusion = format!(
                                        "The subsequent anchor was modified and {lit} rendered"
                                    );
                                    info!("{conclusion}");
                                    self.state.set_template_engine(&["Pug"]);
                                    return (BodyVerdict::Identified, conclusion);
                                }
                            }
                        }
                        _ => {}
                    }
                }
                if !possible.is_empty() {
                    info!("{conclusion}");
                    self.state.set_template_engine(&possible);
                    return (BodyVerdict::Identified, conclusion);
                }
                if body.to_lowercase().contains("error") {
                    let conclusion = format!(
                        "The polyglot {polyglot} triggered an error message containing the word error"
                    );
                    if !backslashed {
                        info!("{conclusion}");
                    } else {
                        debug!("Backslashed: {conclusion}");
                    }
                    return (BodyVerdict::Observed(Observation::Error), conclusion);
                }
                (BodyVerdict::Skip, conclusion)
            }
            Extraction::Fragment(fragment) => {
                let encoding = encoded_match(&fragment, polyglot);
                if encoding.is_none() {
                    if fragment.contains("DotLiquid.Exceptions") {
                        let conclusion =
                            format!("The polyglot {polyglot} triggered a DotLiquid error message");
                        info!("{conclusion}");
                        self.state.set_template_engine(&["DotLiquid"]);
                        return (BodyVerdict::Identified, conclusion);
                    }
                    if fragment.contains("Scriban.Template") {
                        let possible = engines_expecting_error(
                            &["Scriban", "Scriban (Liquid mode)"],
                            polyglot,
                        );
                        let conclusion = format!(
                            "The polyglot {polyglot} triggered a {possible:?} error message"
                        );
                        info!("{conclusion}");
                        self.state.set_template_engine(&possible);
                        return (BodyVerdict::Identified, conclusion);
                    }
                    if fragment.contains("Fluid.ParseException") {
                        let conclusion =
                            format!("The polyglot {polyglot} triggered a Fluid error message");
                        info!("{conclusion}");
                        self.state.set_template_engine(&["Fluid"]);
                        return (BodyVerdict::Identified, conclusion);
                    }
                    let lower = fragment.to_lowercase();
                    if lower.contains("error")
                        || lower.contains("exception")
                        || lower.contains("unexpected")
                    {
                        let conclusion = format!(
                            "The polyglot {polyglot} triggered an error message: the rendered \
                             response contained the word error, exception or unexpected"
                        );
                        if !backslashed {
                            info!("{conclusion}");
                        } else {
                            debug!("Backslashed: {conclusion}");
                        }
                        return (BodyVerdict::Observed(Observation::Error), conclusion);
                    }
                }

                if fragment == polyglot {
                    let conclusion = format!("The polyglot {polyglot} was rendered unmodified");
                    return (BodyVerdict::Observed(Observation::Unmodified), conclusion);
                }
                if fragment.is_empty() {
                    let conclusion =
                        format!("The polyglot {polyglot} was rendered as an empty string");
                    return (BodyVerdict::Observed(Observation::Empty), conclusion);
                }

                if encoding.is_none() {
                    self.note_distinct_rendering(polyglot, &fragment);
                }
                let conclusion = format!(
                    "The polyglot {polyglot} was rendered in a modified way: [{}]{}",
                    truncate_display(&fragment),
                    encoding.unwrap_or("")
                );
                if !backslashed {
                    info!("{conclusion}");
                } else {
                    debug!("Backslashed: {conclusion}");
                }
                (BodyVerdict::Observed(Observation::Rendered(fragment)), conclusion)
            }
        }
    }

    /// A fragment that exactly matches some engine's expected rendering
    /// proves a template engine processed the input
    fn note_distinct_rendering(&mut self, polyglot: &str, fragment: &str) {
        if self.state.modified_rendered_seen || !self.state.reflected {
            return;
        }
        for engine in ENGINES.iter() {
            if matches!(engine.expected(polyglot), Some(Expected::Literal(lit)) if lit == fragment)
            {
                self.state.modified_rendered_seen = true;
                return;
            }
        }
    }

    /// Prunes the candidate set against the fingerprint table and collapses
    /// the observations into a single indicator.
    fn prune_candidates(
        &mut self,
        polyglot: &str,
        observations: &[Observation],
        backslashed: bool,
    ) -> Indicator {
        let mut match_global = false;
        let mut only_unmodified = true;
        let mut error_thrown = false;

        for obs in observations {
            let encoded_unmodified =
                matches!(obs, Observation::Rendered(s) if encoded_match(s, polyglot).is_some());
            if *obs != Observation::Unmodified && !encoded_unmodified {
                only_unmodified = false;
            }
            if *obs == Observation::Error {
                error_thrown = true;
            }
        }

        for engine in ENGINES.iter() {
            let expected = engine.expected(polyglot);
            let mut matched = false;
            if let Some(expected) = expected {
                for obs in observations {
                    if self.observation_matches(obs, expected, polyglot) {
                        matched = true;
                        match_global = true;
                        break;
                    }
                }
            }
            if !matched && !backslashed {
                // the first universal error polyglot must not eliminate
                // engines expected to error: errors may simply be caught
                if polyglot == ERR1 && expected == Some(Expected::Error) {
                    continue;
                }
                self.state.remove_engine(engine.name);
            }
        }

        if error_thrown {
            Indicator::Error
        } else if !match_global {
            Indicator::None
        } else if only_unmodified {
            Indicator::Unmodified
        } else {
            Indicator::Modified
        }
    }

    /// Encoding-aware comparison of one observation against an expected class
    fn observation_matches(&self, obs: &Observation, expected: Expected, polyglot: &str) -> bool {
        let encoded_unmodified = match obs {
            Observation::Rendered(s) => encoded_match(s, polyglot).is_some(),
            _ => false,
        };

        // When the app hides errors, an expected error can surface as an
        // untouched or empty rendering instead
        if expected == Expected::Error
            && !self.state.errors_visible
            && (matches!(obs, Observation::Unmodified | Observation::Empty) || encoded_unmodified)
        {
            return true;
        }

        match (obs, expected) {
            (Observation::Error, Expected::Error)
            | (Observation::Empty, Expected::Empty)
            | (Observation::Unmodified, Expected::Unmodified) => true,
            (Observation::Rendered(_), Expected::Unmodified) => encoded_unmodified,
            (Observation::Rendered(s), Expected::Literal(t)) => {
                s == t
                    || encoded_match(s, t).is_some()
                    || (t.contains(ARBITRARY) && arbitrary_match(t, s))
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReflectionKind;
    use crate::scanner::catalog::{ERR3, NONERR2, NONERR3, NONERR_GOLANG};

    fn analysis<'a>(
        client: &'a HttpClient,
        config: &'a ScanConfig,
        location: InputLocation,
        name: &'a str,
    ) -> InputAnalysis<'a> {
        InputAnalysis::new(
            client,
            config,
            None,
            "http://testsite.example/",
            200,
            &[],
            location,
            name,
        )
    }

    fn body_reflection() -> Reflection {
        Reflection {
            kind: ReflectionKind::Body,
            header_name: None,
            reflection_url: None,
            preceding: "<p>Hello ".to_string(),
            subsequent: ", welcome!".to_string(),
        }
    }

    #[test]
    fn certainty_follows_the_outcome_table() {
        let config = ScanConfig::default();
        let client = HttpClient::from_config(&config).unwrap();

        let mut a = analysis(&client, &config, InputLocation::Query, "q");
        assert_eq!(a.assign_certainty(""), Certainty::None);
        assert_eq!(a.assign_certainty(UNKNOWN_ENGINE), Certainty::Low);
        assert_eq!(a.assign_certainty("Twig"), Certainty::Medium);
        a.state.modified_rendered_seen = true;
        assert_eq!(a.assign_certainty(UNKNOWN_ENGINE), Certainty::Medium);
        assert_eq!(a.assign_certainty("Twig"), Certainty::High);

        // the Host header always caps concrete identifications at Low
        let mut host = analysis(&client, &config, InputLocation::Header, "Host");
        host.state.modified_rendered_seen = true;
        assert_eq!(host.assign_certainty("Twig"), Certainty::Low);
        assert_eq!(host.assign_certainty(UNKNOWN_ENGINE), Certainty::Medium);
    }

    #[test]
    fn hidden_errors_match_unmodified_and_empty_observations() {
        let config = ScanConfig::default();
        let client = HttpClient::from_config(&config).unwrap();
        let mut a = analysis(&client, &config, InputLocation::Query, "q");

        a.state.errors_visible = true;
        assert!(!a.observation_matches(&Observation::Unmodified, Expected::Error, ERR1));
        a.state.errors_visible = false;
        assert!(a.observation_matches(&Observation::Unmodified, Expected::Error, ERR1));
        assert!(a.observation_matches(&Observation::Empty, Expected::Error, ERR1));
        assert!(!a.observation_matches(&Observation::Error, Expected::Unmodified, ERR1));
    }

    #[test]
    fn literal_observations_match_raw_encoded_and_wildcard_forms() {
        let config = ScanConfig::default();
        let client = HttpClient::from_config(&config).unwrap();
        let a = analysis(&client, &config, InputLocation::Query, "q");

        assert!(a.observation_matches(
            &Observation::Rendered("1@*#{1}".to_string()),
            Expected::Literal("1@*#{1}"),
            NONERR2,
        ));
        // HTML-encoded rendering of the same literal
        assert!(a.observation_matches(
            &Observation::Rendered("&lt;%=1%&gt;".to_string()),
            Expected::Literal("<%=1%>"),
            NONERR2,
        ));
        // encoded form of the polyglot itself counts as unmodified
        assert!(a.observation_matches(
            &Observation::Rendered("&lt;%=1%&gt;@*#{1}".to_string()),
            Expected::Unmodified,
            NONERR2,
        ));
        // wildcard literal
        assert!(a.observation_matches(
            &Observation::Rendered("{##}/*gopher42*/".to_string()),
            Expected::Literal("{##}/*ARBITRARY*/"),
            NONERR3,
        ));
    }

    #[test]
    fn first_error_polyglot_never_eliminates_error_expecting_engines() {
        let config = ScanConfig::default();
        let client = HttpClient::from_config(&config).unwrap();
        let mut a = analysis(&client, &config, InputLocation::Query, "q");
        let before = a.state.possible_count();

        // an unmodified observation matches no engine expecting an error,
        // but err1 must not prune those candidates
        let indicator = a.prune_candidates(ERR1, &[Observation::Unmodified], false);
        assert_eq!(indicator, Indicator::None);
        assert_eq!(a.state.possible_count(), before);

        // a later error polyglot does prune
        a.state.errors_visible = true;
        a.prune_candidates(ERR3, &[Observation::Unmodified], false);
        assert!(a.state.possible_count() < before);
        assert!(a.state.is_possible("Erb/Erubi/Erubis"));
        assert!(!a.state.is_possible("Jinja2/Jinja2 (Sandbox)"));
    }

    #[test]
    fn backslashed_dispatches_never_prune() {
        let config = ScanConfig::default();
        let client = HttpClient::from_config(&config).unwrap();
        let mut a = analysis(&client, &config, InputLocation::Query, "q");
        let before = a.state.possible_count();
        a.prune_candidates(ERR3, &[Observation::Error], true);
        assert_eq!(a.state.possible_count(), before);
    }

    #[test]
    fn impact_requires_discriminating_expectations() {
        let config = ScanConfig::default();
        let client = HttpClient::from_config(&config).unwrap();
        let mut a = analysis(&client, &config, InputLocation::Query, "q");
        a.state.reflected = true;

        assert!(a.has_impact(NONERR2));
        a.state.mark_tested(NONERR2);
        assert!(!a.has_impact(NONERR2));

        // without a reflection only the error/non-error split is observable
        a.state.reflected = false;
        a.state.set_template_engine(&["Twig", "Jinja2/Jinja2 (Sandbox)"]);
        // both expect "7}" for the PHP polyglot: indistinguishable by errors
        assert!(!a.has_impact(crate::scanner::catalog::NONERR_PHP));
        // html/template errors on nonerrRuby while Jinja2 renders: observable
        a.state.set_template_engine(&["html/template", "Jinja2/Jinja2 (Sandbox)"]);
        assert!(a.has_impact(crate::scanner::catalog::NONERR_RUBY));
    }

    #[test]
    fn impact_honors_the_length_limit() {
        let config = ScanConfig {
            length_limit: 5,
            ..ScanConfig::default()
        };
        let client = HttpClient::from_config(&config).unwrap();
        let mut a = analysis(&client, &config, InputLocation::Query, "q");
        a.state.reflected = true;
        // "<%=1%>@*#{1}" exceeds the limit, "{{.}}" just fits
        assert!(!a.has_impact(NONERR2));
        assert!(a.has_impact(NONERR_GOLANG));
    }

    #[test]
    fn sole_error_candidate_needs_a_non_error_confirmation() {
        let config = ScanConfig::default();
        let client = HttpClient::from_config(&config).unwrap();
        let mut a = analysis(&client, &config, InputLocation::Query, "q");
        a.state.reflected = true;
        a.state.set_template_engine(&["Erb/Erubi/Erubis"]);
        a.state.only_error_responses = true;

        // Erb expects an error for err3's sibling polyglots but renders nonerr2
        assert!(!a.has_impact(ERR1));
        assert!(a.has_impact(NONERR2));
    }

    #[test]
    fn thymeleaf_marker_identifies_both_variants() {
        let config = ScanConfig::default();
        let client = HttpClient::from_config(&config).unwrap();
        let mut a = analysis(&client, &config, InputLocation::Query, "q");
        a.state.reflected = true;

        let body = format!(
            "<html>org.thymeleaf.exceptions.TemplateProcessingException: {ERR1}</html>"
        );
        let reflection = body_reflection();
        let (verdict, _) = a.check_body(&body, ERR1, &reflection, false);
        assert!(matches!(verdict, BodyVerdict::Identified));
        assert_eq!(a.state.possible_names(), "Thymeleaf, Thymeleaf (Inline)");
    }

    #[test]
    fn ng_binding_replacement_identifies_angularjs() {
        let config = ScanConfig::default();
        let client = HttpClient::from_config(&config).unwrap();
        let mut a = analysis(&client, &config, InputLocation::Query, "q");
        a.state.reflected = true;

        let body = "<span class=\"ng-binding\">rendered</span>, welcome!";
        let (verdict, _) = a.check_body(body, NONERR2, &body_reflection(), false);
        assert!(matches!(verdict, BodyVerdict::Identified));
        assert_eq!(a.state.possible_names(), "AngularJS");
    }

    #[test]
    fn fragments_collapse_to_unmodified_and_empty() {
        let config = ScanConfig::default();
        let client = HttpClient::from_config(&config).unwrap();
        let mut a = analysis(&client, &config, InputLocation::Query, "q");
        a.state.reflected = true;
        let reflection = body_reflection();

        let body = format!("<p>Hello {NONERR2}, welcome!");
        let (verdict, _) = a.check_body(&body, NONERR2, &reflection, false);
        assert!(matches!(
            verdict,
            BodyVerdict::Observed(Observation::Unmodified)
        ));

        let body = "<p>Hello , welcome!";
        let (verdict, _) = a.check_body(body, NONERR2, &reflection, false);
        assert!(matches!(verdict, BodyVerdict::Observed(Observation::Empty)));
    }

    #[test]
    fn distinct_rendering_sets_the_high_certainty_witness() {
        let config = ScanConfig::default();
        let client = HttpClient::from_config(&config).unwrap();
        let mut a = analysis(&client, &config, InputLocation::Query, "q");
        a.state.reflected = true;
        let reflection = body_reflection();

        let body = "<p>Hello 1@*#{1}, welcome!";
        let (verdict, _) = a.check_body(body, NONERR2, &reflection, false);
        assert!(matches!(
            verdict,
            BodyVerdict::Observed(Observation::Rendered(_))
        ));
        assert!(a.state.modified_rendered_seen);
    }

    #[test]
    fn error_fragments_are_classified_as_errors() {
        let config = ScanConfig::default();
        let client = HttpClient::from_config(&config).unwrap();
        let mut a = analysis(&client, &config, InputLocation::Query, "q");
        a.state.reflected = true;

        let body = "<p>Hello unexpected token at line 3, welcome!";
        let (verdict, _) = a.check_body(body, NONERR2, &body_reflection(), false);
        assert!(matches!(verdict, BodyVerdict::Observed(Observation::Error)));
        assert!(!a.state.modified_rendered_seen);
    }
}
