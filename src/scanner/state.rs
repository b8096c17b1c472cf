//! Per-input scan state.
//!
//! One value of [`ScanState`] lives for exactly one input point's analysis;
//! the coordinator creates a fresh one before any polyglot is sent. The
//! candidate set only shrinks while dispatching, except through
//! [`ScanState::set_template_engine`] when a distinctive engine marker is
//! found in a response.

use crate::models::Reflection;
use crate::scanner::catalog::ENGINES;
use std::collections::HashSet;

/// Outcome of narrowing the candidate set down
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifiedEngine {
    /// More than one candidate remains
    Multiple,
    /// Every known engine has been eliminated
    Unknown,
    /// Exactly one candidate remains
    Single(&'static str),
}

/// Mutable state for one input point's scan
#[derive(Debug)]
pub struct ScanState {
    possible: HashSet<&'static str>,
    tested: HashSet<&'static str>,
    pub reflections: Vec<Reflection>,
    /// The nonce probe reappeared somewhere in the response
    pub reflected: bool,
    /// The first universal error polyglot produced a visible error
    pub errors_visible: bool,
    /// Every dispatch so far came back as an error (or was discarded)
    pub only_error_responses: bool,
    /// At least one response matched an engine's distinctive rendered literal
    pub modified_rendered_seen: bool,
    /// The URL's baseline status changed mid-scan; abandon this input
    pub status_code_changed: bool,
    /// Polyglots dispatched for this input (cross-checks excluded)
    pub polyglots_sent: u64,
}

impl ScanState {
    pub fn new() -> Self {
        Self {
            possible: ENGINES.iter().map(|e| e.name).collect(),
            tested: HashSet::new(),
            reflections: Vec::new(),
            reflected: false,
            errors_visible: true,
            only_error_responses: true,
            modified_rendered_seen: false,
            status_code_changed: false,
            polyglots_sent: 0,
        }
    }

    pub fn is_tested(&self, polyglot: &str) -> bool {
        self.tested.contains(polyglot)
    }

    /// Marks a catalog polyglot as dispatched for this input
    pub fn mark_tested(&mut self, polyglot: &'static str) {
        self.tested.insert(polyglot);
    }

    pub fn is_possible(&self, engine: &str) -> bool {
        self.possible.contains(engine)
    }

    pub fn remove_engine(&mut self, engine: &str) {
        self.possible.remove(engine);
    }

    pub fn possible_count(&self) -> usize {
        self.possible.len()
    }

    /// Restricts the candidate set to exactly the named engines
    pub fn set_template_engine(&mut self, names: &[&'static str]) {
        self.possible = ENGINES
            .iter()
            .map(|e| e.name)
            .filter(|name| names.contains(name))
            .collect();
    }

    /// Collapses the candidate set into an identification outcome
    pub fn identified_engine(&self) -> IdentifiedEngine {
        let mut single = None;
        for engine in ENGINES.iter() {
            if self.possible.contains(engine.name) {
                if single.is_some() {
                    return IdentifiedEngine::Multiple;
                }
                single = Some(engine.name);
            }
        }
        match single {
            Some(name) => IdentifiedEngine::Single(name),
            None => IdentifiedEngine::Unknown,
        }
    }

    /// All remaining candidate names, comma-joined in catalog order
    pub fn possible_names(&self) -> String {
        ENGINES
            .iter()
            .map(|e| e.name)
            .filter(|name| self.possible.contains(name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for ScanState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_holds_every_engine() {
        let state = ScanState::new();
        assert_eq!(state.possible_count(), ENGINES.len());
        assert!(state.errors_visible);
        assert!(state.only_error_responses);
        assert!(!state.modified_rendered_seen);
        assert_eq!(state.identified_engine(), IdentifiedEngine::Multiple);
    }

    #[test]
    fn removing_all_but_one_identifies() {
        let mut state = ScanState::new();
        for engine in ENGINES.iter().skip(1) {
            state.remove_engine(engine.name);
        }
        assert_eq!(
            state.identified_engine(),
            IdentifiedEngine::Single(ENGINES[0].name)
        );
        state.remove_engine(ENGINES[0].name);
        assert_eq!(state.identified_engine(), IdentifiedEngine::Unknown);
    }

    #[test]
    fn set_template_engine_reinstates_named_engines() {
        let mut state = ScanState::new();
        state.remove_engine("Thymeleaf");
        state.set_template_engine(&["Thymeleaf", "Thymeleaf (Inline)"]);
        assert_eq!(state.possible_count(), 2);
        assert!(state.is_possible("Thymeleaf"));
        assert!(state.is_possible("Thymeleaf (Inline)"));
        assert_eq!(state.possible_names(), "Thymeleaf, Thymeleaf (Inline)");
    }

    #[test]
    fn tested_polyglots_are_tracked() {
        use crate::scanner::catalog::ERR1;
        let mut state = ScanState::new();
        assert!(!state.is_tested(ERR1));
        state.mark_tested(ERR1);
        assert!(state.is_tested(ERR1));
    }
}
