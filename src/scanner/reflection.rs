//! Reflection analysis: discovering where injected input reappears.
//!
//! A random nonce is placed at the input point; every occurrence in the
//! response (body, header values, configured probe URLs) becomes a
//! [`Reflection`] whose context windows anchor later fragment extraction.

use crate::error::Result;
use crate::http::RequestSpec;
use crate::models::{InputLocation, Reflection, ReflectionKind};
use crate::scanner::analyzer::InputAnalysis;
use rand::Rng;
use tracing::{debug, info};

/// Base32 alphabet; keeps nonces alphanumeric and case-stable so they
/// survive case-insensitive header handling
const TOKEN_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

const TOKEN_LENGTH: usize = 16;

/// Generates a random reflection nonce
pub fn reflection_token(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

fn tail_chars(s: &str, n: usize) -> String {
    let count = s.chars().count();
    if count <= n {
        s.to_string()
    } else {
        s.chars().skip(count - n).collect()
    }
}

fn head_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

impl<'a> InputAnalysis<'a> {
    /// Sends a nonce probe and records every place it reappears.
    /// Returns whether any reflection was found.
    pub(crate) async fn analyze_reflection(&mut self) -> Result<bool> {
        let mut spec = RequestSpec::build(self.url, self.config)?;

        let mut token_length = TOKEN_LENGTH;
        if self.config.length_limit > 0 && self.config.length_limit < token_length {
            token_length = self.config.length_limit;
        }
        let token = reflection_token(token_length);

        match self.location {
            InputLocation::Query => spec.set_query(self.name, &token),
            InputLocation::PostBody => spec.set_post(self.name, &token, self.post_params),
            InputLocation::Header => spec.set_header(self.name, &token),
        }

        let response = self.client.execute(&spec).await?;

        for (header, value) in &response.headers {
            let value = value.to_str().unwrap_or_default();
            if let Some((preceding, subsequent)) = value.split_once(&token) {
                info!(
                    "Value {token} of {} {} is being reflected in the {header} header",
                    self.location.label(),
                    self.name
                );
                self.state.reflections.push(Reflection {
                    kind: ReflectionKind::Header,
                    header_name: Some(header.to_string()),
                    reflection_url: None,
                    preceding: preceding.to_string(),
                    subsequent: subsequent.to_string(),
                });
            }
        }

        let count = response.body.matches(&token).count();
        if count > 0 {
            info!(
                "Value {token} of {} {} is being reflected {count} time(s) in the response body",
                self.location.label(),
                self.name
            );
            self.add_body_reflections(&response.body, &token, None);
        }

        for probe_url in &self.config.reflection_urls.clone() {
            let body = self.reflection_check_request(probe_url).await;
            let count = body.matches(&token).count();
            if count > 0 {
                info!(
                    "Value {token} of {} {} is being reflected {count} time(s) in the response body of {probe_url}",
                    self.location.label(),
                    self.name
                );
                self.add_body_reflections(&body, &token, Some(probe_url.clone()));
            }
        }

        Ok(!self.state.reflections.is_empty())
    }

    /// Fetches a reflection probe URL with a plain request (no payload data)
    pub(crate) async fn reflection_check_request(&self, u: &str) -> String {
        let mut plain_config = self.config.clone();
        plain_config.data = String::new();
        plain_config.parameters = Vec::new();

        let spec = match RequestSpec::build(u, &plain_config) {
            Ok(spec) => spec,
            Err(e) => {
                debug!("Reflection check request for {u} failed: {e}");
                return String::new();
            }
        };
        match self.client.execute(&spec).await {
            Ok(response) => response.body,
            Err(e) => {
                debug!("Reflection check request for {u} failed: {e}");
                String::new()
            }
        }
    }

    /// Records one reflection per occurrence of the nonce in a body
    fn add_body_reflections(&mut self, body: &str, token: &str, reflection_url: Option<String>) {
        let mut rest = body;
        while let Some((preceding, subsequent)) = rest.split_once(token) {
            self.state.reflections.push(Reflection {
                kind: ReflectionKind::Body,
                header_name: None,
                reflection_url: reflection_url.clone(),
                preceding: tail_chars(preceding, self.config.preceding_length),
                subsequent: head_chars(subsequent, self.config.subsequent_length),
            });
            rest = subsequent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_has_requested_length_and_alphabet() {
        let token = reflection_token(16);
        assert_eq!(token.len(), 16);
        assert!(token.bytes().all(|b| TOKEN_ALPHABET.contains(&b)));
    }

    #[test]
    fn tokens_differ() {
        assert_ne!(reflection_token(16), reflection_token(16));
    }

    #[test]
    fn window_truncation() {
        assert_eq!(tail_chars("abcdefgh", 3), "fgh");
        assert_eq!(tail_chars("ab", 3), "ab");
        assert_eq!(head_chars("abcdefgh", 3), "abc");
    }
}
