//! Fragment extraction and encoding-aware matching.
//!
//! Rendered fragments may come back raw, HTML-entity encoded or URL encoded
//! depending on where the input is embedded. All literal comparisons in the
//! scanner go through these helpers so every call site tolerates the same
//! set of transformations.

use crate::scanner::catalog::ARBITRARY;
use regex::Regex;
use std::borrow::Cow;

/// Result of extracting the text between two anchors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Neither anchor was found; the reflection vanished entirely
    BothMissing,
    /// Only the subsequent anchor was found
    PrecedingMissing,
    /// Only the preceding anchor was found
    SubsequentMissing,
    /// The text between the first preceding and the last subsequent anchor
    Fragment(String),
}

/// Extracts the substring between the first occurrence of `preceding` and
/// the *last* occurrence of `subsequent`
pub fn between(value: &str, preceding: &str, subsequent: &str) -> Extraction {
    let pos_first = value.find(preceding);
    let pos_last = value.rfind(subsequent);

    match (pos_first, pos_last) {
        (None, None) => Extraction::BothMissing,
        (None, Some(_)) => Extraction::PrecedingMissing,
        (Some(_), None) => Extraction::SubsequentMissing,
        (Some(first), Some(last)) => {
            let start = first + preceding.len();
            if start >= last {
                // anchors overlap or touch, nothing in between
                Extraction::Fragment(String::new())
            } else {
                Extraction::Fragment(value[start..last].to_string())
            }
        }
    }
}

/// HTML-encodes text the way template engines escape output
pub fn html_encode(s: &str) -> String {
    html_escape::encode_text(s).into_owned()
}

/// Decodes HTML entities
pub fn html_decode(s: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(s)
}

/// Percent-encodes like a URL path segment (space becomes %20)
pub fn path_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Percent-encodes like a form value (space becomes +)
pub fn query_encode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

/// Checks whether `response` is an HTML- or URL-encoded form of `target`.
/// Returns the human-readable label of the encoding on a match.
///
/// Both encode and decode directions are tried for HTML, since escaping is
/// not symmetric across entity styles (`&#34;` vs `&quot;`).
pub fn encoded_match(response: &str, target: &str) -> Option<&'static str> {
    if response == html_encode(target) || html_decode(response) == target {
        Some(" (HTML encoded)")
    } else if response == path_encode(target) || response == query_encode(target) {
        Some(" (URL encoded)")
    } else {
        None
    }
}

/// Matches a rendered fragment against an expected literal containing the
/// ARBITRARY wildcard.
///
/// The literal is split on ARBITRARY; the surrounding parts are regex-escaped
/// and the wildcard becomes `.*`, or `\w{n}` for the `ARBITRARYnARBITRARY`
/// form. Each encoding variant of the literal is tried, and for the raw
/// variant the entity-decoded fragment as well.
pub fn arbitrary_match(expected: &str, response: &str) -> bool {
    let variants = [
        expected.to_string(),
        html_encode(expected),
        query_encode(expected),
        path_encode(expected),
    ];
    for (index, variant) in variants.iter().enumerate() {
        let parts: Vec<&str> = variant.split(ARBITRARY).collect();
        if parts.len() < 2 {
            continue;
        }
        let wildcard = if parts.len() == 3 {
            format!(r"\w{{{}}}", parts[1])
        } else {
            ".*".to_string()
        };
        let pattern = format!(
            "(?s)^{}{}{}$",
            regex::escape(parts[0]),
            wildcard,
            regex::escape(parts[parts.len() - 1])
        );
        let Ok(re) = Regex::new(&pattern) else {
            continue;
        };
        if re.is_match(response) {
            return true;
        }
        if index == 0 && re.is_match(&html_decode(response)) {
            return true;
        }
    }
    false
}

/// Escapes every character of a polyglot with a preceding backslash.
///
/// Re-sending the escaped form separates template-induced errors from
/// transport or parser errors: a template engine no longer sees its
/// delimiters, so an error that persists is not the engine's doing.
pub fn backslash_polyglot(polyglot: &str) -> String {
    let mut result = String::with_capacity(polyglot.len() * 2);
    for c in polyglot.chars() {
        result.push('\\');
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::catalog::NONERR2;

    #[test]
    fn between_extracts_fragment() {
        assert_eq!(
            between("Hello FRAGMENT, welcome!", "Hello ", ", welcome!"),
            Extraction::Fragment("FRAGMENT".to_string())
        );
    }

    #[test]
    fn between_uses_last_subsequent_occurrence() {
        // the fragment itself contains the subsequent anchor
        assert_eq!(
            between("pre A, post B, post", "pre ", ", post"),
            Extraction::Fragment("A, post B".to_string())
        );
    }

    #[test]
    fn between_reports_missing_anchors() {
        assert_eq!(between("abc", "x", "y"), Extraction::BothMissing);
        assert_eq!(between("abc y", "x", "y"), Extraction::PrecedingMissing);
        assert_eq!(between("x abc", "x", "y"), Extraction::SubsequentMissing);
    }

    #[test]
    fn between_with_touching_anchors_is_empty() {
        assert_eq!(
            between("prepost", "pre", "post"),
            Extraction::Fragment(String::new())
        );
    }

    #[test]
    fn encoded_match_html_both_directions() {
        assert_eq!(encoded_match("&lt;%=1%&gt;", "<%=1%>"), Some(" (HTML encoded)"));
        // entity style the encoder itself wouldn't produce
        assert_eq!(encoded_match("&#60;%=1%&#62;", "<%=1%>"), Some(" (HTML encoded)"));
    }

    #[test]
    fn encoded_match_url_forms() {
        assert_eq!(
            encoded_match(&query_encode(NONERR2), NONERR2),
            Some(" (URL encoded)")
        );
        assert_eq!(encoded_match("abc", "xyz"), None);
    }

    #[test]
    fn arbitrary_wildcard_matches_any_text() {
        assert!(arbitrary_match("{##}/*ARBITRARY*/", "{##}/*whatever 123*/"));
        assert!(!arbitrary_match("{##}/*ARBITRARY*/", "{##}/*unterminated"));
    }

    #[test]
    fn arbitrary_counted_form_matches_word_chars() {
        let expected = "#&lt;Mustache:0xARBITRARY16ARBITRARY&gt;";
        assert!(arbitrary_match(expected, "#&lt;Mustache:0xabcdef0123456789&gt;"));
        assert!(!arbitrary_match(expected, "#&lt;Mustache:0xabc&gt;"));
    }

    #[test]
    fn arbitrary_matches_double_encoded_response() {
        // the response was entity-encoded once more on its way back to us
        assert!(arbitrary_match(
            "#&lt;Mustache:0xARBITRARY16ARBITRARY&gt;",
            "#&amp;lt;Mustache:0xabcdef0123456789&amp;gt;"
        ));
    }

    #[test]
    fn backslash_escapes_every_char() {
        assert_eq!(backslash_polyglot("{{"), "\\{\\{");
        assert_eq!(backslash_polyglot("a b"), "\\a\\ \\b");
    }
}
