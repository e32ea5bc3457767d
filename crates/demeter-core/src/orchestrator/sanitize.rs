//! Model output sanitization.
//!
//! Model replies sometimes leak internal scaffolding: channel markers, role
//! labels, inline function-call JSON, or raw chart payloads that are already
//! delivered through structured metadata. This module strips all of that and
//! normalizes the result into a single prefixed reply. Every pass is
//! idempotent, so sanitizing an already-clean reply is a no-op.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

/// Prefix every outgoing reply carries exactly once
pub(crate) const REPLY_PREFIX: &str = "Coach:";

/// Reply used when sanitization leaves nothing behind
pub(crate) const EMPTY_REPLY_FALLBACK: &str = "I could not generate a response.";

/// Cap on marked-call removal passes, guards against pathological input
const MAX_STRIP_PASSES: usize = 16;

fn channel_markers() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<\|[^>]*>").unwrap())
}

fn role_labels() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bassistant\s*(?:final|commentary)\b:?").unwrap())
}

fn call_markers() -> &'static Vec<Regex> {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        ["to=functions.", "tool_call:", "function_call:"]
            .iter()
            .map(|marker| {
                Regex::new(&format!("(?i){}", regex::escape(marker))).unwrap()
            })
            .collect()
    })
}

fn chart_url_fragment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)\{[^{}]*"chart_?url"[^{}]*\}"#).unwrap())
}

fn markdown_image() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap())
}

fn repeated_spaces() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]{2,}").unwrap())
}

fn repeated_newlines() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").unwrap())
}

/// Sanitize a raw model reply into the final outgoing text
#[must_use]
pub(crate) fn sanitize_response(raw: &str) -> String {
    let mut text = channel_markers().replace_all(raw, "").into_owned();
    text = role_labels().replace_all(&text, "").into_owned();

    for marker in call_markers() {
        let mut passes = 0;
        while let Some(range) = find_marked_call(&text, marker) {
            text.replace_range(range, "");
            passes += 1;
            if passes >= MAX_STRIP_PASSES {
                break;
            }
        }
    }

    text = chart_url_fragment().replace_all(&text, "").into_owned();
    text = markdown_image().replace_all(&text, "").into_owned();

    text = repeated_spaces().replace_all(&text, " ").into_owned();
    text = repeated_newlines().replace_all(&text, "\n\n").into_owned();
    let text = text.trim();

    let body = if text.is_empty() {
        EMPTY_REPLY_FALLBACK
    } else {
        text
    };
    enforce_reply_prefix(body)
}

/// Locate a marker followed by a balanced JSON object.
///
/// Returns the byte range covering the marker through the object's closing
/// brace. An unmatched brace or a marker with no object leaves the text
/// untouched by returning `None`.
fn find_marked_call(text: &str, marker: &Regex) -> Option<Range<usize>> {
    let m = marker.find(text)?;
    let after = &text[m.end()..];
    let open_rel = after.find('{')?;

    // Only skip whitespace and a short function-name token between the
    // marker and the object, otherwise the marker is part of prose.
    if after[..open_rel]
        .chars()
        .any(|c| !c.is_whitespace() && !c.is_alphanumeric() && c != '_' && c != '.')
    {
        return None;
    }

    let open = m.end() + open_rel;
    let mut depth = 0usize;
    for (i, c) in text[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(m.start()..open + i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Ensure the reply starts with the prefix exactly once, on its own line
fn enforce_reply_prefix(body: &str) -> String {
    let mut rest = body;
    loop {
        let trimmed = rest.trim_start();
        // get() rejects a slice point inside a multibyte character.
        match trimmed.get(..REPLY_PREFIX.len()) {
            Some(head) if head.eq_ignore_ascii_case(REPLY_PREFIX) => {
                rest = &trimmed[REPLY_PREFIX.len()..];
            }
            _ => {
                rest = trimmed;
                break;
            }
        }
    }
    format!("{REPLY_PREFIX}\n{rest}")
}
