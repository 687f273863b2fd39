//! Trailing attribute payload parsing.
//!
//! A block line may end with `{@ prop: value; }` (inline CSS declarations)
//! or `{#id .class1 .class2}` (id/class selectors). The binder strips the
//! payload from the visible text and returns the parsed attributes; a brace
//! group that is not a recognizable payload stays in the text as literal
//! characters.

use crate::ast::Attributes;

/// Outcome of stripping trailing payloads from one line of text.
#[derive(Debug, Default)]
pub struct StripOutcome {
    /// The visible text with payloads removed and whitespace trimmed.
    pub text: String,
    /// Attributes accumulated from the payloads, possibly empty.
    pub attrs: Attributes,
    /// Payload bodies that looked like attributes but parsed to nothing.
    pub malformed: Vec<String>,
}

/// Strip every trailing `{...}` attribute payload from `text`.
///
/// Payloads are peeled right-to-left, so `Title {.wide} {#intro}` binds both
/// groups. Each payload's attributes are merged with later-wins semantics.
pub fn strip_trailing(text: &str) -> StripOutcome {
    let mut outcome = StripOutcome::default();
    let mut remaining = text.trim_end();
    // Collected innermost-last; merge order must follow source order.
    let mut payload_attrs: Vec<Attributes> = Vec::new();

    while let Some(body) = trailing_payload(remaining) {
        match parse_payload(body) {
            PayloadResult::Attrs(attrs) => {
                payload_attrs.push(attrs);
                remaining = remaining[..remaining.len() - body.len() - 2].trim_end();
            }
            PayloadResult::Empty => {
                outcome.malformed.push(body.to_string());
                remaining = remaining[..remaining.len() - body.len() - 2].trim_end();
            }
            PayloadResult::NotAttributes => break,
        }
    }

    for attrs in payload_attrs.into_iter().rev() {
        outcome.attrs.merge(attrs);
    }
    outcome.text = remaining.trim().to_string();
    outcome
}

/// Return the body of a `{...}` group at the very end of `text`, if any.
fn trailing_payload(text: &str) -> Option<&str> {
    if !text.ends_with('}') {
        return None;
    }
    let open = text.rfind('{')?;
    let body = &text[open + 1..text.len() - 1];
    // A '}' before the matching '{' would mean nesting; not a payload.
    if body.contains('{') || body.contains('}') {
        return None;
    }
    Some(body)
}

enum PayloadResult {
    /// Parsed into at least one attribute.
    Attrs(Attributes),
    /// Shaped like a payload but every declaration was malformed.
    Empty,
    /// Not an attribute payload at all; leave the braces in the text.
    NotAttributes,
}

fn parse_payload(body: &str) -> PayloadResult {
    let body = body.trim();
    if let Some(decls) = body.strip_prefix('@') {
        return parse_style_payload(decls);
    }
    if body
        .split_whitespace()
        .next()
        .is_some_and(|tok| tok.starts_with('#') || tok.starts_with('.'))
    {
        return parse_selector_payload(body);
    }
    PayloadResult::NotAttributes
}

/// `@ prop: value; prop2: value2;` - declarations without a colon are dropped.
fn parse_style_payload(decls: &str) -> PayloadResult {
    let mut attrs = Attributes::default();
    let mut saw_decl = false;
    for item in decls.split(';') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        saw_decl = true;
        if let Some((prop, value)) = item.split_once(':') {
            let (prop, value) = (prop.trim(), value.trim());
            if !prop.is_empty() && !value.is_empty() {
                attrs.merge(Attributes {
                    style: vec![(prop.to_string(), value.to_string())],
                    ..Attributes::default()
                });
            }
        }
    }
    if attrs.style.is_empty() {
        if saw_decl {
            PayloadResult::Empty
        } else {
            // `{@}` carries nothing but is harmless; strip it quietly.
            PayloadResult::Attrs(attrs)
        }
    } else {
        PayloadResult::Attrs(attrs)
    }
}

/// `#id .class1 .class2` - every token must be a selector; the last of
/// several `#id` tokens wins.
fn parse_selector_payload(body: &str) -> PayloadResult {
    let mut attrs = Attributes::default();
    for token in body.split_whitespace() {
        if let Some(class) = token.strip_prefix('.') {
            if !class.is_empty() && !attrs.classes.contains(&class.to_string()) {
                attrs.classes.push(class.to_string());
            }
        } else if let Some(id) = token.strip_prefix('#') {
            if !id.is_empty() {
                attrs.id = Some(id.to_string());
            }
        } else {
            return PayloadResult::NotAttributes;
        }
    }
    if attrs.is_empty() {
        PayloadResult::Empty
    } else {
        PayloadResult::Attrs(attrs)
    }
}
