//! Global stylesheet model and the style cascade.
//!
//! The `{@global-style}` block is carried verbatim for embedding, but the
//! renderer also needs to *resolve* it: when several sources style the same
//! element, precedence is tag rule, then class rules, then id rule, then the
//! element's own inline style. The cascade is an ordered merge where later
//! sources override identical properties and non-conflicting properties from
//! every source are retained.

use crate::ast::Attributes;

/// What a global stylesheet rule selects on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `h1`, `p`, `ul`, ...
    Tag(String),
    /// `.wide`
    Class(String),
    /// `#intro`
    Id(String),
}

/// One parsed rule: selector plus declarations in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub selector: Selector,
    pub declarations: Vec<(String, String)>,
}

/// A parsed global stylesheet.
///
/// Parsing is deliberately naive and forgiving: simple selectors only,
/// comma lists split into separate rules, anything unrecognizable skipped.
/// The raw CSS text is still embedded verbatim by the renderer; this model
/// exists only to drive the cascade.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    rules: Vec<Rule>,
}

impl Stylesheet {
    /// Parse raw CSS into cascade rules.
    pub fn parse(css: &str) -> Self {
        let mut rules = Vec::new();
        for chunk in css.split('}') {
            let Some((selectors, body)) = chunk.split_once('{') else {
                continue;
            };
            let declarations = parse_declarations(body);
            if declarations.is_empty() {
                continue;
            }
            for selector in selectors.split(',') {
                let Some(selector) = parse_selector(selector) else {
                    continue;
                };
                rules.push(Rule {
                    selector,
                    declarations: declarations.clone(),
                });
            }
        }
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn declarations_for<'a>(
        &'a self,
        wanted: &'a Selector,
    ) -> impl Iterator<Item = &'a [(String, String)]> + 'a {
        self.rules
            .iter()
            .filter(move |rule| rule.selector == *wanted)
            .map(|rule| rule.declarations.as_slice())
    }

    /// Resolve the effective style for one element.
    ///
    /// Sources are merged in fixed precedence order; within one source tier
    /// rules apply in stylesheet order, so "last write wins" holds across
    /// the whole cascade.
    pub fn effective_style(&self, tag: &str, attrs: &Attributes) -> Vec<(String, String)> {
        let mut merged: Vec<(String, String)> = Vec::new();

        for decls in self.declarations_for(&Selector::Tag(tag.to_string())) {
            merge_declarations(&mut merged, decls);
        }
        for class in &attrs.classes {
            for decls in self.declarations_for(&Selector::Class(class.clone())) {
                merge_declarations(&mut merged, decls);
            }
        }
        if let Some(id) = &attrs.id {
            for decls in self.declarations_for(&Selector::Id(id.clone())) {
                merge_declarations(&mut merged, decls);
            }
        }
        merge_declarations(&mut merged, &attrs.style);

        merged
    }
}

/// Overwrite-or-append each declaration, keeping first-seen property order.
fn merge_declarations(dst: &mut Vec<(String, String)>, src: &[(String, String)]) {
    for (prop, value) in src {
        if let Some(existing) = dst.iter_mut().find(|(p, _)| p == prop) {
            existing.1 = value.clone();
        } else {
            dst.push((prop.clone(), value.clone()));
        }
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    let selector = selector.trim();
    if selector.is_empty() || selector.contains(char::is_whitespace) {
        return None;
    }
    if let Some(class) = selector.strip_prefix('.') {
        return (!class.is_empty()).then(|| Selector::Class(class.to_string()));
    }
    if let Some(id) = selector.strip_prefix('#') {
        return (!id.is_empty()).then(|| Selector::Id(id.to_string()));
    }
    if selector.starts_with('@') {
        return None;
    }
    Some(Selector::Tag(selector.to_string()))
}

fn parse_declarations(body: &str) -> Vec<(String, String)> {
    let mut declarations = Vec::new();
    for item in body.split(';') {
        let Some((prop, value)) = item.split_once(':') else {
            continue;
        };
        let (prop, value) = (prop.trim(), value.trim());
        if !prop.is_empty() && !value.is_empty() {
            declarations.push((prop.to_string(), value.to_string()));
        }
    }
    declarations
}
