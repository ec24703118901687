//! Text heuristics over component sources.
//!
//! Pure functions, no I/O. Brace imports may span lines; aliased and default
//! imports are not recognised.

use regex::{escape, Regex};

use crate::{component::ComponentShape, config::compile_pattern, Result};

fn matches(pattern: &str, content: &str) -> bool {
    Regex::new(pattern).is_ok_and(|re| re.is_match(content))
}

/// Whether the first statement is the `"use client"` directive.
pub fn has_client_directive(content: &str) -> bool {
    let head = content.trim_start_matches('\u{feff}').trim_start();
    head.starts_with("\"use client\"") || head.starts_with("'use client'")
}

fn brace_import_pattern(name: &str) -> String {
    format!(r"import\s*\{{[^}}]*\b{}\b[^}}]*\}}\s*from", escape(name))
}

/// Brace-import detector for the client-only primitives, compiled once per
/// scan.
#[derive(Debug, Clone)]
pub struct PrimitiveImports {
    patterns: Vec<Regex>,
}

impl PrimitiveImports {
    pub fn new<S: AsRef<str>>(primitives: &[S]) -> Result<Self> {
        let patterns = primitives
            .iter()
            .map(|name| compile_pattern(&brace_import_pattern(name.as_ref())))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Whether any primitive is brace-imported in `content`.
    pub fn found_in(&self, content: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(content))
    }
}

/// Literal `value` in either quote style.
pub fn has_string_literal(content: &str, value: &str) -> bool {
    content.contains(&format!("\"{value}\"")) || content.contains(&format!("'{value}'"))
}

/// Whether `name` is brace-imported from the module `from`.
pub fn has_named_import(content: &str, name: &str, from: &str) -> bool {
    matches(
        &format!(
            r#"(?i)import\s*\{{[^}}]*\b{}\b[^}}]*\}}\s*from\s*['"]{}['"]"#,
            escape(name),
            escape(from)
        ),
        content,
    )
}

/// `const NAME =` or `function NAME`.
pub fn declares_function(content: &str, name: &str) -> bool {
    let name = escape(name);
    matches(
        &format!(r"\bconst\s+{name}\s*=|\bfunction\s+{name}\b"),
        content,
    )
}

/// `Component.Part = ...`
pub fn attaches_part(content: &str, component: &str, part: &str) -> bool {
    matches(
        &format!(r"\b{}\.{}\s*=", escape(component), escape(part)),
        content,
    )
}

/// Whether `identifier` occurs as a whole word.
pub fn mentions(content: &str, identifier: &str) -> bool {
    matches(&format!(r"\b{}\b", escape(identifier)), content)
}

/// A component as seen through its source text.
#[derive(Debug, Clone)]
pub struct SourceComponent {
    name: String,
    content: String,
}

impl SourceComponent {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl ComponentShape for SourceComponent {
    fn component_name(&self) -> &str {
        &self.name
    }

    fn has_part(&self, part: &str) -> bool {
        attaches_part(&self.content, &self.name, part)
    }

    fn declares_client_directive(&self) -> bool {
        has_client_directive(&self.content)
    }
}
