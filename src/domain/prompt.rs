//! Prompt templates with `${var:name}` placeholders
//!
//! Unknown placeholders render as empty strings.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{var:([a-zA-Z0-9][-a-zA-Z0-9_]*)\}").expect("valid variable regex"));

/// Render a template with the given variables
pub fn render(template: &str, variables: &HashMap<&str, &str>) -> String {
    VARIABLE_PATTERN
        .replace_all(template, |caps: &Captures| {
            variables.get(&caps[1]).copied().unwrap_or_default().to_string()
        })
        .into_owned()
}
