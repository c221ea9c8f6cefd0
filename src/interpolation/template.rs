//! `{{ expression }}` template interpolation
//!
//! A template that is exactly one placeholder resolves to the referenced
//! value's native type. Any other template is rendered as text, with each
//! placeholder formatted and spliced in place.

use super::format::format_value;
use super::{Interpolator, ReferenceKind, VariableSource, Warnings};
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::ops::Range;
use std::sync::LazyLock;

/// Matches `{{ ... }}`; the inner expression may be empty or span lines
static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{\{(.*?)\}\}").expect("Invalid regex pattern"));

/// A placeholder found while scanning a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'t> {
    /// Byte range of the whole `{{ ... }}` span
    pub span: Range<usize>,
    /// Inner expression with surrounding whitespace trimmed
    pub expression: &'t str,
}

impl Placeholder<'_> {
    pub fn kind(&self) -> ReferenceKind {
        ReferenceKind::of(self.expression)
    }
}

/// Scan a template left to right for placeholders
pub fn placeholders(template: &str) -> impl Iterator<Item = Placeholder<'_>> {
    PLACEHOLDER_PATTERN.captures_iter(template).filter_map(|cap| {
        let whole = cap.get(0)?;
        let inner = cap.get(1)?;
        Some(Placeholder {
            span: whole.range(),
            expression: inner.as_str().trim(),
        })
    })
}

/// List the expressions referenced by a template, without resolving them
///
/// # Examples
///
/// ```
/// use flowbind::extract_references;
///
/// let refs = extract_references("Hi {{ user.name }}, see {{$.links[0]}}");
/// assert_eq!(refs, vec!["user.name", "$.links[0]"]);
/// ```
pub fn extract_references(template: &str) -> Vec<&str> {
    placeholders(template).map(|p| p.expression).collect()
}

impl<S: VariableSource + ?Sized> Interpolator<'_, S> {
    /// Interpolate a single template string.
    ///
    /// Returns `None` only when the template is a lone placeholder whose
    /// reference does not resolve; partial templates always yield a string.
    pub fn interpolate(&self, template: &str) -> Option<Value> {
        self.render(template, &mut Warnings::discard())
    }

    pub(crate) fn render(&self, template: &str, warnings: &mut Warnings) -> Option<Value> {
        let found: Vec<Placeholder<'_>> = placeholders(template).collect();

        if let [only] = found.as_slice() {
            if only.span == (0..template.len()) {
                return self.lookup(only, warnings).map(Cow::into_owned);
            }
        }

        if found.is_empty() {
            return Some(Value::String(template.to_string()));
        }

        let mut result = String::with_capacity(template.len());
        let mut last_end = 0;
        for placeholder in &found {
            result.push_str(&template[last_end..placeholder.span.start]);
            let resolved = self.lookup(placeholder, warnings);
            result.push_str(&format_value(resolved.as_deref()));
            last_end = placeholder.span.end;
        }
        result.push_str(&template[last_end..]);

        Some(Value::String(result))
    }

    fn lookup<'v>(
        &'v self,
        placeholder: &Placeholder<'_>,
        warnings: &mut Warnings,
    ) -> Option<Cow<'v, Value>> {
        let kind = placeholder.kind();
        let resolved = match kind {
            ReferenceKind::Query => self
                .source
                .evaluate_query(placeholder.expression)
                .map(Cow::Owned),
            ReferenceKind::Path => self
                .source
                .resolve_nested_path(placeholder.expression)
                .map(Cow::Borrowed),
        };

        if resolved.is_none() {
            self.unresolved(placeholder.expression, kind, warnings);
        }
        resolved
    }
}
