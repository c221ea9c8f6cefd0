//! JSON path queries over the whole variable document
//!
//! Provides JSONPath-like syntax for extracting values from the variable
//! namespace. Supports member access, negative indices, wildcards, slices,
//! unions, recursive descent, and simple comparison filters.

use crate::error::QueryError;
use crate::interpolation::path::resolve_in_value;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use tracing::{debug, trace};

/// Evaluate a `$` query against the variable namespace.
///
/// A single match is returned unwrapped; several matches are returned as an
/// array in document order. A malformed expression or an empty match set
/// yields `None`.
pub fn evaluate_query(root: &Map<String, Value>, expr: &str) -> Option<Value> {
    let path = match JsonPath::compile(expr) {
        Ok(path) => path,
        Err(e) => {
            debug!("Ignoring malformed query '{}': {}", expr, e);
            return None;
        }
    };

    let mut matches = path.select(root);
    match matches.len() {
        0 => None,
        1 => matches.pop(),
        _ => Some(Value::Array(matches)),
    }
}

/// Compiled query expression
#[derive(Debug, Clone)]
pub struct JsonPath {
    /// Original expression
    pub expression: String,
    components: Vec<PathComponent>,
}

#[derive(Debug, Clone, PartialEq)]
enum PathComponent {
    Field(String),
    Index(i64),
    Wildcard,
    Slice {
        start: Option<i64>,
        end: Option<i64>,
        step: usize,
    },
    Union(Vec<Selector>),
    /// Apply the inner component to the current node and all its descendants
    Descend(Box<PathComponent>),
    Filter(Filter),
}

#[derive(Debug, Clone, PartialEq)]
enum Selector {
    Key(String),
    Index(i64),
}

#[derive(Debug, Clone, PartialEq)]
struct Filter {
    /// Path relative to `@`
    path: String,
    /// `None` tests for existence only
    comparison: Option<(ComparisonOp, Value)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComparisonOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl JsonPath {
    /// Compile a query expression
    pub fn compile(expr: &str) -> Result<Self, QueryError> {
        let mut parser = Parser::new(expr.trim());
        let components = parser.parse()?;

        Ok(Self {
            expression: expr.to_string(),
            components,
        })
    }

    /// Select every matching value from the namespace, in document order
    pub fn select(&self, root: &Map<String, Value>) -> Vec<Value> {
        trace!("Selecting with query {}: {:?}", self.expression, self.components);

        let mut nodes = vec![Node::Document(root)];
        for component in &self.components {
            let mut next = Vec::new();
            for node in nodes {
                apply(component, node, &mut next);
            }
            nodes = next;
        }

        nodes.into_iter().map(Node::into_value).collect()
    }
}

/// A position in the document: either the namespace itself or a stored value
#[derive(Debug, Clone, Copy)]
enum Node<'a> {
    Document(&'a Map<String, Value>),
    Value(&'a Value),
}

impl<'a> Node<'a> {
    fn as_record(self) -> Option<&'a Map<String, Value>> {
        match self {
            Node::Document(map) | Node::Value(Value::Object(map)) => Some(map),
            Node::Value(_) => None,
        }
    }

    fn as_array(self) -> Option<&'a Vec<Value>> {
        match self {
            Node::Value(Value::Array(items)) => Some(items),
            _ => None,
        }
    }

    fn field(self, key: &str) -> Option<Node<'a>> {
        self.as_record()?.get(key).map(Node::Value)
    }

    fn index(self, index: i64) -> Option<Node<'a>> {
        let items = self.as_array()?;
        let position = if index < 0 {
            items.len().checked_sub(index.unsigned_abs() as usize)?
        } else {
            index as usize
        };
        items.get(position).map(Node::Value)
    }

    fn children(self) -> Vec<Node<'a>> {
        if let Some(map) = self.as_record() {
            map.values().map(Node::Value).collect()
        } else if let Some(items) = self.as_array() {
            items.iter().map(Node::Value).collect()
        } else {
            Vec::new()
        }
    }

    fn descendants(self, out: &mut Vec<Node<'a>>) {
        out.push(self);
        for child in self.children() {
            child.descendants(out);
        }
    }

    fn into_value(self) -> Value {
        match self {
            Node::Document(map) => Value::Object(map.clone()),
            Node::Value(value) => value.clone(),
        }
    }
}

fn apply<'a>(component: &PathComponent, node: Node<'a>, out: &mut Vec<Node<'a>>) {
    match component {
        PathComponent::Field(key) => out.extend(node.field(key)),
        PathComponent::Index(index) => out.extend(node.index(*index)),
        PathComponent::Wildcard => out.extend(node.children()),
        PathComponent::Slice { start, end, step } => {
            if let Some(items) = node.as_array() {
                let (from, to) = slice_bounds(items.len(), *start, *end);
                if from < to {
                    out.extend(items[from..to].iter().step_by(*step).map(Node::Value));
                }
            }
        }
        PathComponent::Union(selectors) => {
            for selector in selectors {
                match selector {
                    Selector::Key(key) => out.extend(node.field(key)),
                    Selector::Index(index) => out.extend(node.index(*index)),
                }
            }
        }
        PathComponent::Descend(inner) => {
            let mut nodes = Vec::new();
            node.descendants(&mut nodes);
            for candidate in nodes {
                apply(inner, candidate, out);
            }
        }
        PathComponent::Filter(filter) => {
            out.extend(
                node.children()
                    .into_iter()
                    .filter(|child| matches!(child, Node::Value(v) if filter.matches(v))),
            );
        }
    }
}

fn slice_bounds(len: usize, start: Option<i64>, end: Option<i64>) -> (usize, usize) {
    let len = len as i64;
    let clamp = |bound: i64| {
        if bound < 0 {
            (len + bound).max(0)
        } else {
            bound.min(len)
        }
    };
    let from = start.map(clamp).unwrap_or(0);
    let to = end.map(clamp).unwrap_or(len);
    (from as usize, to as usize)
}

impl Filter {
    fn matches(&self, item: &Value) -> bool {
        let actual = resolve_in_value(item, &self.path);
        match (&self.comparison, actual) {
            (None, found) => found.is_some(),
            (Some(_), None) => false,
            (Some((op, expected)), Some(actual)) => op.evaluate(actual, expected),
        }
    }
}

impl ComparisonOp {
    fn evaluate(self, actual: &Value, expected: &Value) -> bool {
        match self {
            ComparisonOp::Eq => loosely_equal(actual, expected),
            ComparisonOp::Ne => !loosely_equal(actual, expected),
            _ => match ordering(actual, expected) {
                Some(Ordering::Greater) => matches!(self, ComparisonOp::Gt | ComparisonOp::Ge),
                Some(Ordering::Less) => matches!(self, ComparisonOp::Lt | ComparisonOp::Le),
                Some(Ordering::Equal) => matches!(self, ComparisonOp::Ge | ComparisonOp::Le),
                None => false,
            },
        }
    }
}

fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn ordering(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn parse(&mut self) -> Result<Vec<PathComponent>, QueryError> {
        if !self.eat("$") {
            return Err(QueryError::MissingRoot);
        }

        let mut components = Vec::new();
        while let Some(ch) = self.peek() {
            let component = if self.eat("..") {
                let inner = if self.eat("*") {
                    PathComponent::Wildcard
                } else if self.peek() == Some('[') {
                    self.bracket()?
                } else {
                    PathComponent::Field(self.name()?)
                };
                PathComponent::Descend(Box::new(inner))
            } else if self.eat(".") {
                if self.eat("*") {
                    PathComponent::Wildcard
                } else {
                    PathComponent::Field(self.name()?)
                }
            } else if ch == '[' {
                self.bracket()?
            } else {
                return Err(QueryError::Unexpected {
                    position: self.pos,
                    found: ch,
                });
            };
            components.push(component);
        }

        Ok(components)
    }

    fn name(&mut self) -> Result<String, QueryError> {
        let rest = self.rest();
        let len = rest.find(['.', '[']).unwrap_or(rest.len());
        let name = rest[..len].trim();
        if name.is_empty() {
            return Err(QueryError::EmptyName { position: self.pos });
        }
        self.pos += len;
        Ok(name.to_string())
    }

    fn bracket(&mut self) -> Result<PathComponent, QueryError> {
        let open = self.pos;
        self.eat("[");
        self.skip_whitespace();

        if self.eat("*") {
            self.skip_whitespace();
            return self.close(open).map(|_| PathComponent::Wildcard);
        }

        if self.eat("?(") {
            let rest = self.rest();
            let end = rest
                .find(")]")
                .ok_or(QueryError::UnclosedBracket { position: open })?;
            let filter = parse_filter(&rest[..end])?;
            self.pos += end + 2;
            return Ok(PathComponent::Filter(filter));
        }

        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(quote @ ('\'' | '"')) => {
                    selectors.push(Selector::Key(self.quoted(quote, open)?));
                }
                Some(_) => {
                    let rest = self.rest();
                    let len = rest
                        .find([',', ']'])
                        .ok_or(QueryError::UnclosedBracket { position: open })?;
                    let token = rest[..len].trim();
                    self.pos += len;
                    if token.contains(':') {
                        self.skip_whitespace();
                        if !selectors.is_empty() || self.peek() != Some(']') {
                            return Err(QueryError::InvalidSlice(token.to_string()));
                        }
                        self.close(open)?;
                        return parse_slice(token);
                    }
                    let index = token
                        .parse::<i64>()
                        .map_err(|_| QueryError::InvalidIndex(token.to_string()))?;
                    selectors.push(Selector::Index(index));
                }
                None => return Err(QueryError::UnclosedBracket { position: open }),
            }

            self.skip_whitespace();
            if self.eat(",") {
                continue;
            }
            self.close(open)?;
            break;
        }

        Ok(match selectors.as_slice() {
            [Selector::Key(key)] => PathComponent::Field(key.clone()),
            [Selector::Index(index)] => PathComponent::Index(*index),
            _ => PathComponent::Union(selectors),
        })
    }

    fn close(&mut self, open: usize) -> Result<(), QueryError> {
        if self.eat("]") {
            Ok(())
        } else {
            Err(QueryError::UnclosedBracket { position: open })
        }
    }

    fn quoted(&mut self, quote: char, open: usize) -> Result<String, QueryError> {
        self.pos += quote.len_utf8();
        let mut key = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((offset, ch)) = chars.next() {
            match ch {
                '\\' => {
                    if let Some((_, escaped)) = chars.next() {
                        key.push(escaped);
                    }
                }
                c if c == quote => {
                    self.pos += offset + c.len_utf8();
                    return Ok(key);
                }
                c => key.push(c),
            }
        }
        Err(QueryError::UnclosedBracket { position: open })
    }
}

fn parse_slice(token: &str) -> Result<PathComponent, QueryError> {
    let invalid = || QueryError::InvalidSlice(token.to_string());
    let parts: Vec<&str> = token.split(':').map(str::trim).collect();
    if parts.len() > 3 {
        return Err(invalid());
    }

    let bound = |part: &str| -> Result<Option<i64>, QueryError> {
        if part.is_empty() {
            Ok(None)
        } else {
            part.parse().map(Some).map_err(|_| invalid())
        }
    };

    let step = match parts.get(2).copied().map(bound).transpose()?.flatten() {
        None => 1,
        Some(step) if step > 0 => step as usize,
        Some(_) => return Err(invalid()),
    };

    Ok(PathComponent::Slice {
        start: bound(parts[0])?,
        end: parts.get(1).copied().map(bound).transpose()?.flatten(),
        step,
    })
}

/// Parse `@.field <op> literal` or a bare `@.field` existence test
fn parse_filter(src: &str) -> Result<Filter, QueryError> {
    let invalid = || QueryError::InvalidFilter(src.to_string());
    let src = src.trim();

    let (lhs, comparison) = match src.find(['=', '!', '<', '>']) {
        None => (src, None),
        Some(pos) => {
            let tail = &src[pos..];
            let (op, len) = [
                ("==", ComparisonOp::Eq),
                ("!=", ComparisonOp::Ne),
                (">=", ComparisonOp::Ge),
                ("<=", ComparisonOp::Le),
                (">", ComparisonOp::Gt),
                ("<", ComparisonOp::Lt),
                ("=", ComparisonOp::Eq),
            ]
            .into_iter()
            .find(|(token, _)| tail.starts_with(token))
            .map(|(token, op)| (op, token.len()))
            .ok_or_else(invalid)?;
            let literal = parse_literal(tail[len..].trim()).ok_or_else(invalid)?;
            (src[..pos].trim(), Some((op, literal)))
        }
    };

    let path = lhs.strip_prefix('@').ok_or_else(invalid)?;
    let path = path.strip_prefix('.').unwrap_or(path);

    Ok(Filter {
        path: path.to_string(),
        comparison,
    })
}

fn parse_literal(src: &str) -> Option<Value> {
    if src.is_empty() {
        return None;
    }
    if let Some(inner) = src.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        return Some(Value::String(inner.to_string()));
    }
    Some(serde_json::from_str(src).unwrap_or_else(|_| Value::String(src.to_string())))
}
