//! Path keys: addressing nested locations inside a JSON document.
//!
//! A key such as `"user.address.city"` or `"items[2].name"` is split into
//! [`Segment`]s and resolved structurally against a [`serde_json::Value`].
//!
//! # Syntax
//!
//! - `.` separates segments
//! - `[n]` selects array index `n`
//! - `[name]`, `["name"]` or `['name']` selects a literal object key, which may
//!   itself contain dots
//! - `\.`, `\[`, `\]` and `\\` escape a literal character
//!
//! Inside a quoted bracket name `\"`, `\'` and `\\` escape the quote
//! characters, so `["a]b"]` is the single key `a]b`. An unterminated `[` is
//! kept as literal text. The empty key is a single empty segment.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use tablekv::path::KeyPath;
//!
//! let mut doc = json!({});
//! KeyPath::parse("a.b[1]").assign(&mut doc, json!(true)).unwrap();
//! assert_eq!(doc, json!({ "a": { "b": [null, true] } }));
//! assert_eq!(KeyPath::parse("a.b.1").lookup(&doc), Some(&json!(true)));
//! ```

use serde_json::{Map, Value};
use thiserror::Error;

/// How far past the end of an array a write may land. The gap is filled with
/// `null`.
pub const MAX_ARRAY_PAD: usize = 1024;

/// Why a path could not be written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("index {index} is too far past the end of an array of length {len}")]
    IndexTooFar { index: usize, len: usize },

    #[error("segment \"{0}\" is not an index but the value there is an array")]
    KeyIntoArray(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    /// The segment as an object key.
    pub fn key(&self) -> String {
        match self {
            Segment::Key(key) => key.clone(),
            Segment::Index(index) => index.to_string(),
        }
    }

    /// The segment as an array index, if it can be one.
    pub fn index(&self) -> Option<usize> {
        match self {
            Segment::Key(key) => key.parse().ok(),
            Segment::Index(index) => Some(*index),
        }
    }

    fn empty_container(&self) -> Value {
        match self {
            Segment::Key(_) => Value::Object(Map::new()),
            Segment::Index(_) => Value::Array(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<Segment>,
}

impl KeyPath {
    pub fn parse(key: &str) -> Self {
        Self {
            segments: parse_segments(key),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Resolve the path. Absence at any segment is absence of the whole lookup.
    pub fn lookup<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        lookup_segments(root, &self.segments)
    }

    /// [`KeyPath::lookup`] against a document's top-level map.
    pub fn lookup_in<'a>(&self, document: &'a Map<String, Value>) -> Option<&'a Value> {
        let (first, rest) = self.segments.split_first()?;
        lookup_segments(document.get(&first.key())?, rest)
    }

    /// Write `value` at the path, creating intermediate containers as needed.
    ///
    /// A missing or scalar intermediate becomes `{}` when the following
    /// segment is a name and `[]` when it is an index. Arrays are padded with
    /// `null` up to the requested index, at most [`MAX_ARRAY_PAD`] past their
    /// current end. An existing array is never replaced: a name segment
    /// against it fails with [`PathError::KeyIntoArray`].
    ///
    /// On error `root` may already hold some of the created intermediates.
    pub fn assign(&self, root: &mut Value, value: Value) -> Result<(), PathError> {
        assign_segments(root, &self.segments, value)
    }

    /// [`KeyPath::assign`] into a document's top-level map.
    pub fn assign_in(
        &self,
        document: &mut Map<String, Value>,
        value: Value,
    ) -> Result<(), PathError> {
        let Some((first, rest)) = self.segments.split_first() else {
            return Ok(());
        };
        let slot = document.entry(first.key()).or_insert(Value::Null);
        assign_segments(slot, rest, value)
    }

    /// Remove the value at the path. Returns whether anything was removed.
    pub fn remove(&self, root: &mut Value) -> bool {
        remove_segments(root, &self.segments)
    }

    /// [`KeyPath::remove`] from a document's top-level map.
    pub fn remove_in(&self, document: &mut Map<String, Value>) -> bool {
        match self.segments.split_first() {
            Some((first, [])) => document.shift_remove(&first.key()).is_some(),
            Some((first, rest)) => match document.get_mut(&first.key()) {
                Some(child) => remove_segments(child, rest),
                None => false,
            },
            None => false,
        }
    }
}

fn lookup_segments<'a>(root: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(root, |node, segment| child(node, segment))
}

fn assign_segments(root: &mut Value, segments: &[Segment], value: Value) -> Result<(), PathError> {
    let mut node = root;
    for segment in segments {
        node = slot(node, segment)?;
    }
    *node = value;
    Ok(())
}

fn remove_segments(root: &mut Value, segments: &[Segment]) -> bool {
    let Some((last, parents)) = segments.split_last() else {
        return false;
    };
    let mut node = root;
    for segment in parents {
        node = match child_mut(node, segment) {
            Some(next) => next,
            None => return false,
        };
    }
    match node {
        Value::Object(map) => map.shift_remove(&last.key()).is_some(),
        Value::Array(items) => match last.index() {
            Some(index) if index < items.len() => {
                items.remove(index);
                true
            }
            _ => false,
        },
        _ => false,
    }
}

fn child<'a>(node: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(&segment.key()),
        Value::Array(items) => segment.index().and_then(|index| items.get(index)),
        _ => None,
    }
}

fn child_mut<'a>(node: &'a mut Value, segment: &Segment) -> Option<&'a mut Value> {
    match node {
        Value::Object(map) => map.get_mut(&segment.key()),
        Value::Array(items) => segment.index().and_then(|index| items.get_mut(index)),
        _ => None,
    }
}

/// Child slot for `segment`. Scalars and `null` are replaced by a fitting
/// empty container first; objects and arrays are kept.
fn slot<'a>(node: &'a mut Value, segment: &Segment) -> Result<&'a mut Value, PathError> {
    match node {
        Value::Object(map) => Ok(map.entry(segment.key()).or_insert(Value::Null)),
        Value::Array(items) => {
            let index = segment
                .index()
                .ok_or_else(|| PathError::KeyIntoArray(segment.key()))?;
            let len = items.len();
            if index >= len {
                if index - len >= MAX_ARRAY_PAD {
                    return Err(PathError::IndexTooFar { index, len });
                }
                items.resize(index + 1, Value::Null);
            }
            Ok(&mut items[index])
        }
        other => {
            *other = segment.empty_container();
            slot(other, segment)
        }
    }
}

fn parse_segments(key: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();
    // Whether `current` still has to be emitted as a segment.
    let mut open = true;
    let mut chars = key.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push(chars.next().unwrap_or('\\'));
                open = true;
            }
            '.' => {
                if open {
                    segments.push(Segment::Key(std::mem::take(&mut current)));
                }
                open = true;
            }
            '[' => {
                let rest = chars.as_str();
                let Some((segment, consumed)) = bracket(rest) else {
                    current.push('[');
                    current.push_str(rest);
                    open = true;
                    break;
                };
                if !current.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut current)));
                }
                segments.push(segment);
                chars = rest[consumed..].chars();
                open = false;
            }
            _ => {
                current.push(c);
                open = true;
            }
        }
    }
    if open {
        segments.push(Segment::Key(current));
    }
    segments
}

/// Parse a bracket selector. `rest` starts right after the `[`; returns the
/// segment and the number of bytes consumed including the closing `]`.
fn bracket(rest: &str) -> Option<(Segment, usize)> {
    quoted_bracket(rest).or_else(|| plain_bracket(rest))
}

/// `["name"]` or `['name']`, whitespace allowed around the quotes.
fn quoted_bracket(rest: &str) -> Option<(Segment, usize)> {
    let body = rest.trim_start();
    let quote = body.chars().next().filter(|c| matches!(c, '"' | '\''))?;
    let mut name = String::new();
    let mut chars = body[1..].char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => name.push(chars.next().map_or('\\', |(_, escaped)| escaped)),
            c if c == quote => {
                let tail = body[1 + i + 1..].trim_start();
                let tail = tail.strip_prefix(']')?;
                return Some((Segment::Key(name), rest.len() - tail.len()));
            }
            c => name.push(c),
        }
    }
    None
}

/// `[n]` or `[name]`, honouring `\]` inside the name.
fn plain_bracket(rest: &str) -> Option<(Segment, usize)> {
    let mut inner = String::new();
    let mut chars = rest.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => inner.push(chars.next().map_or('\\', |(_, escaped)| escaped)),
            ']' => {
                let segment = match inner.trim().parse::<usize>() {
                    Ok(index) => Segment::Index(index),
                    Err(_) => Segment::Key(inner),
                };
                return Some((segment, i + 1));
            }
            c => inner.push(c),
        }
    }
    None
}
