//! Parameter trees for request bodies.
//!
//! Parsed body parameters form a nested tree: scalar leaves, ordered lists,
//! and string-keyed maps, mirroring how PHP-style frameworks shape request
//! data. Upload descriptors are merged into the same tree so the application
//! reads one structure.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::uploads::UploadedFile;

/// String-keyed parameter map, the root shape of a request body.
pub type ParamMap = BTreeMap<String, ParamValue>;

/// A single node in a parameter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Text scalar.
    Text(String),

    /// Integer scalar.
    Number(i64),

    /// Normalized upload descriptor leaf.
    File(UploadedFile),

    /// Ordered list of nested values.
    List(Vec<ParamValue>),

    /// String-keyed map of nested values.
    Map(ParamMap),
}

impl ParamValue {
    /// Returns the text value if this node is a text scalar.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value if this node is a number scalar.
    #[inline]
    pub fn as_number(&self) -> Option<i64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the upload descriptor if this node is a file leaf.
    #[inline]
    pub fn as_file(&self) -> Option<&UploadedFile> {
        match self {
            ParamValue::File(f) => Some(f),
            _ => None,
        }
    }

    /// Returns the nested list if this node is a list.
    #[inline]
    pub fn as_list(&self) -> Option<&[ParamValue]> {
        match self {
            ParamValue::List(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the nested map if this node is a map.
    #[inline]
    pub fn as_map(&self) -> Option<&ParamMap> {
        match self {
            ParamValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Number(n)
    }
}

impl From<UploadedFile> for ParamValue {
    fn from(f: UploadedFile) -> Self {
        ParamValue::File(f)
    }
}

impl From<Vec<ParamValue>> for ParamValue {
    fn from(l: Vec<ParamValue>) -> Self {
        ParamValue::List(l)
    }
}

impl From<ParamMap> for ParamValue {
    fn from(m: ParamMap) -> Self {
        ParamValue::Map(m)
    }
}

impl Serialize for ParamValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ParamValue::Text(s) => serializer.serialize_str(s),
            ParamValue::Number(n) => serializer.serialize_i64(*n),
            ParamValue::File(file) => file.serialize(serializer),
            ParamValue::List(list) => {
                let mut seq = serializer.serialize_seq(Some(list.len()))?;
                for item in list {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ParamValue::Map(map) => {
                let mut entries = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    entries.serialize_entry(key, value)?;
                }
                entries.end()
            }
        }
    }
}

/// Merges `overlay` into `base` and returns the combined map.
///
/// Maps merge recursively, lists append, and on any other collision the
/// overlay value wins.
pub fn merge(mut base: ParamMap, overlay: ParamMap) -> ParamMap {
    for (key, incoming) in overlay {
        let merged = match base.remove(&key) {
            Some(existing) => merge_value(existing, incoming),
            None => incoming,
        };
        base.insert(key, merged);
    }
    base
}

fn merge_value(existing: ParamValue, incoming: ParamValue) -> ParamValue {
    match (existing, incoming) {
        (ParamValue::Map(a), ParamValue::Map(b)) => ParamValue::Map(merge(a, b)),
        (ParamValue::List(mut a), ParamValue::List(b)) => {
            a.extend(b);
            ParamValue::List(a)
        }
        (_, incoming) => incoming,
    }
}

/// Flattens a tree into `(dotted.path, leaf)` pairs.
///
/// Map keys and list indexes become path segments joined with `.`, so a file
/// nested under `photos[0]` comes out at `photos.0`. Empty containers produce
/// no pairs.
pub fn flatten(map: &ParamMap) -> Vec<(String, ParamValue)> {
    let mut out = Vec::new();
    for (key, value) in map {
        flatten_value(key.clone(), value, &mut out);
    }
    out
}

fn flatten_value(path: String, value: &ParamValue, out: &mut Vec<(String, ParamValue)>) {
    match value {
        ParamValue::Map(map) => {
            for (key, child) in map {
                flatten_value(format!("{}.{}", path, key), child, out);
            }
        }
        ParamValue::List(list) => {
            for (index, child) in list.iter().enumerate() {
                flatten_value(format!("{}.{}", path, index), child, out);
            }
        }
        leaf => out.push((path, leaf.clone())),
    }
}

/// Inserts `value` at a dotted path, creating intermediate containers.
///
/// Numeric segments address lists (appending when the index is past the end),
/// other segments address maps. Scalar intermediates are replaced by a fresh
/// container for the next segment.
pub fn insert(map: &mut ParamMap, path: &str, value: ParamValue) {
    let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return;
    }
    insert_map(map, &segments, value);
}

/// Looks up a value at a dotted path.
pub fn get<'a>(map: &'a ParamMap, path: &str) -> Option<&'a ParamValue> {
    let mut segments = path.split('.');
    let mut current = map.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            ParamValue::Map(map) => map.get(segment)?,
            ParamValue::List(list) => list.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn insert_map(map: &mut ParamMap, segments: &[&str], value: ParamValue) {
    let head = segments[0];
    if segments.len() == 1 {
        map.insert(head.to_string(), value);
        return;
    }
    let child = map
        .entry(head.to_string())
        .or_insert_with(|| empty_container(segments[1]));
    insert_value(child, &segments[1..], value);
}

fn insert_value(node: &mut ParamValue, segments: &[&str], value: ParamValue) {
    if segments.is_empty() {
        *node = value;
        return;
    }
    let index = segments[0].parse::<usize>().ok();
    let compatible = match node {
        ParamValue::Map(_) => true,
        ParamValue::List(_) => index.is_some(),
        _ => false,
    };
    if !compatible {
        *node = empty_container(segments[0]);
    }
    match node {
        ParamValue::Map(map) => insert_map(map, segments, value),
        ParamValue::List(list) => {
            insert_list(list, index.unwrap_or(list.len()), &segments[1..], value)
        }
        _ => {}
    }
}

fn insert_list(list: &mut Vec<ParamValue>, index: usize, rest: &[&str], value: ParamValue) {
    if rest.is_empty() {
        if index < list.len() {
            list[index] = value;
        } else {
            list.push(value);
        }
        return;
    }
    if index >= list.len() {
        list.push(empty_container(rest[0]));
        let last = list.len() - 1;
        insert_value(&mut list[last], rest, value);
    } else {
        insert_value(&mut list[index], rest, value);
    }
}

/// Picks the container type a path segment addresses.
fn empty_container(segment: &str) -> ParamValue {
    if segment.parse::<usize>().is_ok() {
        ParamValue::List(Vec::new())
    } else {
        ParamValue::Map(ParamMap::new())
    }
}
