//! Upload descriptor normalization and body merge.
//!
//! Raw browser-side file descriptors arrive as an arbitrarily nested tree.
//! Before dispatch they are normalized into [`UploadedFile`] descriptors and
//! folded into the parsed request body, either as structured leaves or as
//! flattened PHP `$_FILES`-style records depending on configuration.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::browser::{FileTree, FileUpload};
use crate::params::{self, ParamMap, ParamValue};

/// Upload completed without error.
pub const UPLOAD_ERR_OK: u8 = 0;

// =============================================================================
// Uploaded File
// =============================================================================

/// Normalized upload descriptor attached to a native request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedFile {
    /// Original filename
    pub name: String,
    /// MIME type
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Temporary file path on disk
    pub tmp_name: String,
    /// File size in bytes
    pub size: u64,
    /// PHP upload error code (0 = success)
    pub error: u8,
}

impl UploadedFile {
    fn from_raw(raw: &FileUpload) -> Self {
        UploadedFile {
            name: raw.name.clone(),
            mime_type: raw.content_type.clone(),
            tmp_name: raw.tmp_path.display().to_string(),
            size: raw.size,
            error: raw.error,
        }
    }

    /// Whether the upload completed without error.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.error == UPLOAD_ERR_OK
    }
}

// =============================================================================
// Upload Tree
// =============================================================================

/// Normalized upload descriptors, preserving the field nesting of the raw tree.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadTree {
    /// Single descriptor leaf.
    File(UploadedFile),

    /// Positionally indexed descriptors, e.g. `photos[0]`, `photos[1]`.
    List(Vec<UploadTree>),

    /// Field-keyed descriptors, e.g. `profile[avatar]`.
    Map(BTreeMap<String, UploadTree>),
}

/// Normalizes a raw descriptor tree into [`UploadTree`] shape.
///
/// Nesting is preserved exactly; only the leaves change representation.
pub fn normalize(files: &BTreeMap<String, FileTree>) -> BTreeMap<String, UploadTree> {
    files
        .iter()
        .map(|(field, node)| (field.clone(), normalize_node(node)))
        .collect()
}

fn normalize_node(node: &FileTree) -> UploadTree {
    match node {
        FileTree::File(raw) => UploadTree::File(UploadedFile::from_raw(raw)),
        FileTree::List(list) => UploadTree::List(list.iter().map(normalize_node).collect()),
        FileTree::Map(map) => UploadTree::Map(
            map.iter()
                .map(|(key, child)| (key.clone(), normalize_node(child)))
                .collect(),
        ),
    }
}

// =============================================================================
// Body Merge
// =============================================================================

/// Folds normalized descriptors into the parsed body.
///
/// With `as_objects` set the descriptors merge in as structured [`ParamValue::File`]
/// leaves at their original nesting. Otherwise each descriptor is written at its
/// flattened dotted path as a five-key record (`tmp_name`, `error`, `name`,
/// `type`, `size`); `tmp_name` is blanked unless the upload succeeded.
pub fn merge_into_body(
    body: ParamMap,
    files: &BTreeMap<String, UploadTree>,
    as_objects: bool,
) -> ParamMap {
    if as_objects {
        return params::merge(body, to_params(files));
    }
    let mut body = body;
    for (path, leaf) in params::flatten(&to_params(files)) {
        if let ParamValue::File(file) = leaf {
            params::insert(&mut body, &path, flat_record(&file));
        }
    }
    body
}

/// Converts an upload tree into parameter-tree shape with file leaves.
pub fn to_params(files: &BTreeMap<String, UploadTree>) -> ParamMap {
    files
        .iter()
        .map(|(field, node)| (field.clone(), params_node(node)))
        .collect()
}

fn params_node(node: &UploadTree) -> ParamValue {
    match node {
        UploadTree::File(file) => ParamValue::File(file.clone()),
        UploadTree::List(list) => ParamValue::List(list.iter().map(params_node).collect()),
        UploadTree::Map(map) => ParamValue::Map(
            map.iter()
                .map(|(key, child)| (key.clone(), params_node(child)))
                .collect(),
        ),
    }
}

fn flat_record(file: &UploadedFile) -> ParamValue {
    let tmp_name = if file.is_ok() {
        file.tmp_name.clone()
    } else {
        String::new()
    };
    let mut record = ParamMap::new();
    record.insert("tmp_name".to_string(), ParamValue::Text(tmp_name));
    record.insert("error".to_string(), ParamValue::Number(i64::from(file.error)));
    record.insert("name".to_string(), ParamValue::Text(file.name.clone()));
    record.insert("type".to_string(), ParamValue::Text(file.mime_type.clone()));
    record.insert("size".to_string(), ParamValue::Number(file.size as i64));
    ParamValue::Map(record)
}
