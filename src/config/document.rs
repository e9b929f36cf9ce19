//! Preload config (preload.json): a list of operations, each with the concrete
//! shape/type/attribute combinations to compile ahead of time.
//!
//! JSON shape:
//! {
//!   "Operations": [
//!     {
//!       "name": "Add",               // registry key, 1..=256 chars
//!       "type": "elementwise",       // optional, informational
//!       "preload_list": [
//!         {
//!           "input_shape": "1,1,1;1,1,1",
//!           "input_type": "uint8;uint8",
//!           "output_shape": "1,1,1",
//!           "output_type": "uint8",
//!           "attr_name": "", "attr_type": "", "attr_val": ""
//!         }
//!       ]
//!     }
//!   ]
//! }
//!
//! Every object level is whitelisted and checked for repeated keys. Any problem
//! here rejects the whole document.

use crate::config::json::{JsonNode, first_duplicate_key};
use crate::config::name::OpName;
use crate::error::SchemaError;

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Config files above this size are refused before being read.
pub const MAX_CONFIG_BYTES: u64 = 8 * 1024 * 1024;

const TOP_LEVEL_KEY: &str = "Operations";
const OPERATION_KEYS: [&str; 3] = ["name", "type", "preload_list"];
const ENTRY_KEYS: [&str; 7] = [
    "input_shape",
    "input_type",
    "output_shape",
    "output_type",
    "attr_name",
    "attr_type",
    "attr_val",
];

/// Where the document comes from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    Path(PathBuf),
    Text(String),
}

impl From<PathBuf> for ConfigSource {
    fn from(path: PathBuf) -> Self {
        ConfigSource::Path(path)
    }
}

/// One preload combination, fields still in their wire encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreloadEntry {
    pub input_shape: String,
    pub input_type: String,
    pub output_shape: String,
    pub output_type: String,
    pub attr_name: String,
    pub attr_type: String,
    pub attr_val: String,
}

impl PreloadEntry {
    fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "input_shape" => Some(&mut self.input_shape),
            "input_type" => Some(&mut self.input_type),
            "output_shape" => Some(&mut self.output_shape),
            "output_type" => Some(&mut self.output_type),
            "attr_name" => Some(&mut self.attr_name),
            "attr_type" => Some(&mut self.attr_type),
            "attr_val" => Some(&mut self.attr_val),
            _ => None,
        }
    }
}

/// A validated operation record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationEntry {
    pub name: String,
    pub op_type: Option<String>,
    pub preload_list: Vec<PreloadEntry>,
}

/// The whole validated document, indexed by operation name.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    operations: Vec<OperationEntry>,
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl ConfigDocument {
    pub fn parse(source: ConfigSource) -> Result<Self, SchemaError> {
        let text = match source {
            ConfigSource::Text(text) => text,
            ConfigSource::Path(path) => read_config_file(&path)?,
        };
        Self::from_text(&text)
    }

    pub fn from_text(text: &str) -> Result<Self, SchemaError> {
        let root: JsonNode =
            serde_json::from_str(text).map_err(|err| SchemaError::MalformedJson(err.to_string()))?;
        Self::validate_and_build(&root)
    }

    /// Walk the tree top-down; the first violation wins.
    fn validate_and_build(root: &JsonNode) -> Result<Self, SchemaError> {
        // 1) Top level: exactly one "Operations" array.
        let top = root.as_object().ok_or(SchemaError::TopLevelNotObject)?;
        if let Some((key, _)) = top.iter().find(|(key, _)| key != TOP_LEVEL_KEY) {
            return Err(SchemaError::UnsupportedTopLevelKey(key.clone()));
        }
        if let Some(key) = first_duplicate_key(top) {
            return Err(SchemaError::DuplicateKey {
                scope: "top level".to_string(),
                key: key.to_string(),
            });
        }
        let ops = top
            .iter()
            .find(|(key, _)| key == TOP_LEVEL_KEY)
            .map(|(_, value)| value)
            .ok_or(SchemaError::MissingOperations)?
            .as_array()
            .ok_or(SchemaError::OperationsNotArray)?;

        // 2) Per-operation records, unique names.
        let mut operations = Vec::with_capacity(ops.len());
        let mut index = HashMap::with_capacity(ops.len());
        for (i, op) in ops.iter().enumerate() {
            let entry = parse_operation(op, i)?;
            if index.contains_key(&entry.name) {
                return Err(SchemaError::DuplicateName(entry.name));
            }
            index.insert(entry.name.clone(), operations.len());
            operations.push(entry);
        }

        let names = operations.iter().map(|op| op.name.clone()).collect();
        Ok(Self {
            operations,
            names,
            index,
        })
    }

    pub fn get_operation(&self, name: &str) -> Option<&OperationEntry> {
        self.index.get(name).map(|&i| &self.operations[i])
    }

    /// Operation names in document order.
    pub fn all_names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

fn read_config_file(path: &std::path::Path) -> Result<String, SchemaError> {
    let display = path.display().to_string();
    let meta = fs::metadata(path).map_err(|source| SchemaError::Io {
        path: display.clone(),
        source,
    })?;
    if !meta.is_file() {
        return Err(SchemaError::NotAFile(display));
    }
    if meta.len() > MAX_CONFIG_BYTES {
        return Err(SchemaError::FileTooLarge {
            path: display,
            size: meta.len(),
            limit: MAX_CONFIG_BYTES,
        });
    }
    fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: display,
        source,
    })
}

fn parse_operation(node: &JsonNode, index: usize) -> Result<OperationEntry, SchemaError> {
    let fields = node
        .as_object()
        .ok_or(SchemaError::OperationNotObject(index))?;
    if let Some((key, _)) = fields
        .iter()
        .find(|(key, _)| !OPERATION_KEYS.contains(&key.as_str()))
    {
        return Err(SchemaError::UnsupportedOperationKey {
            index,
            key: key.clone(),
        });
    }
    if let Some(key) = first_duplicate_key(fields) {
        return Err(SchemaError::DuplicateKey {
            scope: format!("operation #{index}"),
            key: key.to_string(),
        });
    }

    let lookup = |wanted: &str| {
        fields
            .iter()
            .find(|(key, _)| key == wanted)
            .map(|(_, value)| value)
    };

    let name = lookup("name")
        .ok_or(SchemaError::MissingName(index))?
        .as_str()
        .ok_or(SchemaError::NameNotString(index))?;
    let name = OpName::parse(name, index)?.0;

    let op_type = match lookup("type") {
        None => None,
        Some(value) => Some(
            value
                .as_str()
                .ok_or_else(|| SchemaError::TypeNotString(name.clone()))?
                .to_string(),
        ),
    };

    let preload_list = match lookup("preload_list") {
        None => Vec::new(),
        Some(value) => {
            let items = value
                .as_array()
                .ok_or_else(|| SchemaError::PreloadListNotArray(name.clone()))?;
            items
                .iter()
                .enumerate()
                .map(|(i, item)| parse_entry(item, &name, i))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    Ok(OperationEntry {
        name,
        op_type,
        preload_list,
    })
}

fn parse_entry(node: &JsonNode, name: &str, index: usize) -> Result<PreloadEntry, SchemaError> {
    let fields = node.as_object().ok_or_else(|| SchemaError::EntryNotObject {
        name: name.to_string(),
        index,
    })?;
    if let Some(key) = first_duplicate_key(fields) {
        return Err(SchemaError::DuplicateKey {
            scope: format!("preload entry #{index} of {name:?}"),
            key: key.to_string(),
        });
    }

    let mut entry = PreloadEntry::default();
    for (key, value) in fields {
        if !ENTRY_KEYS.contains(&key.as_str()) {
            return Err(SchemaError::UnsupportedEntryKey {
                name: name.to_string(),
                index,
                key: key.clone(),
            });
        }
        let text = value
            .as_str()
            .ok_or_else(|| SchemaError::EntryFieldNotString {
                name: name.to_string(),
                index,
                key: key.clone(),
            })?;
        if let Some(slot) = entry.field_mut(key) {
            *slot = text.to_string();
        }
    }
    Ok(entry)
}
