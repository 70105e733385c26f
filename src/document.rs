//! Build configuration documents
//!
//! A build document is a YAML or JSON file whose top-level `display` list
//! holds one mapping per configured instance. Each instance names its
//! `platform`; the remaining keys form the instance's [`ConfigDocument`].

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::{Map, Number, Value};
use serde_yaml::value::TaggedValue;
use thiserror::Error;

use crate::constants::keys;
use crate::validate::describe_value;

const LAMBDA_TAG: &str = "lambda";

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("could not parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("could not parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed document: {0}")]
    Structure(String),
}

/// A `display` entry that cannot be turned into an instance
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{reason}")]
pub struct MalformedInstance {
    pub reason: String,
}

impl MalformedInstance {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Raw key/value mapping of one instance, in authoring order
///
/// Values that could not be read into the JSON value model are kept as
/// unreadable, described the way they were written.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigDocument {
    entries: Map<String, Value>,
    unreadable: BTreeMap<String, String>,
}

impl ConfigDocument {
    pub fn from_map(entries: Map<String, Value>) -> Self {
        Self {
            entries,
            unreadable: BTreeMap::new(),
        }
    }

    fn insert(&mut self, key: String, value: Value) {
        self.entries.insert(key, value);
    }

    // Null keeps the key in authoring order without giving it a value
    fn insert_unreadable(&mut self, key: String, actual: String) {
        self.entries.insert(key.clone(), Value::Null);
        self.unreadable.insert(key, actual);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// How an unreadable value was written, if `key` holds one
    pub fn unreadable(&self, key: &str) -> Option<&str> {
        self.unreadable.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One entry of the `display` list
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceDocument {
    pub platform: String,
    pub config: ConfigDocument,
}

/// Every `display` entry, in order; malformed entries stay in place
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuildDocument {
    pub instances: Vec<Result<InstanceDocument, MalformedInstance>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// JSON for `.json` files; everything else is read as YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Yaml,
        }
    }
}

/// Fields of one entry; an error describes an unreadable value
type EntryFields = Result<Vec<(String, Result<Value, String>)>, MalformedInstance>;

impl BuildDocument {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.display().to_string(),
            source,
        })?;
        log::debug!("Loaded build document {}", path.display());
        Self::from_str_with_format(&raw, Format::from_path(path))
    }

    pub fn from_str_with_format(raw: &str, format: Format) -> Result<Self, DocumentError> {
        match format {
            Format::Json => Self::from_value(serde_json::from_str::<Value>(raw)?),
            Format::Yaml => Self::from_yaml(serde_yaml::from_str::<serde_yaml::Value>(raw)?),
        }
    }

    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let Value::Object(mut top) = value else {
            return Err(top_level_error());
        };
        for key in top.keys().filter(|k| k.as_str() != keys::DISPLAY) {
            log::debug!("Ignoring top-level section '{key}'");
        }

        let entries = match top.remove(keys::DISPLAY) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(display_list_error()),
        };
        Ok(Self::from_entries(entries.into_iter().map(json_entry_fields)))
    }

    fn from_yaml(value: serde_yaml::Value) -> Result<Self, DocumentError> {
        use serde_yaml::Value as Yaml;

        let Yaml::Mapping(top) = value else {
            return Err(top_level_error());
        };
        let mut display = None;
        for (key, value) in top {
            match yaml_key(key) {
                Ok(key) if key == keys::DISPLAY => display = Some(value),
                Ok(key) => log::debug!("Ignoring top-level section '{key}'"),
                Err(_) => log::debug!("Ignoring top-level section with a non-scalar key"),
            }
        }

        let entries = match display {
            None | Some(Yaml::Null) => Vec::new(),
            Some(Yaml::Sequence(entries)) => entries,
            Some(_) => return Err(display_list_error()),
        };
        Ok(Self::from_entries(entries.into_iter().map(yaml_entry_fields)))
    }

    fn from_entries(entries: impl Iterator<Item = EntryFields>) -> Self {
        let instances: Vec<_> = entries.map(|fields| fields.and_then(instance_from_fields)).collect();
        log::debug!("Build document holds {} display(s)", instances.len());
        BuildDocument { instances }
    }
}

fn top_level_error() -> DocumentError {
    DocumentError::Structure("top level must be a mapping".to_string())
}

fn display_list_error() -> DocumentError {
    DocumentError::Structure(format!("'{}' must be a list of displays", keys::DISPLAY))
}

fn entry_not_mapping(actual: &str) -> MalformedInstance {
    MalformedInstance::new(format!("entry must be a mapping, got {actual}"))
}

fn instance_from_fields(
    fields: Vec<(String, Result<Value, String>)>,
) -> Result<InstanceDocument, MalformedInstance> {
    let mut platform = None;
    let mut config = ConfigDocument::default();
    for (key, value) in fields {
        if key == keys::PLATFORM {
            platform = Some(value);
            continue;
        }
        match value {
            Ok(value) => config.insert(key, value),
            Err(actual) => config.insert_unreadable(key, actual),
        }
    }

    let platform = match platform {
        Some(Ok(Value::String(platform))) => platform,
        Some(Ok(other)) => return Err(platform_not_string(&describe_value(&other))),
        Some(Err(actual)) => return Err(platform_not_string(&actual)),
        None => {
            return Err(MalformedInstance::new(format!(
                "'{}' is missing",
                keys::PLATFORM
            )))
        }
    };
    Ok(InstanceDocument { platform, config })
}

fn platform_not_string(actual: &str) -> MalformedInstance {
    MalformedInstance::new(format!(
        "'{}' must be a string, got {actual}",
        keys::PLATFORM
    ))
}

fn json_entry_fields(entry: Value) -> EntryFields {
    match entry {
        Value::Object(map) => Ok(map.into_iter().map(|(key, value)| (key, Ok(value))).collect()),
        other => Err(entry_not_mapping(&describe_value(&other))),
    }
}

fn yaml_entry_fields(entry: serde_yaml::Value) -> EntryFields {
    match entry {
        serde_yaml::Value::Mapping(mapping) => mapping
            .into_iter()
            .map(|(key, value)| -> Result<_, MalformedInstance> {
                let key = yaml_key(key).map_err(|actual| {
                    MalformedInstance::new(format!("keys must be scalars, got {actual}"))
                })?;
                Ok((key, yaml_to_json(value)))
            })
            .collect(),
        other => match yaml_to_json(other) {
            Ok(value) => Err(entry_not_mapping(&describe_value(&value))),
            Err(actual) => Err(entry_not_mapping(&actual)),
        },
    }
}

/// Convert YAML into the JSON value model, turning `!lambda` tags into plain
/// strings
///
/// Values the model cannot hold are described in the error.
fn yaml_to_json(value: serde_yaml::Value) -> Result<Value, String> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => yaml_number(&n)?,
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                map.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => yaml_tagged(*tagged)?,
    })
}

fn yaml_tagged(tagged: TaggedValue) -> Result<Value, String> {
    let tag = tagged.tag.to_string();
    if tag.trim_start_matches('!') != LAMBDA_TAG {
        return Err(format!("a value tagged '{tag}'"));
    }
    match tagged.value {
        serde_yaml::Value::String(body) => Ok(Value::String(body)),
        _ => Err(format!("'{tag}' on a non-string value")),
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Result<Value, String> {
    if let Some(i) = n.as_i64() {
        Ok(Value::from(i))
    } else if let Some(u) = n.as_u64() {
        Ok(Value::from(u))
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| n.to_string())
    }
}

fn yaml_key(key: serde_yaml::Value) -> Result<String, String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Sequence(_) => Err("a list".to_string()),
        serde_yaml::Value::Mapping(_) => Err("a mapping".to_string()),
        serde_yaml::Value::Null => Err("nothing".to_string()),
        serde_yaml::Value::Tagged(tagged) => Err(format!("a value tagged '{}'", tagged.tag)),
    }
}
