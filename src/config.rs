//! Loading of module descriptor files.
//!
//! Every file in the configuration directory describes one command module.
//! Files are parsed as YAML into [`serde_yaml::Value`], whose mappings keep
//! keys in the order they were written. The dispatcher relies on that when it
//! lists a module's commands. A key repeated within one mapping keeps its first
//! position and takes the last value.

use serde::de::{self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Directory name of the descriptor files, next to the executable's directory.
pub const CONFIGURE_DIR_NAME: &str = "ptysh.d";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// One parsed descriptor file.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorDocument {
    /// File the document was loaded from.
    pub path: PathBuf,
    pub body: Value,
}

impl DescriptorDocument {
    /// Top-level keys in declaration order.
    ///
    /// Empty when the document is not a mapping or a key is not a string.
    pub fn keys(&self) -> Vec<&str> {
        match &self.body {
            Value::Mapping(map) => map.keys().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }
}

/// Scans a directory of descriptor files.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load every file of the directory.
    ///
    /// Returns `Ok(None)` when the directory does not exist, meaning no module
    /// is configured. Any unreadable or malformed file fails the whole load.
    /// Files are visited in file name order.
    pub fn load_all(&self) -> Result<Option<Vec<DescriptorDocument>>, ConfigError> {
        if !self.dir.is_dir() {
            debug!(dir = %self.dir.display(), "no configuration directory");
            return Ok(None);
        }

        let mut files = fs::read_dir(&self.dir)
            .map_err(io_error(&self.dir))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(io_error(&self.dir))?;
        files.sort();

        let mut conf_list = Vec::with_capacity(files.len());
        for path in files {
            conf_list.push(load_descriptor(&path)?);
        }
        Ok(Some(conf_list))
    }
}

/// Read `path` in full and parse it as one descriptor document.
pub fn load_descriptor(path: &Path) -> Result<DescriptorDocument, ConfigError> {
    let bytes = fs::read(path).map_err(io_error(path))?;
    let OrderedValue(body) =
        serde_yaml::from_slice(&bytes).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), "loaded module descriptor");

    Ok(DescriptorDocument {
        path: path.to_path_buf(),
        body,
    })
}

/// [`Value`] that tolerates repeated mapping keys.
///
/// `Value`'s own `Deserialize` rejects them; here the later entry overwrites
/// the earlier one in place.
struct OrderedValue(Value);

impl<'de> Deserialize<'de> for OrderedValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(OrderedValueVisitor).map(OrderedValue)
    }
}

struct OrderedValueVisitor;

impl<'de> Visitor<'de> for OrderedValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any YAML value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        OrderedValue::deserialize(deserializer).map(|v| v.0)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::new();
        while let Some(OrderedValue(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut mapping = Mapping::new();
        while let Some((OrderedValue(key), OrderedValue(value))) = map.next_entry()? {
            // insert on an existing key replaces the value, keeps the slot
            mapping.insert(key, value);
        }
        Ok(Value::Mapping(mapping))
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Value, A::Error> {
        let (tag, variant) = data.variant::<String>()?;
        let OrderedValue(value) = variant.newtype_variant()?;
        Ok(Value::Tagged(Box::new(TaggedValue {
            tag: Tag::new(tag),
            value,
        })))
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> ConfigError {
    let path = path.to_path_buf();
    move |source| ConfigError::Io { path, source }
}

/// `<dir of exe>/../ptysh.d`, the default descriptor directory.
pub fn default_conf_dir() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    exe_dir.join("..").join(CONFIGURE_DIR_NAME)
}
