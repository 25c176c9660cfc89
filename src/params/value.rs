use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A parameter as supplied by the model configuration.
///
/// Integers and floats stay distinct so that `[1, 2]` is not mistaken for a
/// list of floats. `Unset` is the "not defined" marker (JSON `null` or a
/// missing key).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    #[default]
    Unset,
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<ParamValue>),
}

static UNSET: ParamValue = ParamValue::Unset;

impl ParamValue {
    /// Short type name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ParamValue::Unset => "unset",
            ParamValue::Int(_) => "integer",
            ParamValue::Float(_) => "float",
            ParamValue::Text(_) => "string",
            ParamValue::List(_) => "list",
        }
    }

    /// The elements as floats, if this is a list whose every item is a float.
    pub fn as_float_list(&self) -> Option<Vec<f64>> {
        let ParamValue::List(items) = self else {
            return None;
        };
        items
            .iter()
            .map(|item| match item {
                ParamValue::Float(v) => Some(*v),
                _ => None,
            })
            .collect()
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(items: Vec<T>) -> Self {
        ParamValue::List(items.into_iter().map(Into::into).collect())
    }
}

// ---------------------------------------------------------------------------
// ParameterBundle – name → value
// ---------------------------------------------------------------------------

/// The key-value set of model inputs handed to the validator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterBundle {
    values: BTreeMap<String, ParamValue>,
}

impl ParameterBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<ParamValue>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// The value for `name`; missing names read as [`ParamValue::Unset`].
    pub fn get(&self, name: &str) -> &ParamValue {
        self.values.get(name).unwrap_or(&UNSET)
    }

    /// Parse a JSON object of parameters.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing parameter JSON")
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading parameter file {}", path.display()))?;
        Self::from_json_str(&text)
    }
}
