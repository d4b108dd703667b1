//! Wire types for the status matrix document.
//!
//! These types match the JSON served by a perfSONAR/MyOSG matrix endpoint.
//! Rows are source probes, columns are destination probes, and every
//! `matrix[row][column]` slot holds the forward (and optionally reverse)
//! measurement for that pair.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::Direction;

/// A complete snapshot of the status matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusMatrixDocument {
    /// Destination probes, in display order.
    #[serde(default)]
    pub columns: Vec<Host>,
    /// Source probes, in display order.
    #[serde(default)]
    pub rows: Vec<Host>,
    /// `matrix[row][column]` is the list of measurements for that pair.
    /// Index 0 is the forward direction, index 1 (if present) the reverse.
    #[serde(default)]
    pub matrix: Vec<Vec<Vec<MeasurementCell>>>,
    /// Display labels keyed by result status code.
    #[serde(default)]
    pub status_labels: StatusLabels,
}

impl StatusMatrixDocument {
    /// Returns the measurement for a row/column pair in the given direction.
    pub fn entry(&self, row: usize, column: usize, direction: Direction) -> Option<&MeasurementCell> {
        self.matrix.get(row)?.get(column)?.get(direction.index())
    }
}

/// A probe host (row or column header).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub hostname: String,
}

/// One source/destination measurement entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementCell {
    /// Identifier used to correlate a label with its detail panel.
    #[serde(default, deserialize_with = "text")]
    pub id: String,
    /// Test parameters (source, destination and any metadata).
    #[serde(default)]
    pub parameters: Parameters,
    /// Latest result, absent when nothing has been measured yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<MeasurementResult>,
}

/// The result of a single measurement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    /// Status code, see [`crate::data::classify`]. `None` when the
    /// document's value is missing or not an integer.
    #[serde(default, deserialize_with = "status_code")]
    pub status: Option<i64>,
    #[serde(default, deserialize_with = "text")]
    pub message: String,
    #[serde(default, deserialize_with = "text")]
    pub time: String,
    /// Measurement details. May carry an `average` such as `"12.3ms"`.
    #[serde(default)]
    pub parameters: Parameters,
}

/// Ordered key/value list decoded from a JSON object.
///
/// Entries keep the order they had in the document. Values are stored as
/// display text: strings verbatim, `null` as empty, anything else as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters(Vec<(String, String)>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the first value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy the pairs out as owned rows.
    pub fn to_rows(&self) -> Vec<(String, String)> {
        self.0.clone()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl Serialize for Parameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Parameters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ParametersVisitor;

        impl<'de> Visitor<'de> for ParametersVisitor {
            type Value = Parameters;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of parameter names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Parameters, A::Error> {
                let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    pairs.push((key, display_value(&value)));
                }
                Ok(Parameters(pairs))
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Parameters, E> {
                Ok(Parameters::default())
            }

            fn visit_none<E: serde::de::Error>(self) -> Result<Parameters, E> {
                Ok(Parameters::default())
            }
        }

        deserializer.deserialize_any(ParametersVisitor)
    }
}

/// Status code to display label mapping.
///
/// Accepts either a JSON object keyed by decimal code (`{"0": "OK"}`) or a
/// JSON array indexed by code (`["OK", "WARNING"]`). Keys that are not
/// integers are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StatusLabelsRepr")]
pub struct StatusLabels(BTreeMap<i64, String>);

impl StatusLabels {
    pub fn get(&self, code: i64) -> Option<&str> {
        self.0.get(&code).map(String::as_str)
    }

    pub fn insert(&mut self, code: i64, label: impl Into<String>) {
        self.0.insert(code, label.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<L: Into<String>> FromIterator<(i64, L)> for StatusLabels {
    fn from_iter<I: IntoIterator<Item = (i64, L)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(c, l)| (c, l.into())).collect())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StatusLabelsRepr {
    Map(BTreeMap<String, Value>),
    List(Vec<Value>),
}

impl From<StatusLabelsRepr> for StatusLabels {
    fn from(repr: StatusLabelsRepr) -> Self {
        match repr {
            StatusLabelsRepr::Map(map) => map
                .into_iter()
                .filter_map(|(code, label)| {
                    code.trim().parse::<i64>().ok().map(|c| (c, display_value(&label)))
                })
                .collect(),
            StatusLabelsRepr::List(list) => list
                .iter()
                .enumerate()
                .map(|(code, label)| (code as i64, display_value(label)))
                .collect(),
        }
    }
}

/// Render a JSON value the way it should appear in a detail table.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Accept a string, number or null and keep its display text.
fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(|v| display_value(&v))
}

/// Accept any JSON value as a status code, keeping only integers.
///
/// Strings such as `"2"` are not codes; neither are fractions.
fn status_code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        _ => None,
    })
}
