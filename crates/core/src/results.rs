//! Simulation result values and their JSON normalization.
//!
//! Result datasets contain floating point series with NaN and infinite
//! entries, and maps keyed by tuples or numbers. JSON supports neither, so
//! [`ResultValue::to_json`] replaces NaN with the string `"NaN"`, ±infinity
//! with `"infinity"` and turns every key into a string.

use serde_json::{Map, Number, Value};

/// Replacement for NaN values.
pub const NAN_LITERAL: &str = "NaN";
/// Replacement for positive and negative infinity.
pub const INFINITY_LITERAL: &str = "infinity";

/// Key of a result map entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultKey {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    /// Composite key, e.g. `(from_node, to_node)` of a flow.
    Tuple(Vec<ResultKey>),
}

impl ResultKey {
    /// String used as the JSON object key.
    ///
    /// Scalars follow the usual JSON conventions (`true`, `null`, decimal
    /// numbers). Tuples are rendered as `('a', 'b')`.
    pub fn to_json_key(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => float_key(*f),
            Self::Bool(b) => b.to_string(),
            Self::Null => "null".to_string(),
            Self::Tuple(parts) => tuple_repr(parts),
        }
    }

    fn repr(&self) -> String {
        match self {
            Self::Text(s) => format!("'{s}'"),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => float_key(*f),
            Self::Bool(true) => "True".to_string(),
            Self::Bool(false) => "False".to_string(),
            Self::Null => "None".to_string(),
            Self::Tuple(parts) => tuple_repr(parts),
        }
    }
}

fn tuple_repr(parts: &[ResultKey]) -> String {
    let inner: Vec<String> = parts.iter().map(ResultKey::repr).collect();
    if inner.len() == 1 {
        format!("({},)", inner[0])
    } else {
        format!("({})", inner.join(", "))
    }
}

fn float_key(f: f64) -> String {
    if f.is_nan() {
        NAN_LITERAL.to_string()
    } else if f.is_infinite() {
        let literal = if f > 0.0 { "Infinity" } else { "-Infinity" };
        literal.to_string()
    } else {
        format!("{f:?}")
    }
}

/// A value inside a simulation result dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// A numeric time series.
    Series(Vec<f64>),
    List(Vec<ResultValue>),
    Map(Vec<(ResultKey, ResultValue)>),
}

impl ResultValue {
    /// Convert into JSON, normalizing values JSON cannot represent.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::Number(Number::from(*i)),
            Self::Float(f) => float_to_json(*f),
            Self::Text(s) => Value::String(s.clone()),
            Self::Series(values) => {
                Value::Array(values.iter().copied().map(float_to_json).collect())
            }
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(entries) => {
                let mut map = Map::with_capacity(entries.len());
                for (key, value) in entries {
                    map.insert(key.to_json_key(), value.to_json());
                }
                Value::Object(map)
            }
        }
    }

    /// Decode a value received from the simulation service.
    ///
    /// Arrays made only of numbers, `null` and the literals `"NaN"`,
    /// `"Infinity"` and `"-Infinity"` become [`ResultValue::Series`] (`null`
    /// is a missing sample and decodes to NaN). The same literals outside an
    /// array decode to floats.
    pub fn from_wire(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => match special_float(&s) {
                Some(f) => Self::Float(f),
                None => Self::Text(s),
            },
            Value::Array(items) => match as_series(&items) {
                Some(series) => Self::Series(series),
                None => Self::List(items.into_iter().map(Self::from_wire).collect()),
            },
            Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(k, v)| (ResultKey::Text(k), Self::from_wire(v)))
                    .collect(),
            ),
        }
    }
}

fn float_to_json(f: f64) -> Value {
    if f.is_nan() {
        return Value::String(NAN_LITERAL.to_string());
    }
    if f.is_infinite() {
        return Value::String(INFINITY_LITERAL.to_string());
    }
    Number::from_f64(f).map_or(Value::Null, Value::Number)
}

fn special_float(s: &str) -> Option<f64> {
    match s {
        "NaN" => Some(f64::NAN),
        "Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

fn as_series(items: &[Value]) -> Option<Vec<f64>> {
    if items.is_empty() {
        return None;
    }
    let mut has_number = false;
    let mut series = Vec::with_capacity(items.len());
    for item in items {
        let sample = match item {
            Value::Number(n) => {
                has_number = true;
                n.as_f64()?
            }
            Value::Null => f64::NAN,
            Value::String(s) => special_float(s)?,
            _ => return None,
        };
        series.push(sample);
    }
    has_number.then_some(series)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    // -- to_json --

    #[test]
    fn nan_and_infinity_scalars_become_literals() {
        assert_eq!(ResultValue::Float(f64::NAN).to_json(), json!("NaN"));
        assert_eq!(ResultValue::Float(f64::INFINITY).to_json(), json!("infinity"));
        assert_eq!(
            ResultValue::Float(f64::NEG_INFINITY).to_json(),
            json!("infinity")
        );
        assert_eq!(ResultValue::Float(2.5).to_json(), json!(2.5));
    }

    #[test]
    fn series_entries_are_normalized() {
        let series = ResultValue::Series(vec![1.0, f64::NAN, f64::INFINITY, -3.5]);
        assert_eq!(series.to_json(), json!([1.0, "NaN", "infinity", -3.5]));
    }

    #[test]
    fn nested_maps_are_normalized() {
        let value = ResultValue::Map(vec![(
            ResultKey::Text("flows".into()),
            ResultValue::Map(vec![(
                ResultKey::Int(3),
                ResultValue::Series(vec![f64::NAN]),
            )]),
        )]);
        assert_eq!(value.to_json(), json!({"flows": {"3": ["NaN"]}}));
    }

    #[test]
    fn tuple_keys_are_stringified() {
        let key = ResultKey::Tuple(vec![
            ResultKey::Text("electricity".into()),
            ResultKey::Text("demand".into()),
        ]);
        assert_eq!(key.to_json_key(), "('electricity', 'demand')");

        let single = ResultKey::Tuple(vec![ResultKey::Int(1)]);
        assert_eq!(single.to_json_key(), "(1,)");

        let mixed = ResultKey::Tuple(vec![ResultKey::Bool(true), ResultKey::Null]);
        assert_eq!(mixed.to_json_key(), "(True, None)");
    }

    #[test]
    fn scalar_keys_follow_json_conventions() {
        assert_eq!(ResultKey::Bool(false).to_json_key(), "false");
        assert_eq!(ResultKey::Null.to_json_key(), "null");
        assert_eq!(ResultKey::Float(1.0).to_json_key(), "1.0");
        assert_eq!(ResultKey::Float(f64::NAN).to_json_key(), "NaN");
    }

    #[test]
    fn plain_values_pass_through() {
        let value = ResultValue::List(vec![
            ResultValue::Null,
            ResultValue::Bool(true),
            ResultValue::Int(7),
            ResultValue::Text("bus".into()),
        ]);
        assert_eq!(value.to_json(), json!([null, true, 7, "bus"]));
    }

    // -- from_wire --

    #[test]
    fn numeric_arrays_decode_to_series() {
        let value = ResultValue::from_wire(json!([1, 2.5, null, "NaN", "-Infinity"]));
        let samples = match value {
            ResultValue::Series(samples) => samples,
            other => panic!("expected series, got {other:?}"),
        };
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0], 1.0);
        assert!(samples[2].is_nan());
        assert!(samples[3].is_nan());
        assert_eq!(samples[4], f64::NEG_INFINITY);
    }

    #[test]
    fn mixed_arrays_decode_to_lists() {
        let value = ResultValue::from_wire(json!([1, "bus"]));
        assert_eq!(
            value,
            ResultValue::List(vec![ResultValue::Int(1), ResultValue::Text("bus".into())])
        );
    }

    #[test]
    fn arrays_of_nulls_are_not_series() {
        let value = ResultValue::from_wire(json!([null, null]));
        assert_eq!(value, ResultValue::List(vec![ResultValue::Null, ResultValue::Null]));
    }

    #[test]
    fn wire_payload_normalizes_end_to_end() {
        let wire = json!({"storage": {"level": [0.5, null, "Infinity"], "capacity": "NaN"}});
        let json = ResultValue::from_wire(wire).to_json();
        assert_eq!(
            json,
            json!({"storage": {"level": [0.5, "NaN", "infinity"], "capacity": "NaN"}})
        );
    }
}
