//! YAML parsing on top of yaml-rust2
//!
//! Documents are converted to `serde_json::Value` so callers can use the
//! same typed deserialization path for YAML and JSON input. Flat
//! string maps (label documents) are read from the parser's event stream
//! instead, so scalars keep the text they were written with.

use serde_json::{Map, Number, Value};
use thiserror::Error;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};
use yaml_rust2::{Yaml, YamlLoader};

/// Error returned when a YAML document can't be parsed or converted
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct YamlError(String);

/// Parse the first document of a YAML string.
///
/// Empty input (or input holding only comments) yields `Value::Null`.
pub fn parse_yaml(input: &str) -> Result<Value, YamlError> {
    let mut docs = YamlLoader::load_from_str(input).map_err(|e| YamlError(e.to_string()))?;
    if docs.is_empty() {
        return Ok(Value::Null);
    }
    to_json(docs.swap_remove(0))
}

fn to_json(yaml: Yaml) -> Result<Value, YamlError> {
    let value = match yaml {
        Yaml::Null => Value::Null,
        Yaml::Boolean(b) => Value::Bool(b),
        Yaml::Integer(i) => Value::from(i),
        Yaml::Real(raw) => {
            let f: f64 = raw
                .parse()
                .map_err(|_| YamlError(format!("invalid float literal '{raw}'")))?;
            Number::from_f64(f).map_or(Value::Null, Value::Number)
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Array(items) => Value::Array(
            items
                .into_iter()
                .map(to_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Yaml::Hash(hash) => {
            let mut map = Map::with_capacity(hash.len());
            for (key, value) in hash {
                map.insert(key_string(key)?, to_json(value)?);
            }
            Value::Object(map)
        }
        Yaml::Alias(_) => return Err(YamlError("YAML aliases are not supported".to_string())),
        Yaml::BadValue => return Err(YamlError("bad YAML value".to_string())),
    };
    Ok(value)
}

/// Mapping keys are rendered the way they were written for scalars.
fn key_string(key: Yaml) -> Result<String, YamlError> {
    match key {
        Yaml::String(s) | Yaml::Real(s) => Ok(s),
        Yaml::Integer(i) => Ok(i.to_string()),
        Yaml::Boolean(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        _ => Err(YamlError("mapping keys must be scalars".to_string())),
    }
}

/// Parse the first document as a flat mapping of scalars.
///
/// Values keep their source text (`1.10` stays `"1.10"`, `0x1F` stays
/// `"0x1F"`). A plain null (`~`, `null` or nothing) is returned as `None`.
/// Empty input yields an empty list. Entries come back in document order.
pub fn parse_string_map(input: &str) -> Result<Vec<(String, Option<String>)>, YamlError> {
    let mut receiver = StringMapReceiver::default();
    Parser::new_from_str(input)
        .load(&mut receiver, false)
        .map_err(|e| YamlError(e.to_string()))?;
    receiver.finish()
}

#[derive(Default)]
enum Root {
    #[default]
    Empty,
    Mapping,
    Other(&'static str),
}

#[derive(Default)]
struct StringMapReceiver {
    root: Root,
    depth: usize,
    pending_key: Option<String>,
    entries: Vec<(String, Option<String>)>,
    error: Option<String>,
}

impl StringMapReceiver {
    fn fail(&mut self, message: String) {
        self.error.get_or_insert(message);
    }

    fn open(&mut self, found: &'static str) {
        match self.depth {
            0 if found == "mapping" => self.root = Root::Mapping,
            0 => self.root = Root::Other(found),
            1 => match self.pending_key.clone() {
                Some(key) => self.fail(format!("value of '{key}' must be a scalar, found {found}")),
                None => self.fail("mapping keys must be scalars".to_string()),
            },
            _ => {}
        }
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 1 {
            self.pending_key = None;
        }
    }

    fn scalar(&mut self, text: String, style: TScalarStyle) {
        let value = if style == TScalarStyle::Plain && is_null(&text) {
            None
        } else {
            Some(text)
        };
        match self.depth {
            0 if value.is_some() => self.root = Root::Other("scalar"),
            1 => match self.pending_key.take() {
                None => self.pending_key = Some(value.unwrap_or_default()),
                Some(key) => self.entries.push((key, value)),
            },
            _ => {}
        }
    }

    fn finish(self) -> Result<Vec<(String, Option<String>)>, YamlError> {
        if let Some(message) = self.error {
            return Err(YamlError(message));
        }
        match self.root {
            Root::Empty | Root::Mapping => Ok(self.entries),
            Root::Other(found) => Err(YamlError(format!("expected a mapping, found {found}"))),
        }
    }
}

impl MarkedEventReceiver for StringMapReceiver {
    fn on_event(&mut self, event: Event, _mark: Marker) {
        match event {
            Event::Scalar(text, style, ..) => self.scalar(text, style),
            Event::MappingStart(..) => self.open("mapping"),
            Event::SequenceStart(..) => self.open("sequence"),
            Event::MappingEnd | Event::SequenceEnd => self.close(),
            Event::Alias(_) => self.fail("YAML aliases are not supported".to_string()),
            _ => {}
        }
    }
}

fn is_null(text: &str) -> bool {
    matches!(text, "" | "~" | "null" | "Null" | "NULL")
}
