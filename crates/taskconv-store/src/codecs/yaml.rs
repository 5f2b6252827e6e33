//! YAML descriptor codec
//!
//! Uses serde_yaml. A descriptor file holds exactly one document whose root
//! is a mapping. Scalar mapping keys (numbers, booleans) are read as strings.

use super::{into_descriptor, DescriptorCodec};
use crate::error::CodecError;
use serde::Deserialize;
use serde_json::Value;
use taskconv_markup::Descriptor;

/// YAML codec
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl YamlCodec {
    /// Create new YAML codec
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DescriptorCodec for YamlCodec {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn extensions(&self) -> &[&'static str] {
        &["yaml", "yml"]
    }

    fn parse(&self, content: &str) -> Result<Descriptor, CodecError> {
        let mut documents = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(content) {
            let value = serde_yaml::Value::deserialize(doc)
                .map_err(|e| CodecError::syntax(self.name(), e.to_string()))?;
            documents.push(value);
        }

        if documents.len() > 1 {
            return Err(CodecError::syntax(
                self.name(),
                format!("expected a single document, found {}", documents.len()),
            ));
        }

        match documents.pop() {
            None | Some(serde_yaml::Value::Null) => {
                Err(CodecError::syntax(self.name(), "empty YAML document"))
            }
            Some(root) => into_descriptor(self.name(), to_json(self.name(), root)?),
        }
    }

    fn serialize(&self, descriptor: &Descriptor) -> Result<String, CodecError> {
        serde_yaml::to_string(descriptor).map_err(|e| CodecError::serialize(self.name(), e.to_string()))
    }
}

/// Convert a YAML value into the descriptor value model
fn to_json(codec: &'static str, value: serde_yaml::Value) -> Result<Value, CodecError> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| CodecError::shape(codec, format!("unsupported number: {n}")))?
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => Value::Array(
            seq.into_iter()
                .map(|v| to_json(codec, v))
                .collect::<Result<_, _>>()?,
        ),
        serde_yaml::Value::Mapping(map) => {
            let mut out = Descriptor::new();
            for (key, value) in map {
                out.insert(key_to_string(codec, key)?, to_json(codec, value)?);
            }
            Value::Object(out)
        }
        serde_yaml::Value::Tagged(tagged) => to_json(codec, tagged.value)?,
    })
}

fn key_to_string(codec: &'static str, key: serde_yaml::Value) -> Result<String, CodecError> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(CodecError::shape(
            codec,
            format!("unsupported mapping key: {other:?}"),
        )),
    }
}
