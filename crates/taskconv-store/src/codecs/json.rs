//! JSON descriptor codec
//!
//! Uses serde_json; key order is preserved in both directions.

use super::{into_descriptor, DescriptorCodec};
use crate::error::CodecError;
use serde_json::Value;
use taskconv_markup::Descriptor;

/// JSON codec
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Create new JSON codec
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DescriptorCodec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extensions(&self) -> &[&'static str] {
        &["json"]
    }

    fn parse(&self, content: &str) -> Result<Descriptor, CodecError> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| CodecError::syntax(self.name(), e.to_string()))?;
        into_descriptor(self.name(), value)
    }

    fn serialize(&self, descriptor: &Descriptor) -> Result<String, CodecError> {
        let mut out = serde_json::to_string_pretty(descriptor)
            .map_err(|e| CodecError::serialize(self.name(), e.to_string()))?;
        out.push('\n');
        Ok(out)
    }
}
