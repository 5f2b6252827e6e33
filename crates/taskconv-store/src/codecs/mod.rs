//! Descriptor codecs for on-disk formats
//!
//! Each codec translates one file format to and from the descriptor mapping:
//! - YAML (`.yaml`, `.yml`) via serde_yaml
//! - JSON (`.json`) via serde_json
//! - RST (`.rst`), a restructured-text flavored task document

use crate::error::CodecError;
use taskconv_markup::Descriptor;

mod json;
mod rst;
mod yaml;

pub use json::JsonCodec;
pub use rst::RstCodec;
pub use yaml::YamlCodec;

/// Name of the codec every descriptor is rewritten with on forced conversion
pub const YAML_FORMAT: &str = "yaml";

/// Codec trait for converting descriptor files into descriptor mappings
///
/// Implement this trait to add support for new file formats.
pub trait DescriptorCodec: Send + Sync + 'static {
    /// Short format name (e.g. `"yaml"`)
    fn name(&self) -> &'static str;

    /// Supported file extensions (without dot); the first one is used when writing
    fn extensions(&self) -> &[&'static str];

    /// Parse file content into a descriptor
    ///
    /// # Errors
    /// `CodecError` if the content is not valid or its root is not a mapping
    fn parse(&self, content: &str) -> Result<Descriptor, CodecError>;

    /// Serialize a descriptor into file content
    ///
    /// # Errors
    /// `CodecError` if the descriptor cannot be expressed in this format
    fn serialize(&self, descriptor: &Descriptor) -> Result<String, CodecError>;

    /// Check if this codec handles the given extension
    fn matches(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }

    /// Extension used for newly written files
    fn canonical_extension(&self) -> &'static str {
        self.extensions().first().copied().unwrap_or_else(|| self.name())
    }
}

/// Ordered codec list, resolved by first match
pub struct CodecRegistry {
    codecs: Vec<Box<dyn DescriptorCodec>>,
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("codecs", &self.names())
            .field("extensions", &self.all_extensions())
            .finish()
    }
}

impl CodecRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { codecs: Vec::new() }
    }

    /// Register a codec after the existing ones
    pub fn register<C: DescriptorCodec>(&mut self, codec: C) {
        self.codecs.push(Box::new(codec));
    }

    /// Iterate codecs in registration order
    pub fn iter(&self) -> impl Iterator<Item = &dyn DescriptorCodec> {
        self.codecs.iter().map(|c| &**c)
    }

    /// Find codec for a file extension
    #[must_use]
    pub fn find_for_extension(&self, extension: &str) -> Option<&dyn DescriptorCodec> {
        self.iter().find(|c| c.matches(extension))
    }

    /// Find codec by format name, or by one of its extensions
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&dyn DescriptorCodec> {
        self.iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
            .or_else(|| self.find_for_extension(name))
    }

    /// Registered format names
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(|c| c.name()).collect()
    }

    /// All registered extensions, in registration order
    #[must_use]
    pub fn all_extensions(&self) -> Vec<&'static str> {
        self.iter().flat_map(|c| c.extensions().iter().copied()).collect()
    }

    /// Number of registered codecs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    /// True if no codec is registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

/// Create registry with the built-in codecs: YAML, JSON, RST
#[must_use]
pub fn default_codecs() -> CodecRegistry {
    let mut registry = CodecRegistry::new();
    registry.register(YamlCodec);
    registry.register(JsonCodec);
    registry.register(RstCodec);
    registry
}

/// Ensure a decoded value is a mapping
pub(crate) fn into_descriptor(
    codec: &'static str,
    value: serde_json::Value,
) -> Result<Descriptor, CodecError> {
    match value {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(CodecError::shape(
            codec,
            format!(
                "descriptor root must be a mapping, found {}",
                taskconv_markup::value::kind_of(&other)
            ),
        )),
    }
}
