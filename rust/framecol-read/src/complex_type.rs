//! Handlers for `COMPLEX<name>` column payloads.

use std::sync::Arc;

use ahash::AHashMap;
use framecol_common::{Result, error::Error};
use framecol_vector::ComplexValue;

/// Deserializes the payloads of one complex type.
///
/// A handler receives the payload bytes of a single non-null row, with the leading
/// null indicator already stripped.
pub trait ComplexTypeSerde: Send + Sync + 'static {
    /// Name under which the type appears in frames, e.g. `json`.
    fn type_name(&self) -> &str;

    fn deserialize(&self, payload: &[u8]) -> Result<ComplexValue>;
}

/// Payloads holding UTF-8 JSON documents, decoded into [`serde_json::Value`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonComplexSerde;

impl JsonComplexSerde {
    pub const TYPE_NAME: &'static str = "json";
}

impl ComplexTypeSerde for JsonComplexSerde {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn deserialize(&self, payload: &[u8]) -> Result<ComplexValue> {
        let value = serde_json::from_slice::<serde_json::Value>(payload)
            .map_err(|e| Error::complex_decode(Self::TYPE_NAME, e))?;
        Ok(ComplexValue::new(Self::TYPE_NAME, value))
    }
}

/// Opaque payloads, kept as `Vec<u8>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesComplexSerde;

impl BytesComplexSerde {
    pub const TYPE_NAME: &'static str = "bytes";
}

impl ComplexTypeSerde for BytesComplexSerde {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn deserialize(&self, payload: &[u8]) -> Result<ComplexValue> {
        Ok(ComplexValue::new(Self::TYPE_NAME, payload.to_vec()))
    }
}

/// Maps complex type names to their handlers.
#[derive(Clone, Default)]
pub struct ComplexTypeRegistry {
    handlers: AHashMap<String, Arc<dyn ComplexTypeSerde>>,
}

impl ComplexTypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> ComplexTypeRegistry {
        ComplexTypeRegistry::default()
    }

    /// Creates a registry holding the `json` and `bytes` handlers.
    pub fn with_builtins() -> ComplexTypeRegistry {
        let mut registry = ComplexTypeRegistry::new();
        registry.register(Arc::new(JsonComplexSerde));
        registry.register(Arc::new(BytesComplexSerde));
        registry
    }

    /// Registers `handler` under its type name, returning the handler it replaces.
    pub fn register(
        &mut self,
        handler: Arc<dyn ComplexTypeSerde>,
    ) -> Option<Arc<dyn ComplexTypeSerde>> {
        let name = handler.type_name().to_string();
        let previous = self.handlers.insert(name, handler);
        if let Some(previous) = &previous {
            log::debug!(
                "replaced handler for complex type '{}'",
                previous.type_name()
            );
        }
        previous
    }

    pub fn get(&self, type_name: &str) -> Option<&Arc<dyn ComplexTypeSerde>> {
        self.handlers.get(type_name)
    }

    /// Like [`get`](Self::get), failing with `UnknownComplexType` for a missing name.
    pub fn resolve(&self, type_name: &str) -> Result<&Arc<dyn ComplexTypeSerde>> {
        self.get(type_name)
            .ok_or_else(|| Error::unknown_complex_type(type_name))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.handlers.contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names = self.handlers.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for ComplexTypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComplexTypeRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}
