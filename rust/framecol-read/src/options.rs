//! Configuration of the column readers bound by [`FrameColumnReaders`](crate::FrameColumnReaders).

use std::sync::Arc;

use crate::complex_type::{ComplexTypeRegistry, ComplexTypeSerde};

/// Options shared by every reader created through one dispatcher.
///
/// The default options resolve complex columns against the built-in `json` and
/// `bytes` handlers and reject invalid UTF-8 in string columns.
#[derive(Debug, Clone)]
pub struct FrameReaderOptions {
    complex_types: Arc<ComplexTypeRegistry>,
    lossy_utf8: bool,
}

impl FrameReaderOptions {
    pub fn new() -> FrameReaderOptions {
        FrameReaderOptions {
            complex_types: Arc::new(ComplexTypeRegistry::with_builtins()),
            lossy_utf8: false,
        }
    }

    /// Adds (or replaces) a complex type handler.
    pub fn with_complex_type(mut self, handler: Arc<dyn ComplexTypeSerde>) -> Self {
        Arc::make_mut(&mut self.complex_types).register(handler);
        self
    }

    /// Replaces the complex type registry.
    pub fn with_registry(mut self, registry: Arc<ComplexTypeRegistry>) -> Self {
        self.complex_types = registry;
        self
    }

    /// When set, invalid UTF-8 in string values is replaced with `U+FFFD`
    /// instead of failing the read.
    pub fn with_lossy_utf8(mut self, lossy: bool) -> Self {
        self.lossy_utf8 = lossy;
        self
    }

    pub fn complex_types(&self) -> &Arc<ComplexTypeRegistry> {
        &self.complex_types
    }

    pub fn lossy_utf8(&self) -> bool {
        self.lossy_utf8
    }
}

impl Default for FrameReaderOptions {
    fn default() -> Self {
        FrameReaderOptions::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex_type::BytesComplexSerde;

    #[test]
    fn test_builder() {
        let options = FrameReaderOptions::new();
        assert!(!options.lossy_utf8());
        assert!(options.complex_types().contains("json"));

        let shared = options.complex_types().clone();
        let options = options
            .with_registry(Arc::new(ComplexTypeRegistry::new()))
            .with_complex_type(Arc::new(BytesComplexSerde))
            .with_lossy_utf8(true);
        assert!(options.lossy_utf8());
        assert_eq!(options.complex_types().type_names(), vec!["bytes"]);
        // the registry handed out earlier is unaffected
        assert!(shared.contains("json"));
    }
}
