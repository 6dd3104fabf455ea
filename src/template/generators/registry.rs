use std::collections::HashMap;
use std::sync::Arc;

use super::{common, Generator, Param};

/// Constructs a generator from the arguments of a `var` declaration. The
/// error string is attached to the declaration's line by the parser.
pub type GeneratorFactory = fn(&[Param]) -> std::result::Result<Arc<dyn Generator>, String>;

/// Maps declared type names to generator factories. Fixed built-ins are
/// installed at construction; callers may register further factories before
/// parsing.
#[derive(Debug)]
pub struct GeneratorRegistry {
    factories: HashMap<String, GeneratorFactory>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        let mut registry = GeneratorRegistry {
            factories: HashMap::new(),
        };
        registry.register("literal-text", common::literal_text_factory);
        registry.register("random-string", common::random_string_factory);
        registry.register("random-choice", common::random_choice_factory);
        registry
    }

    pub fn register(&mut self, type_name: &str, factory: GeneratorFactory) {
        self.factories.insert(type_name.to_string(), factory);
    }

    pub fn factory(&self, type_name: &str) -> Option<GeneratorFactory> {
        self.factories.get(type_name).copied()
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
