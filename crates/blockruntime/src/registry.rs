use blockcore::{ElementHandler, ElementKind, FieldDefinition};
use std::collections::HashMap;
use std::sync::Arc;

/// Everything a palette needs to offer one element kind
#[derive(Debug, Clone)]
pub struct ElementMetadata {
    pub kind: ElementKind,
    pub display_name: String,
    pub description: String,
    pub category: String,
    pub fields: Vec<FieldDefinition>,
}

/// Registry of handlers by element kind
pub struct HandlerRegistry {
    handlers: HashMap<ElementKind, Arc<dyn ElementHandler>>,
    fallback: Option<Arc<dyn ElementHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            fallback: None,
        }
    }

    /// Register the handler for one kind, replacing any previous one
    pub fn register(&mut self, kind: ElementKind, handler: Arc<dyn ElementHandler>) {
        tracing::info!("Registering handler {} for element type: {}", handler.name(), kind);
        self.handlers.insert(kind, handler);
    }

    /// Handler used for kinds with no registration, including unrecognized ones
    pub fn set_fallback(&mut self, handler: Arc<dyn ElementHandler>) {
        tracing::info!("Registering fallback handler: {}", handler.name());
        self.fallback = Some(handler);
    }

    pub fn resolve(&self, kind: &ElementKind) -> Option<Arc<dyn ElementHandler>> {
        self.handlers.get(kind).or(self.fallback.as_ref()).cloned()
    }

    /// Registered recognized kinds, in palette order
    pub fn list_kinds(&self) -> Vec<ElementKind> {
        ElementKind::ALL
            .iter()
            .filter(|kind| self.handlers.contains_key(*kind))
            .cloned()
            .collect()
    }

    pub fn get_metadata(&self, kind: &ElementKind) -> Option<ElementMetadata> {
        self.resolve(kind).map(|handler| {
            let meta = handler.metadata();
            ElementMetadata {
                kind: kind.clone(),
                display_name: kind.display_name().into_owned(),
                description: meta.description,
                category: meta.category,
                fields: kind.fields(),
            }
        })
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
