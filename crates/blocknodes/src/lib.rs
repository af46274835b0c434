//! Standard element library
//!
//! One handler per element kind. None of them touch the network, a mail
//! server or the file system: API calls and emails are simulated.

mod display;
mod email;
mod generic;
mod http;
mod input;
mod logic;
mod upload;

pub use display::DataDisplayHandler;
pub use email::EmailHandler;
pub use generic::GenericHandler;
pub use http::ApiCallHandler;
pub use input::InputHandler;
pub use logic::ConditionalHandler;
pub use upload::PdfUploadHandler;

use blockcore::{ElementHandler, ElementKind};
use blockruntime::HandlerRegistry;
use std::sync::Arc;

/// Handler for a kind. Adding a kind fails to compile until it is mapped here.
pub fn handler_for(kind: &ElementKind) -> Arc<dyn ElementHandler> {
    match kind {
        ElementKind::PdfUpload => Arc::new(PdfUploadHandler),
        ElementKind::TextInput
        | ElementKind::NumberInput
        | ElementKind::DateInput
        | ElementKind::Checkbox
        | ElementKind::Slider
        | ElementKind::Selectbox => Arc::new(InputHandler),
        ElementKind::Conditional => Arc::new(ConditionalHandler),
        ElementKind::DataDisplay => Arc::new(DataDisplayHandler),
        ElementKind::ApiCall => Arc::new(ApiCallHandler),
        ElementKind::Email => Arc::new(EmailHandler),
        ElementKind::Loop
        | ElementKind::Chart
        | ElementKind::SaveData
        | ElementKind::Timer
        | ElementKind::Other(_) => Arc::new(GenericHandler),
    }
}

/// Register all standard handlers with a registry
pub fn register_all(registry: &mut HandlerRegistry) {
    for kind in ElementKind::ALL.iter() {
        registry.register(kind.clone(), handler_for(kind));
    }
    registry.set_fallback(Arc::new(GenericHandler));
}

/// A registry with every standard handler
pub fn default_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    register_all(&mut registry);
    registry
}
