use async_trait::async_trait;
use blockcore::{ElementContext, ElementError, ElementHandler, ElementOutcome, HandlerMetadata};

/// Kinds with no behaviour of their own (loop, chart, save_data, timer and
/// unrecognized types). Loop performs no iteration.
pub struct GenericHandler;

#[async_trait]
impl ElementHandler for GenericHandler {
    fn name(&self) -> &str {
        "generic"
    }

    async fn execute(&self, ctx: ElementContext) -> Result<ElementOutcome, ElementError> {
        Ok(ElementOutcome::ready(format!("{} executed successfully", ctx.kind)))
    }

    fn metadata(&self) -> HandlerMetadata {
        HandlerMetadata {
            description: "Placeholder step; configuration options coming soon".to_string(),
            category: "general".to_string(),
        }
    }
}
