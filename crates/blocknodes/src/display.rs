use async_trait::async_trait;
use blockcore::{ElementContext, ElementError, ElementHandler, ElementOutcome, HandlerMetadata};

/// Shows data to the user; rendering itself is the UI's job
pub struct DataDisplayHandler;

#[async_trait]
impl ElementHandler for DataDisplayHandler {
    fn name(&self) -> &str {
        "data_display"
    }

    async fn execute(&self, _ctx: ElementContext) -> Result<ElementOutcome, ElementError> {
        Ok(ElementOutcome::ready("Data displayed successfully"))
    }

    fn metadata(&self) -> HandlerMetadata {
        HandlerMetadata {
            description: "Display data as a table, JSON or text".to_string(),
            category: "output".to_string(),
        }
    }
}
