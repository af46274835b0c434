use async_trait::async_trait;
use blockcore::{ElementContext, ElementError, ElementHandler, ElementOutcome, HandlerMetadata};
use serde_json::Value;

const NO_VALUE: &str = "No value";

/// Form inputs (text, number, date, checkbox, slider, select box).
/// The result is whatever value the user entered, unchanged.
pub struct InputHandler;

#[async_trait]
impl ElementHandler for InputHandler {
    fn name(&self) -> &str {
        "input"
    }

    async fn execute(&self, ctx: ElementContext) -> Result<ElementOutcome, ElementError> {
        let value = ctx.get_config_or("value", Value::String(NO_VALUE.to_string()));
        Ok(ElementOutcome::ready(value))
    }

    fn metadata(&self) -> HandlerMetadata {
        HandlerMetadata {
            description: "Collect a value from the user".to_string(),
            category: "input".to_string(),
        }
    }
}
