use async_trait::async_trait;
use blockcore::{display_value, ElementContext, ElementError, ElementHandler, ElementOutcome, HandlerMetadata};

/// Conditional step.
///
/// `condition_type` and `condition_value` are stored but not evaluated:
/// the condition always counts as met and `true_action` is reported.
pub struct ConditionalHandler;

#[async_trait]
impl ElementHandler for ConditionalHandler {
    fn name(&self) -> &str {
        "conditional"
    }

    async fn execute(&self, ctx: ElementContext) -> Result<ElementOutcome, ElementError> {
        let condition_met = true;
        let branch = if condition_met { "true_action" } else { "false_action" };
        let action = display_value(ctx.require_config(branch)?);

        ctx.events.info(format!("Condition met, taking {}", branch));

        Ok(ElementOutcome::ready(format!("Executed: {}", action)))
    }

    fn metadata(&self) -> HandlerMetadata {
        HandlerMetadata {
            description: "Choose an action based on a condition".to_string(),
            category: "logic".to_string(),
        }
    }
}
