use async_trait::async_trait;
use blockcore::{ConfigExt, ElementContext, ElementError, ElementHandler, ElementOutcome, HandlerMetadata};

/// Simulated email: reports delivery without contacting a mail server
pub struct EmailHandler;

#[async_trait]
impl ElementHandler for EmailHandler {
    fn name(&self) -> &str {
        "email"
    }

    async fn execute(&self, ctx: ElementContext) -> Result<ElementOutcome, ElementError> {
        let recipient = ctx
            .config
            .display("recipient")
            .unwrap_or_else(|| "undefined".to_string());

        if let Some(subject) = ctx.config.text("subject") {
            ctx.events.info(format!("Sending '{}' to {} (simulated)", subject, recipient));
        }

        Ok(ElementOutcome::ready(format!("Email sent to {}", recipient)))
    }

    fn metadata(&self) -> HandlerMetadata {
        HandlerMetadata {
            description: "Send an email (simulated)".to_string(),
            category: "notification".to_string(),
        }
    }
}
