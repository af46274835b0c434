use async_trait::async_trait;
use blockcore::{Config, ConfigExt, ElementContext, ElementError, ElementHandler, ElementOutcome, HandlerMetadata};
use serde_json::Value;

/// Simulated API call: reports success without sending a request
pub struct ApiCallHandler;

#[async_trait]
impl ElementHandler for ApiCallHandler {
    fn name(&self) -> &str {
        "api_call"
    }

    async fn execute(&self, ctx: ElementContext) -> Result<ElementOutcome, ElementError> {
        let url = ctx.config.display("url").unwrap_or_else(|| "undefined".to_string());
        let method = ctx.config.text("method").unwrap_or("GET");

        // A simulated call never fails, so bad headers are only reported
        if let Err(e) = check_headers(&ctx.config) {
            ctx.events.warn(e.to_string());
        }

        ctx.events.info(format!("{} {} (simulated)", method, url));

        Ok(ElementOutcome::ready(format!("API call to {} completed", url)))
    }

    fn metadata(&self) -> HandlerMetadata {
        HandlerMetadata {
            description: "Call an HTTP API (simulated)".to_string(),
            category: "http".to_string(),
        }
    }
}

/// `headers` is entered as JSON text; a parsed object is accepted as well
fn check_headers(config: &Config) -> Result<(), ElementError> {
    let invalid = |reason: String| ElementError::InvalidConfig {
        field: "headers".to_string(),
        reason,
    };

    match config.get("headers") {
        None | Some(Value::Null) | Some(Value::Object(_)) => Ok(()),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(()),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(_)) => Ok(()),
            Ok(_) => Err(invalid("expected a JSON object".to_string())),
            Err(e) => Err(invalid(e.to_string())),
        },
        Some(_) => Err(invalid("expected a JSON object".to_string())),
    }
}
