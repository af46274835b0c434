use async_trait::async_trait;
use blockcore::{ConfigExt, ElementContext, ElementError, ElementHandler, ElementOutcome, HandlerMetadata};

/// Processes a PDF the UI attached as a filename/size pair.
/// The file contents never reach the core.
pub struct PdfUploadHandler;

#[async_trait]
impl ElementHandler for PdfUploadHandler {
    fn name(&self) -> &str {
        "pdf_upload"
    }

    async fn execute(&self, ctx: ElementContext) -> Result<ElementOutcome, ElementError> {
        match ctx.config.display("filename") {
            Some(filename) => {
                ctx.events.info(format!("Processing {}", filename));
                Ok(ElementOutcome::ready(format!("PDF processed: {}", filename)))
            }
            None => {
                ctx.events.warn("No PDF attached");
                Ok(ElementOutcome::error("No PDF uploaded"))
            }
        }
    }

    fn metadata(&self) -> HandlerMetadata {
        HandlerMetadata {
            description: "Process an uploaded PDF document".to_string(),
            category: "input".to_string(),
        }
    }
}
