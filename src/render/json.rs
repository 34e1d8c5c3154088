//! JSON renderer

use tracing::error;

use super::Renderer;
use crate::navigator::Document;
use crate::prelude::NavigatorError;

/// Renders documents as JSON, type descriptors as their SQL spelling
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn render(&self, document: &Document) -> Result<String, NavigatorError> {
        serde_json::to_string(document).map_err(|e| {
            error!(error = ?e, "Failed to serialize document");
            NavigatorError::Render {
                template: document.template_name().to_string(),
                message: e.to_string(),
            }
        })
    }
}
