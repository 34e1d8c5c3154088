//! Document rendering
//!
//! Turns navigator documents into response bodies. Rendering is independent
//! of aggregation: every document can be rendered by every renderer.

use crate::navigator::Document;
use crate::prelude::NavigatorError;

pub mod html;
pub mod json;

pub use html::HtmlRenderer;
pub use json::JsonRenderer;

/// Output format for a response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Rendered page
    #[default]
    Html,
    /// Machine-readable document
    Json,
}

/// Trait for document renderers
pub trait Renderer: Send + Sync {
    /// Value of the `Content-Type` header for rendered output
    fn content_type(&self) -> &'static str;

    /// Render a document to a response body
    fn render(&self, document: &Document) -> Result<String, NavigatorError>;
}

/// One renderer per supported format
pub struct Renderers {
    html: HtmlRenderer,
    json: JsonRenderer,
}

impl Renderers {
    pub fn new() -> Self {
        Self {
            html: HtmlRenderer::new(),
            json: JsonRenderer,
        }
    }

    pub fn get(&self, format: Format) -> &dyn Renderer {
        match format {
            Format::Html => &self.html,
            Format::Json => &self.json,
        }
    }
}

impl Default for Renderers {
    fn default() -> Self {
        Self::new()
    }
}
