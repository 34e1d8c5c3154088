//! HTML renderer
//!
//! Renders documents into self-contained pages from embedded templates.

use minijinja::{AutoEscape, Environment};
use tracing::{debug, error};

use super::Renderer;
use crate::navigator::Document;
use crate::prelude::NavigatorError;
use crate::schema::path_segment;

/// HTML page renderer
pub struct HtmlRenderer {
    env: Environment<'static>,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.add_filter("segment", |name: String| path_segment(&name));

        // Register templates
        env.add_template("layout", include_str!("templates/layout.html.jinja"))
            .expect("Failed to load layout template");
        env.add_template("schemas", include_str!("templates/schemas.html.jinja"))
            .expect("Failed to load schemas template");
        env.add_template("search", include_str!("templates/search.html.jinja"))
            .expect("Failed to load search template");
        env.add_template("tables", include_str!("templates/tables.html.jinja"))
            .expect("Failed to load tables template");
        env.add_template("table", include_str!("templates/table.html.jinja"))
            .expect("Failed to load table template");
        env.add_template(
            "table_stats",
            include_str!("templates/table_stats.html.jinja"),
        )
        .expect("Failed to load table stats template");
        env.add_template(
            "column_stats",
            include_str!("templates/column_stats.html.jinja"),
        )
        .expect("Failed to load column stats template");
        env.add_template(
            "query_manager",
            include_str!("templates/query_manager.html.jinja"),
        )
        .expect("Failed to load query manager template");

        Self { env }
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HtmlRenderer {
    fn content_type(&self) -> &'static str {
        "text/html; charset=utf-8"
    }

    fn render(&self, document: &Document) -> Result<String, NavigatorError> {
        let name = document.template_name();
        debug!(template = ?name, "Rendering page");

        let template = self.env.get_template(name).map_err(|e| {
            error!(template = ?name, error = ?e, "Template not found");
            NavigatorError::Render {
                template: name.to_string(),
                message: format!("Template error: {}", e),
            }
        })?;

        template.render(document).map_err(|e| {
            error!(template = ?name, error = ?e, "Failed to render template");
            NavigatorError::Render {
                template: name.to_string(),
                message: format!("Render error: {}", e),
            }
        })
    }
}
