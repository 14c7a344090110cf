//! Template rendering with Tera

use anyhow::Result;
use tera::{Context, Tera};

/// Template renderer
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Create a new template renderer with embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("base.html", include_str!("../templates/base.html")),
            ("index.html", include_str!("../templates/index.html")),
            ("analysis.html", include_str!("../templates/analysis.html")),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with a Tera Context
    pub fn render_with_context(&self, template: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template, context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_load() {
        let templates = Templates::new().unwrap();
        let mut ctx = Context::new();
        ctx.insert("instance_name", "MCP-Agent");
        ctx.insert("examples", &vec!["Build a plant app"]);
        ctx.insert("requirements", "");

        let html = templates.render_with_context("index.html", &ctx).unwrap();
        assert!(html.contains("MCP-Agent"));
        assert!(html.contains("Build a plant app"));
    }
}
