//! Name templates
//!
//! IAM role names may reference the deploy's identity, e.g. `{{application}}InstanceProfile`.

use crate::error::{DeployError, Result};
use tera::{Context, Tera};

/// Values available to name templates
#[derive(Debug, Clone, Copy)]
pub struct NameContext<'a> {
    pub application: &'a str,
    pub stack: Option<&'a str>,
    pub region: &'a str,
    pub account: &'a str,
}

impl NameContext<'_> {
    fn to_context(self) -> Context {
        let mut context = Context::new();
        context.insert("application", self.application);
        context.insert("stack", self.stack.unwrap_or_default());
        context.insert("region", self.region);
        context.insert("account", self.account);
        context
    }
}

/// Render a name template
pub fn render_name(template: &str, names: NameContext<'_>) -> Result<String> {
    if !template.contains("{{") && !template.contains("{%") {
        return Ok(template.to_string());
    }
    Tera::one_off(template, &names.to_context(), false).map_err(|e| {
        DeployError::Argument(format!("cannot render template '{}': {}", template, e))
    })
}
