/// Server-rendered embed host
///
/// Collects script tags and form containers for one page and renders them as an HTML
/// fragment. Script ids are unique per document.

use crate::forms::config::{EmbedError, FormEmbedConfig};
use crate::forms::loader::EmbedHost;
use serde::Serialize;

/// Rendered when the form cannot be embedded
pub const FALLBACK_HTML: &str = concat!(
    "<div role=\"status\" class=\"form-embed-error\">",
    "We couldn&apos;t load the contact form. ",
    "Email <a href=\"mailto:hello@regtime.com\">hello@regtime.com</a>.",
    "</div>"
);

#[derive(Debug, Clone, PartialEq, Eq)]
struct ScriptTag {
    id: String,
    src: String,
}

#[derive(Debug, Clone)]
struct Container {
    id: String,
    form: Option<FormEmbedConfig>,
}

/// Options passed to `hbspt.forms.create`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateOptions<'a> {
    portal_id: &'a str,
    form_id: &'a str,
    region: &'a str,
    target: String,
}

#[derive(Debug, Clone, Default)]
pub struct EmbedDocument {
    scripts: Vec<ScriptTag>,
    containers: Vec<Container>,
}

impl EmbedDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty form container; ids must be plain `[A-Za-z0-9_-]+`
    pub fn add_container(&mut self, id: &str) -> Result<(), EmbedError> {
        if !is_plain_id(id) {
            return Err(EmbedError::MissingTarget(id.to_string()));
        }
        if !self.containers.iter().any(|c| c.id == id) {
            self.containers.push(Container {
                id: id.to_string(),
                form: None,
            });
        }
        Ok(())
    }

    pub fn script_count(&self) -> usize {
        self.scripts.len()
    }

    pub fn form_count(&self) -> usize {
        self.containers.iter().filter(|c| c.form.is_some()).count()
    }

    /// Scripts first, then every container followed by its create call
    pub fn render(&self) -> Result<String, EmbedError> {
        let mut html = String::new();

        for script in &self.scripts {
            html.push_str(&format!(
                "<script id=\"{}\" src=\"{}\" async defer></script>\n",
                script.id, script.src
            ));
        }

        for container in &self.containers {
            html.push_str(&format!("<div id=\"{}\"></div>\n", container.id));
            if let Some(form) = &container.form {
                let options = CreateOptions {
                    portal_id: form.portal_id(),
                    form_id: form.form_id(),
                    region: form.region(),
                    target: format!("#{}", container.id),
                };
                let json = serde_json::to_string(&options)
                    .map_err(|e| EmbedError::Create(e.to_string()))?;
                html.push_str(&format!(
                    "<script>window.hbspt && window.hbspt.forms.create({});</script>\n",
                    json
                ));
            }
        }

        Ok(html)
    }
}

impl EmbedHost for EmbedDocument {
    fn has_script(&self, id: &str) -> bool {
        self.scripts.iter().any(|s| s.id == id)
    }

    fn inject_script(&mut self, id: &str, src: &str) -> Result<(), EmbedError> {
        if !is_plain_id(id) || !src.starts_with("https://") || src.contains('"') {
            return Err(EmbedError::ScriptLoad(format!("refusing script '{}'", id)));
        }
        if !self.has_script(id) {
            self.scripts.push(ScriptTag {
                id: id.to_string(),
                src: src.to_string(),
            });
        }
        Ok(())
    }

    fn clear_target(&mut self, target: &str) {
        if let Some(container) = self.containers.iter_mut().find(|c| c.id == target) {
            container.form = None;
        }
    }

    fn create_form(&mut self, target: &str, config: &FormEmbedConfig) -> Result<(), EmbedError> {
        let container = self
            .containers
            .iter_mut()
            .find(|c| c.id == target)
            .ok_or_else(|| EmbedError::MissingTarget(target.to_string()))?;
        container.form = Some(config.clone());
        Ok(())
    }
}

fn is_plain_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
