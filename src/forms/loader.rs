/// One-shot loader for the third-party contact form
///
/// State machine: `idle -> loading -> ready`, `idle -> error` when the settings fail
/// validation, `loading -> error` when the host cannot inject the script or create the form.
/// The script is injected at most once per host and the form created at most once per
/// loader. Both guards live on the instances, never in process-wide state.

use crate::config::FormConfig;
use crate::forms::config::{ConfigKey, EmbedError, FormEmbedConfig};
use serde::Serialize;

pub const SCRIPT_ID: &str = "hubspot-forms-v2-js";
pub const SCRIPT_SRC: &str = "https://js.hsforms.net/forms/v2.js";

/// Where the embed lands: a page that can carry scripts and form containers
pub trait EmbedHost {
    /// Whether a script with this element id is already on the page
    fn has_script(&self, id: &str) -> bool;

    fn inject_script(&mut self, id: &str, src: &str) -> Result<(), EmbedError>;

    /// Remove any previously created form from `target`
    fn clear_target(&mut self, target: &str);

    fn create_form(&mut self, target: &str, config: &FormEmbedConfig) -> Result<(), EmbedError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LoaderStatus {
    Idle,
    Loading,
    Ready,
    Error {
        /// Setting that failed validation, if that was the cause
        #[serde(skip_serializing_if = "Option::is_none")]
        key: Option<ConfigKey>,
    },
}

/// Embed loader bound to one form container
#[derive(Debug)]
pub struct FormLoader {
    settings: FormConfig,
    target: String,
    status: LoaderStatus,
    created: bool,
}

impl FormLoader {
    pub fn new(settings: FormConfig, target: impl Into<String>) -> Self {
        Self {
            settings,
            target: target.into(),
            status: LoaderStatus::Idle,
            created: false,
        }
    }

    pub fn status(&self) -> &LoaderStatus {
        &self.status
    }

    /// Validate, make sure the script is present, then create the form once
    ///
    /// Calling again after success does nothing.
    pub fn load<H: EmbedHost>(&mut self, host: &mut H) -> &LoaderStatus {
        if self.created {
            tracing::debug!("🔁 Form already created in '{}', skipping", self.target);
            return &self.status;
        }

        let config = match FormEmbedConfig::from_config(&self.settings) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("⚠️ Contact form not embedded: {}", e);
                self.status = LoaderStatus::Error {
                    key: e.config_key(),
                };
                return &self.status;
            }
        };

        self.status = LoaderStatus::Loading;

        if let Err(e) = self.create(host, &config) {
            // ids are not logged
            tracing::error!("❌ Failed to create contact form: {}", e);
            self.status = LoaderStatus::Error { key: None };
            return &self.status;
        }

        self.created = true;
        self.status = LoaderStatus::Ready;
        &self.status
    }

    fn create<H: EmbedHost>(
        &self,
        host: &mut H,
        config: &FormEmbedConfig,
    ) -> Result<(), EmbedError> {
        if !host.has_script(SCRIPT_ID) {
            host.inject_script(SCRIPT_ID, SCRIPT_SRC)?;
        }
        host.clear_target(&self.target);
        host.create_form(&self.target, config)
    }

    /// Tear down: clear the container and allow a fresh `load`
    pub fn reset<H: EmbedHost>(&mut self, host: &mut H) {
        host.clear_target(&self.target);
        self.created = false;
        self.status = LoaderStatus::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM_ID: &str = "3f9a2c1e-8b7d-4e6f-a5c4-1b2d3e4f5a6b";

    #[derive(Default)]
    struct RecordingHost {
        scripts: Vec<String>,
        created: Vec<String>,
        cleared: Vec<String>,
        fail_script: bool,
    }

    impl EmbedHost for RecordingHost {
        fn has_script(&self, id: &str) -> bool {
            self.scripts.iter().any(|s| s == id)
        }

        fn inject_script(&mut self, id: &str, _src: &str) -> Result<(), EmbedError> {
            if self.fail_script {
                return Err(EmbedError::ScriptLoad("blocked".to_string()));
            }
            self.scripts.push(id.to_string());
            Ok(())
        }

        fn clear_target(&mut self, target: &str) {
            self.cleared.push(target.to_string());
        }

        fn create_form(
            &mut self,
            target: &str,
            _config: &FormEmbedConfig,
        ) -> Result<(), EmbedError> {
            self.created.push(target.to_string());
            Ok(())
        }
    }

    fn settings(portal_id: &str) -> FormConfig {
        FormConfig {
            portal_id: portal_id.to_string(),
            form_id: FORM_ID.to_string(),
            region: "na1".to_string(),
        }
    }

    #[test]
    fn starts_idle() {
        let loader = FormLoader::new(settings("4455667"), "contact-form");
        assert_eq!(loader.status(), &LoaderStatus::Idle);
    }

    #[test]
    fn invalid_settings_fail_before_any_injection() {
        let mut host = RecordingHost::default();
        let mut loader = FormLoader::new(settings("not-digits"), "contact-form");

        let status = loader.load(&mut host).clone();

        assert_eq!(status, LoaderStatus::Error { key: Some(ConfigKey::PortalId) });
        assert!(host.scripts.is_empty());
        assert!(host.created.is_empty());
    }

    #[test]
    fn repeated_load_creates_form_once() {
        let mut host = RecordingHost::default();
        let mut loader = FormLoader::new(settings("4455667"), "contact-form");

        assert_eq!(loader.load(&mut host), &LoaderStatus::Ready);
        assert_eq!(loader.load(&mut host), &LoaderStatus::Ready);

        assert_eq!(host.scripts, vec![SCRIPT_ID.to_string()]);
        assert_eq!(host.created, vec!["contact-form".to_string()]);
    }

    #[test]
    fn script_is_shared_between_loaders_on_one_host() {
        let mut host = RecordingHost::default();
        let mut header = FormLoader::new(settings("4455667"), "header-form");
        let mut footer = FormLoader::new(settings("4455667"), "footer-form");

        header.load(&mut host);
        footer.load(&mut host);

        assert_eq!(host.scripts.len(), 1);
        assert_eq!(host.created, vec!["header-form".to_string(), "footer-form".to_string()]);
    }

    #[test]
    fn script_failure_moves_to_error() {
        let mut host = RecordingHost {
            fail_script: true,
            ..Default::default()
        };
        let mut loader = FormLoader::new(settings("4455667"), "contact-form");

        assert_eq!(loader.load(&mut host), &LoaderStatus::Error { key: None });
        assert!(host.created.is_empty());
    }

    #[test]
    fn reset_allows_a_fresh_creation() {
        let mut host = RecordingHost::default();
        let mut loader = FormLoader::new(settings("4455667"), "contact-form");

        loader.load(&mut host);
        loader.reset(&mut host);
        assert_eq!(loader.status(), &LoaderStatus::Idle);

        loader.load(&mut host);
        assert_eq!(host.created.len(), 2);
        assert_eq!(host.scripts.len(), 1);
    }

    #[test]
    fn status_serializes_with_failing_key() {
        let status = LoaderStatus::Error { key: Some(ConfigKey::FormId) };
        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            serde_json::json!({ "status": "error", "key": "formId" })
        );
        assert_eq!(
            serde_json::to_value(LoaderStatus::Ready).unwrap(),
            serde_json::json!({ "status": "ready" })
        );
    }
}
