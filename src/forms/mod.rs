/// Contact form embed
///
/// Validates the third-party form settings, loads the provider script once per page and
/// creates the form once per container.

// Settings validation and embed errors
pub mod config;

// idle/loading/ready/error state machine over an `EmbedHost`
pub mod loader;

// HTML fragment host used by the contact endpoint
pub mod document;

pub use config::{ConfigKey, EmbedError, FormEmbedConfig};
pub use document::{EmbedDocument, FALLBACK_HTML};
pub use loader::{EmbedHost, FormLoader, LoaderStatus};
