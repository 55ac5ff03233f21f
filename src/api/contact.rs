/// Contact form embed endpoint

use crate::api::AppState;
use crate::forms::{EmbedDocument, FormLoader, LoaderStatus, FALLBACK_HTML};
use axum::{extract::State, response::Html, routing::get, Router};

/// Container id the form is created in
pub const CONTACT_TARGET: &str = "contact-form";

pub fn create_contact_routes() -> Router<AppState> {
    Router::new().route("/contact/embed", get(contact_embed))
}

/// GET /contact/embed
/// Returns the script tag, container and create call, or the fallback notice
async fn contact_embed(State(state): State<AppState>) -> Html<String> {
    let mut document = EmbedDocument::new();
    if document.add_container(CONTACT_TARGET).is_err() {
        return Html(FALLBACK_HTML.to_string());
    }

    let mut loader = FormLoader::new(state.form.clone(), CONTACT_TARGET);
    if loader.load(&mut document) != &LoaderStatus::Ready {
        return Html(FALLBACK_HTML.to_string());
    }

    match document.render() {
        Ok(html) => Html(html),
        Err(e) => {
            tracing::error!("❌ Failed to render contact form embed: {}", e);
            Html(FALLBACK_HTML.to_string())
        }
    }
}
