use html2text::{config, render::text_renderer::TrivialDecorator};

/// Wide enough that no real page line is ever wrapped.
const NO_WRAP_WIDTH: usize = 10_000;

/// Converts an HTML document to plain text without word wrapping.
///
/// Inline markup is rendered without decoration so words split across tags
/// stay whole. A document that cannot be rendered yields an empty string.
pub fn html_to_text(html: &str) -> String {
    match config::with_decorator(TrivialDecorator::new())
        .string_from_read(html.as_bytes(), NO_WRAP_WIDTH)
    {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            log::error!("Failed to convert html to text. Error: {:?}", e);
            String::new()
        }
    }
}
