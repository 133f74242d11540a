//! Gemini REST (`generateContent`) transports.

mod dto;
mod image;
mod text;

pub use dto::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    InlineData, Part, ResponseContent, ResponsePart,
};
pub use image::{DEFAULT_IMAGE_MODEL, GeminiImageTransport};
pub use text::{GeminiTransport, DEFAULT_TEXT_MODEL};

/// Public Gemini API root.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

fn endpoint(base_url: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    )
}

fn api_key_from_env(var: &str) -> cinebreak_error::CinebreakResult<String> {
    std::env::var(var)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            cinebreak_error::ProviderError::new(cinebreak_error::ProviderErrorKind::MissingApiKey(
                var.to_string(),
            ))
            .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_cleanly() {
        assert_eq!(
            endpoint("https://example.test/v1beta/", "gemini-1.5-flash"),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
