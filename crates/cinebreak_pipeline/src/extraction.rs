//! Locating and parsing JSON in model responses.
//!
//! Schema-constrained providers usually return bare JSON, but chat-style
//! providers wrap it in markdown fences or prose. Extraction handles both.

use cinebreak_error::{CinebreakResult, MalformedOutputError, MalformedOutputKind, OutputStage};
use serde_json::Value;

/// Extract the JSON text from a response that may contain markdown or prose.
///
/// Strategies, in order:
/// 0. The whole response, if it already parses, or the balanced value it
///    starts with
/// 1. Markdown code blocks: ```json ... ``` or bare ``` fences
/// 2. Balanced braces: { ... }
/// 3. Balanced brackets: [ ... ]
///
/// # Errors
///
/// Returns `MalformedOutputKind::NoJson` if nothing JSON-like is found.
///
/// # Examples
///
/// ```
/// use cinebreak_error::OutputStage;
/// use cinebreak_pipeline::extract_json;
///
/// let response = "Aqui está:\n```json\n{\"shots\": []}\n```";
/// let json = extract_json(response, OutputStage::Shots).unwrap();
/// assert_eq!(json, "{\"shots\": []}");
/// ```
pub fn extract_json(response: &str, stage: OutputStage) -> CinebreakResult<String> {
    let trimmed = response.trim();
    let leading = match trimmed.chars().next() {
        Some('{') => Some(('{', '}')),
        Some('[') => Some(('[', ']')),
        _ => None,
    };
    if let Some((open, close)) = leading {
        if serde_json::from_str::<Value>(trimmed).is_ok() {
            return Ok(trimmed.to_string());
        }
        // Leading JSON followed by prose.
        if let Some(json) = extract_balanced(trimmed, open, close) {
            return Ok(json);
        }
    }

    if let Some(json) = extract_from_code_block(trimmed) {
        return Ok(json);
    }

    let bracket_pos = trimmed.find('[');
    let brace_pos = trimmed.find('{');
    let found = match (bracket_pos, brace_pos) {
        (Some(b), Some(c)) if b < c => {
            extract_balanced(trimmed, '[', ']').or_else(|| extract_balanced(trimmed, '{', '}'))
        }
        _ => extract_balanced(trimmed, '{', '}').or_else(|| extract_balanced(trimmed, '[', ']')),
    };

    found.ok_or_else(|| {
        tracing::error!(%stage, response_length = response.len(), "No JSON found in model response");
        MalformedOutputError::new(stage, MalformedOutputKind::NoJson(response.len())).into()
    })
}

/// Extract and parse a response into a JSON value.
///
/// # Errors
///
/// `NoJson` when nothing is found, `InvalidJson` when the text does not parse.
pub fn parse_response(response: &str, stage: OutputStage) -> CinebreakResult<Value> {
    let json = extract_json(response, stage)?;
    serde_json::from_str(&json).map_err(|e| {
        tracing::error!(%stage, error = %e, "Model response is not valid JSON");
        MalformedOutputError::new(stage, MalformedOutputKind::InvalidJson(e.to_string())).into()
    })
}

fn extract_from_code_block(response: &str) -> Option<String> {
    let start = response.find("```")?;
    let content_start = start + 3;
    // Skip the language tag, if any.
    let skip_to = response[content_start..]
        .find('\n')
        .map(|n| content_start + n + 1)
        .unwrap_or(content_start);

    let content = match response[skip_to..].find("```") {
        Some(end) => &response[skip_to..skip_to + end],
        // Truncated response: no closing fence.
        None => &response[skip_to..],
    };
    Some(content.trim().to_string())
}

fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(response[start..start + i + ch.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_json_passes_through() {
        let json = extract_json("  {\"a\": 1}\n", OutputStage::Structure).unwrap();
        assert_eq!(json, "{\"a\": 1}");
    }

    #[test]
    fn prose_wrapped_object() {
        let response = "Claro! Segue o JSON: {\"shots\": [{\"note\": \"use {braces}\"}]} Espero ter ajudado.";
        let json = extract_json(response, OutputStage::Shots).unwrap();
        assert_eq!(json, "{\"shots\": [{\"note\": \"use {braces}\"}]}");
    }

    #[test]
    fn leading_object_with_trailing_prose() {
        let response = "{\"shots\": []}\n\nEspero ter ajudado!";
        let json = extract_json(response, OutputStage::Shots).unwrap();
        assert_eq!(json, "{\"shots\": []}");
    }

    #[test]
    fn unlabelled_fence() {
        let response = "```\n{\"updated_prompts\": []}\n```";
        let json = extract_json(response, OutputStage::PromptUpdate).unwrap();
        assert_eq!(json, "{\"updated_prompts\": []}");
    }

    #[test]
    fn no_json_is_reported() {
        assert!(extract_json("Desculpe, não consigo.", OutputStage::Structure).is_err());
        assert!(extract_json("", OutputStage::Structure).is_err());
    }

    #[test]
    fn truncated_object_does_not_parse() {
        assert!(parse_response("{\"scenes\": [", OutputStage::Structure).is_err());
    }
}
