//! Narrative service adapter
//!
//! Relationship analysis and biography drafting are delegated to a hosted
//! language model. The rest of the crate only sees the `NarrativeService`
//! trait, so tests and offline builds can swap in their own implementation.

mod gemini;
mod prompt;
mod runner;

pub use gemini::{GeminiClient, GeminiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use prompt::{biography_prompt, relationship_prompt};
pub use runner::PendingNarrative;

use thiserror::Error;

use crate::components::Person;
use crate::kinship::RelationshipResult;

/// Errors that can occur during narrative service calls.
#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("Missing API key. Set GEMINI_API_KEY or API_KEY.")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API returned error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Service returned no text")]
    EmptyResponse,

    #[error("Narrative worker panicked")]
    WorkerPanicked,
}

impl From<reqwest::Error> for NarrativeError {
    fn from(err: reqwest::Error) -> Self {
        NarrativeError::Network(err.to_string())
    }
}

pub trait NarrativeService: Send + Sync {
    /// Relationship between `a` and `b`. `context` is the pool the pair was
    /// taken from; implementations pick the ancestors they need from it.
    fn analyze_relationship(
        &self,
        a: &Person,
        b: &Person,
        context: &[&Person],
    ) -> Result<RelationshipResult, NarrativeError>;

    fn generate_biography(&self, person: &Person) -> Result<String, NarrativeError>;
}

/// Members older than the younger of the pair, sent along as ancestry context.
pub fn relevant_ancestors<'a>(a: &Person, b: &Person, context: &[&'a Person]) -> Vec<&'a Person> {
    let limit = a.generation.max(b.generation);
    context
        .iter()
        .copied()
        .filter(|m| m.generation < limit)
        .collect()
}

/// Parse a relationship reply, tolerating a fenced code block around the JSON.
pub fn parse_relationship(text: &str) -> Result<RelationshipResult, NarrativeError> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    let result: RelationshipResult =
        serde_json::from_str(body).map_err(|e| NarrativeError::Parse(e.to_string()))?;
    if result.title.trim().is_empty() {
        return Err(NarrativeError::Parse("missing title".to_string()));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Gender, PersonId};

    #[test]
    fn test_parse_plain_json() {
        let text = r#"{ "title": "堂兄", "generation_distance": "三代内", "wufu": "五服以内", "explanation": "同祖父" }"#;
        let result = parse_relationship(text).unwrap();
        assert_eq!(result.title, "堂兄");
        assert_eq!(result.generation_distance.as_deref(), Some("三代内"));
    }

    #[test]
    fn test_parse_fenced_json() {
        let text = "```json\n{\"title\": \"族叔\", \"wufu\": \"五服之外\", \"explanation\": \"\"}\n```";
        let result = parse_relationship(text).unwrap();
        assert_eq!(result.title, "族叔");
        assert!(result.generation_distance.is_none());
    }

    #[test]
    fn test_parse_rejects_prose() {
        assert!(matches!(
            parse_relationship("二人为堂兄弟"),
            Err(NarrativeError::Parse(_))
        ));
        assert!(matches!(
            parse_relationship(r#"{"title": " "}"#),
            Err(NarrativeError::Parse(_))
        ));
    }

    #[test]
    fn test_relevant_ancestors_are_older_than_both() {
        let members: Vec<Person> = (1..=5)
            .map(|g| Person::new(PersonId(g as u64), "李", "某", Gender::Male, g))
            .collect();
        let context: Vec<&Person> = members.iter().collect();
        let picked = relevant_ancestors(&members[1], &members[3], &context);
        let generations: Vec<i32> = picked.iter().map(|p| p.generation).collect();
        assert_eq!(generations, vec![1, 2, 3]);
    }
}
