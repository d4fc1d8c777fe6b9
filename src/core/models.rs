//! Core data models for translation requests and prompts

use serde::{Deserialize, Serialize};
use std::fmt;

/// Translator persona sent as the system message with every request
const SYSTEM_PROMPT: &str = "Eres un traductor profesional experto en lingüística, semántica y contextos culturales. Tu tarea es traducir cualquier texto al idioma solicitado con precisión, naturalidad y el tono adecuado.

Reglas de traducción:

1. Traduce con fidelidad al significado, tono y registro del texto original.

2. Mantén el formato del texto (párrafos, listas, etc.) cuando sea relevante.

3. No incluyas explicaciones, introducciones ni conclusiones.

4. Si existen varias traducciones posibles, proporciona hasta tres opciones, separadas por punto y coma.

5. Cuando des varias opciones, indica brevemente el contexto o registro (por ejemplo, formal, informal, técnico, coloquial).

6. Si el texto puede tener distintos significados según el contexto, acláralo en una línea breve, sin extenderte.

7. No uses frases como “La traducción es:” o “Aquí tienes la traducción”.

8. Si no se especifica el idioma de destino, traduce automáticamente al inglés.";

/// Outcome of one translation attempt, as recorded in tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranslationStatus {
    /// Model call returned a translation
    Success,
    /// Model call failed; the result is a synthesized error message
    Failure,
}

impl fmt::Display for TranslationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationStatus::Success => write!(f, "EXITOSO"),
            TranslationStatus::Failure => write!(f, "FALLIDO"),
        }
    }
}

/// One role-tagged message in a chat-completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Translation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub source_text: String,
    pub target_language: String,
}

impl TranslationRequest {
    pub fn new(source_text: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            target_language: target_language.into(),
        }
    }

    /// Both fields must be non-empty before any external call is made
    pub fn is_valid(&self) -> bool {
        !self.source_text.is_empty() && !self.target_language.is_empty()
    }

    /// Build the deterministic two-message prompt for this request
    pub fn to_messages(&self) -> Vec<ChatMessage> {
        let user_prompt = format!(
            "Traduce el siguiente texto al {}: \"{}\"",
            self.target_language, self.source_text
        );

        vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user_prompt)]
    }

    /// Source length in characters, as recorded in tracking
    pub fn source_len(&self) -> usize {
        self.source_text.chars().count()
    }
}

/// Truncate to at most `max_chars` characters on a char boundary
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_include;

    #[test]
    fn test_status_display() {
        assert_eq!(TranslationStatus::Success.to_string(), "EXITOSO");
        assert_eq!(TranslationStatus::Failure.to_string(), "FALLIDO");
    }

    #[test]
    fn test_request_validation() {
        assert!(TranslationRequest::new("Hello", "Español").is_valid());
        assert!(!TranslationRequest::new("", "Español").is_valid());
        assert!(!TranslationRequest::new("Hello", "").is_valid());
    }

    #[test]
    fn test_prompt_structure() {
        let request = TranslationRequest::new("Hello", "Español");
        let messages = request.to_messages();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("traductor profesional"));

        assert_json_include!(
            actual: serde_json::to_value(&messages[1]).unwrap(),
            expected: serde_json::json!({
                "role": "user",
                "content": "Traduce el siguiente texto al Español: \"Hello\"",
            })
        );
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let request = TranslationRequest::new("Hello", "Español");
        let first = serde_json::to_value(request.to_messages()).unwrap();
        let second = serde_json::to_value(request.to_messages()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_source_len_counts_chars() {
        let request = TranslationRequest::new("niño", "Inglés");
        assert_eq!(request.source_len(), 4);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 250), "hello");
        assert_eq!(truncate_chars(&"x".repeat(300), 250).len(), 250);
        // multi-byte chars are kept whole
        assert_eq!(truncate_chars("ñññ", 2), "ññ");
    }
}
