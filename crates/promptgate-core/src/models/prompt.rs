use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::client::require_non_empty;
use crate::api::ApiError;

/// Payload for submitting a prompt to a chat session.
///
/// Serializes to the exact wire shape the submit endpoint expects:
/// `{"session": …, "message": …, "model": …, "filterCounts": …,
/// "contextPrompts": …}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptSubmission {
    /// The session object the prompt belongs to, passed through verbatim.
    /// Must contain a non-empty string `sessionId`.
    pub session: Map<String, Value>,
    /// The prompt text.
    pub message: String,
    /// Model identifier to route the prompt to.
    pub model: String,
    /// Per-filter match counts for the message.
    #[serde(default)]
    pub filter_counts: Map<String, Value>,
    /// Prior prompts supplying conversation context.
    #[serde(default)]
    pub context_prompts: Vec<Value>,
}

impl PromptSubmission {
    /// Build a submission for a session known only by its ID.
    pub fn for_session_id(session_id: &str, message: &str, model: &str) -> Self {
        let mut session = Map::new();
        session.insert(
            "sessionId".to_string(),
            Value::String(session_id.to_string()),
        );
        Self {
            session,
            message: message.to_string(),
            model: model.to_string(),
            filter_counts: Map::new(),
            context_prompts: Vec::new(),
        }
    }

    /// Check the submission before it goes anywhere near the network.
    pub fn validate(&self) -> Result<(), ApiError> {
        require_non_empty("message", &self.message)?;
        require_non_empty("model", &self.model)?;
        if self.session.is_empty() {
            return Err(ApiError::InvalidArgument(
                "session must be a non-empty object".to_string(),
            ));
        }
        match self.session.get("sessionId") {
            Some(Value::String(id)) if !id.trim().is_empty() => Ok(()),
            _ => Err(ApiError::InvalidArgument(
                "session must contain a non-empty string sessionId".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_the_wire_shape() {
        let prompt = PromptSubmission::for_session_id("sess-1", "hello there", "small-1");
        let value = serde_json::to_value(&prompt).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "session": { "sessionId": "sess-1" },
                "message": "hello there",
                "model": "small-1",
                "filterCounts": {},
                "contextPrompts": []
            })
        );
    }

    #[test]
    fn a_complete_submission_validates() {
        let prompt = PromptSubmission::for_session_id("sess-1", "hello", "small-1");
        assert!(prompt.validate().is_ok());
    }

    #[test]
    fn validation_requires_a_session_id() {
        let mut prompt = PromptSubmission::for_session_id("sess-1", "hello", "small-1");
        prompt.session.remove("sessionId");
        prompt
            .session
            .insert("name".to_string(), Value::String("My Session".to_string()));
        assert!(matches!(
            prompt.validate(),
            Err(ApiError::InvalidArgument(_))
        ));

        // A sessionId that is present but not a string fails too.
        let mut prompt = PromptSubmission::for_session_id("sess-1", "hello", "small-1");
        prompt
            .session
            .insert("sessionId".to_string(), Value::from(42));
        assert!(matches!(
            prompt.validate(),
            Err(ApiError::InvalidArgument(_))
        ));
    }

    #[test]
    fn extra_session_fields_are_preserved() {
        let mut prompt = PromptSubmission::for_session_id("sess-1", "hello", "small-1");
        prompt
            .session
            .insert("sessionName".to_string(), Value::String("X".to_string()));
        let value = serde_json::to_value(&prompt).unwrap();
        assert_eq!(value["session"]["sessionName"], "X");
        assert_eq!(value["session"]["sessionId"], "sess-1");
    }
}
