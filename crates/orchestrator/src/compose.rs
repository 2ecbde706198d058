//! Deterministic prompt composition.
//!
//! Given the same character, summary, and window, the composed message list
//! is identical: same order, same role mapping. Nothing here touches the
//! network or the clock.

use chat_core::ProviderMessage;
use database::{Character, ChatTurn, ROLE_CHARACTER, ROLE_USER};

/// Build the persona system instruction for a character.
fn system_prompt(character: &Character) -> String {
    format!(
        "You are the character \"{name}\".\n\
         Follow the character profile and voice below at all times.\n\n\
         [Character profile]\n{prompt}\n\n\
         [Intro / background]\n{intro}\n\n\
         Rules:\n\
         - Stay in character and keep the character's voice.\n\
         - Answer in roughly 2-4 paragraphs rather than long essays.",
        name = character.name,
        prompt = character.prompt.as_deref().unwrap_or(""),
        intro = character.intro.as_deref().unwrap_or(""),
    )
}

/// Map a stored turn role to a provider role.
fn provider_role(role: &str) -> &'static str {
    match role {
        ROLE_CHARACTER => "assistant",
        ROLE_USER => "user",
        _ => "system",
    }
}

/// Compose the model input for one chat turn.
///
/// Order: persona system instruction, optional rolling summary as a second
/// system message, the recent window mapped to provider roles, then the new
/// user message last.
pub fn compose_messages(
    character: &Character,
    summary: Option<&str>,
    window: &[ChatTurn],
    user_message: &str,
) -> Vec<ProviderMessage> {
    let mut messages = Vec::with_capacity(window.len() + 3);

    messages.push(ProviderMessage::system(system_prompt(character)));

    if let Some(summary) = summary {
        if !summary.is_empty() {
            messages.push(ProviderMessage::system(format!(
                "[Long-term summary]\n{}",
                summary
            )));
        }
    }

    for turn in window {
        messages.push(ProviderMessage {
            role: provider_role(&turn.role).to_string(),
            content: turn.content.clone(),
        });
    }

    messages.push(ProviderMessage::user(user_message));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_character() -> Character {
        Character {
            id: "char-1".to_string(),
            name: "Mina".to_string(),
            prompt: Some("A cheerful barista.".to_string()),
            intro: Some("You meet Mina at her stand.".to_string()),
            is_public: true,
            creator_id: None,
            created_at: "2025-03-01T00:00:00.000Z".to_string(),
        }
    }

    fn turn(role: &str, content: &str) -> ChatTurn {
        ChatTurn {
            id: 0,
            character_id: "char-1".to_string(),
            session_id: "sess-1".to_string(),
            user_id: None,
            role: role.to_string(),
            content: content.to_string(),
            model: None,
            input_tokens: None,
            output_tokens: None,
            credit_spent: None,
            metadata: None,
            created_at: "2025-03-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_order_and_role_mapping() {
        let character = test_character();
        let window = vec![
            turn(ROLE_USER, "hi"),
            turn(ROLE_CHARACTER, "hello!"),
            turn("moderator", "be nice"),
        ];

        let messages = compose_messages(&character, Some("They are friends."), &window, "how are you?");

        assert_eq!(messages.len(), 6);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("Mina"));
        assert!(messages[0].content.contains("A cheerful barista."));
        assert_eq!(messages[1].role, "system");
        assert!(messages[1].content.starts_with("[Long-term summary]"));
        assert_eq!(messages[2].role, "user");
        assert_eq!(messages[3].role, "assistant");
        assert_eq!(messages[4].role, "system");
        assert_eq!(messages[5].role, "user");
        assert_eq!(messages[5].content, "how are you?");
    }

    #[test]
    fn test_no_summary_message_when_absent() {
        let character = test_character();
        let messages = compose_messages(&character, None, &[], "hello");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");

        // Empty summary is also skipped
        let messages = compose_messages(&character, Some(""), &[], "hello");
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn test_composition_is_deterministic() {
        let character = test_character();
        let window = vec![turn(ROLE_USER, "hi"), turn(ROLE_CHARACTER, "hello!")];

        let first = compose_messages(&character, Some("summary"), &window, "again");
        let second = compose_messages(&character, Some("summary"), &window, "again");

        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_profile_fields_render_empty() {
        let mut character = test_character();
        character.prompt = None;
        character.intro = None;

        let messages = compose_messages(&character, None, &[], "hello");
        assert!(messages[0].content.contains("[Character profile]\n\n"));
    }
}
