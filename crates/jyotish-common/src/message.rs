use serde::{Deserialize, Serialize};

/// Speaker of a conversation turn.
///
/// Callers send free-form role strings; only `"user"` maps to [`TurnRole::User`],
/// everything else is treated as the assistant side of the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TurnRole {
    User,
    Assistant,
}

impl From<String> for TurnRole {
    fn from(role: String) -> Self {
        if role == "user" {
            TurnRole::User
        } else {
            TurnRole::Assistant
        }
    }
}

impl From<TurnRole> for String {
    fn from(role: TurnRole) -> Self {
        match role {
            TurnRole::User => "user".to_string(),
            TurnRole::Assistant => "assistant".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    #[serde(alias = "text")]
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// Who the chart belongs to. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "dateOfBirth", skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, alias = "timeOfBirth", skip_serializing_if = "Option::is_none")]
    pub tob: Option<String>,
    #[serde(default, alias = "placeOfBirth", skip_serializing_if = "Option::is_none")]
    pub pob: Option<String>,
}

impl UserIdentity {
    pub fn name(&self) -> Option<&str> {
        non_empty(&self.name)
    }

    pub fn dob(&self) -> Option<&str> {
        non_empty(&self.dob)
    }

    pub fn tob(&self) -> Option<&str> {
        non_empty(&self.tob)
    }

    pub fn pob(&self) -> Option<&str> {
        non_empty(&self.pob)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_roles_fall_back_to_assistant() {
        let turns: Vec<ConversationTurn> = serde_json::from_value(json!([
            {"role": "user", "content": "hi"},
            {"role": "assistant", "content": "namaste"},
            {"role": "model", "content": "again"},
        ]))
        .unwrap();

        assert_eq!(turns[0].role, TurnRole::User);
        assert_eq!(turns[1].role, TurnRole::Assistant);
        assert_eq!(turns[2].role, TurnRole::Assistant);
    }

    #[test]
    fn role_matching_is_exact() {
        assert_eq!(TurnRole::from("User".to_string()), TurnRole::Assistant);
    }

    #[test]
    fn accepts_text_alias_for_content() {
        let turn: ConversationTurn =
            serde_json::from_value(json!({"role": "user", "text": "hello"})).unwrap();
        assert_eq!(turn, ConversationTurn::user("hello"));
    }

    #[test]
    fn identity_accepts_long_field_names() {
        let identity: UserIdentity = serde_json::from_value(json!({
            "name": "Asha",
            "dateOfBirth": "15/8/1990",
            "timeOfBirth": "14:30",
            "placeOfBirth": "Delhi",
        }))
        .unwrap();

        assert_eq!(identity.name(), Some("Asha"));
        assert_eq!(identity.dob(), Some("15/8/1990"));
        assert_eq!(identity.tob(), Some("14:30"));
        assert_eq!(identity.pob(), Some("Delhi"));
    }

    #[test]
    fn blank_identity_fields_read_as_missing() {
        let identity = UserIdentity {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(identity.name(), None);
        assert_eq!(identity.pob(), None);
    }
}
