use serde::{Deserialize, Serialize};

/// The actor that authored a message.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[default]
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single transcript entry. This is also the wire shape sent to the endpoint.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_wire_shape() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let value = serde_json::to_value(Message::user("What is CS101?"))?;

        assert_eq!(
            value,
            serde_json::json!({ "role": "user", "content": "What is CS101?" })
        );

        Ok(())
    }

    #[test]
    fn test_role_display_matches_wire_name() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        for role in [Role::User, Role::Assistant] {
            let wire = serde_json::to_value(role)?;
            assert_eq!(wire, serde_json::Value::String(role.to_string()));
        }

        Ok(())
    }
}
