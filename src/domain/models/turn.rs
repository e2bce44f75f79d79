use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
}

/// One conversation entry. Assistant turns keep their reasoning text and the
/// exact prompt that produced them, so a turn can be regenerated later.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub think: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prompt: String,
}

impl Turn {
    pub fn user(text: &str) -> Turn {
        return Turn {
            role: Role::User,
            text: text.to_string(),
            think: "".to_string(),
            prompt: "".to_string(),
        };
    }

    pub fn assistant(think: &str, text: &str, prompt: &str) -> Turn {
        return Turn {
            role: Role::Assistant,
            text: text.to_string(),
            think: think.to_string(),
            prompt: prompt.to_string(),
        };
    }
}
