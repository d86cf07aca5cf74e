use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/chat";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_endpoint")]
    pub endpoint: Option<String>,
    #[serde(default = "default_greeting")]
    pub greeting: Option<String>,
    #[serde(default = "default_false")]
    pub quiet: Option<bool>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            endpoint: default_endpoint(),
            greeting: default_greeting(),
            quiet: default_false(),
        }
    }
}

fn default_endpoint() -> Option<String> {
    Some(DEFAULT_ENDPOINT.to_string())
}

fn default_greeting() -> Option<String> {
    Some(chat_stream::DEFAULT_GREETING.to_string())
}

fn default_false() -> Option<bool> {
    Some(false)
}
