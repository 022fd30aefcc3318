use crate::quiz::client::DEFAULT_ENDPOINT;

const DEFAULT_DIALOGUE_DB: &str = "db.sqlite";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub dialogue_db: String,
}

impl Config {
    /// Reads `QUIZ_API_URL` and `DIALOGUE_DB`, the bot token itself is picked up by teloxide.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            api_url: non_empty("QUIZ_API_URL").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            dialogue_db: non_empty("DIALOGUE_DB").unwrap_or_else(|| DEFAULT_DIALOGUE_DB.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_to_local_api() {
        let config = Config::from_lookup(|_| None);

        assert_eq!(config.api_url, "http://localhost:5000/api/generate-quiz");
        assert_eq!(config.dialogue_db, "db.sqlite");
    }

    #[test]
    fn overrides_from_environment() {
        let vars = HashMap::from([
            ("QUIZ_API_URL", "http://quiz.internal:8080/api/generate-quiz"),
            ("DIALOGUE_DB", " "),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_url, "http://quiz.internal:8080/api/generate-quiz");
        assert_eq!(config.dialogue_db, "db.sqlite");
    }
}
