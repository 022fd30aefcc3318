use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Http(String),
    #[error("No questions generated")]
    EmptyResult,
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
    /// The quiz came back but the surface refused to show it.
    #[error("{0}")]
    Render(String),
}

impl QuizError {
    /// Text shown to the user. Validation messages are shown as is, everything
    /// that went wrong after the form was accepted gets a common prefix.
    pub fn user_message(&self) -> String {
        match self {
            QuizError::Validation(msg) => msg.clone(),
            other => format!("Failed to generate quiz: {}", other),
        }
    }
}
