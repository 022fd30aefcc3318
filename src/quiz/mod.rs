pub mod client;
pub mod error;
pub mod flow;
pub mod form;
pub mod render;

pub use error::QuizError;

/// Upper bound on the amount of questions the quiz API accepts.
pub const MAX_QUESTIONS: u8 = 20;

/// Parameters of a single generate request, built fresh from the form on every submission.
///
/// Field names on the wire follow the quiz API (`type`, `num_questions`).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct QuizRequest {
    pub topics: Vec<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub difficulty: String,
    pub num_questions: u8,
}

/// A generated question. The API answers either with bare strings or with objects carrying `text`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Question {
    Plain(String),
    Text { text: String },
}

impl Question {
    pub fn text(&self) -> &str {
        match self {
            Question::Plain(text) => text,
            Question::Text { text } => text,
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct QuizResponse {
    pub questions: Option<Vec<Question>>,
    pub count: Option<usize>,
    pub processing_time: Option<String>,
    // Set (with a 207 status) when the questions were generated but the API failed to store them
    pub warning: Option<String>,
    pub db_error: Option<String>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: Option<String>,
    pub details: Option<serde_json::Value>,
}
